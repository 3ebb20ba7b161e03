//! HTTP transport and response caching

pub mod cache;
pub mod gateway;

pub use cache::ResponseCache;
pub use gateway::HttpGateway;

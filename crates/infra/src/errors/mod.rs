//! Conversions from infrastructure errors into the domain error type

pub mod conversions;

pub use conversions::InfraError;

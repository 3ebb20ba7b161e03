//! Durable storage implementations of the common crate's ports

pub mod token_file;

pub use token_file::FileTokenStore;

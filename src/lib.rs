pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod server;
pub mod upload;

pub use error::{Error, Result};

pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod secrets;

pub use error::{Error, GatewayError, Result};

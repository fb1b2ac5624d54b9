//! GDELT dashboard HTTP API.

pub mod config;
pub mod server;

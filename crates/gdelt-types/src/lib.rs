//! Core types and traits for the GDELT dashboard.
//!
//! Response DTOs follow the dashboard's JSON convention: every body carries a
//! `status` of `"ok"` or `"error"` and the HTTP status is always 200.

mod dto;
mod params;
mod traits;

pub use dto::*;
pub use params::*;
pub use traits::*;

#![doc = include_str!("../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
//!

mod chain;
mod common;
mod context;
mod error;

pub mod client;
pub mod server;

pub use chain::{Chain, Handler, Next};
pub use common::*;
pub use context::Context;
pub use error::{Error, Result};

//! Bangumi Episode Library
//!
//! Resolves anime episode files to Bangumi catalog episodes and places them
//! into seasons.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};

//! Configuration Module
//!
//! `ServerConfig` holds the listen address, the backing file location and
//! the bulk-delete persistence flag. See [`ServerConfig::load`] for the
//! lookup order.

mod server_config;
pub mod defaults;

pub use server_config::*;

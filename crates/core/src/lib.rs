//! Basket Core - Shared domain types.
//!
//! This crate provides the types used across all Basket components:
//! - `server` - HTTP cart service with the retention sweeper
//! - `cli` - Command-line tools for schema setup and manual purges
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no randomness. Session identifiers are generated by the server and
//! only rendered and validated here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for entry IDs, session IDs and product names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

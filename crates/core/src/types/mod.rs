//! Core types for Basket.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod id;
pub mod product;
pub mod session;

pub use id::*;
pub use product::{ProductName, ProductNameError};
pub use session::{SESSION_ID_BYTES, SessionId, SessionIdError};

//! Basket server library.
//!
//! An anonymous, cookie-identified shopping cart over a single SQLite table.
//! The crate is split into a library so the router, store and sweeper can be
//! exercised by the integration tests and the CLI.
//!
//! # Request flow
//!
//! ```text
//! request -> session middleware (cart_session cookie) -> route handler
//!         -> CartRepository (SQLite) -> JSON response
//! ```
//!
//! The retention sweeper runs beside the request loop and purges entries
//! older than the retention window.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod sweeper;

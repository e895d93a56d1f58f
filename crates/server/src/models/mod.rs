//! Domain models for the cart service.

pub mod cart;

pub use cart::{CartEntry, CartItemView};

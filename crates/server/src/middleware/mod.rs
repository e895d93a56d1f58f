//! HTTP middleware stack for the cart service.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record on the span, echo in the response)
//! 4. Session (resolve or issue the `cart_session` cookie)

pub mod request_id;
pub mod session;

pub use request_id::request_id_middleware;
pub use session::{CartSession, SESSION_COOKIE_NAME, SessionSettings, session_middleware};

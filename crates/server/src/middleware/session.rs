//! Anonymous session identity.
//!
//! Every request is tagged with a [`SessionId`] before it reaches a handler.
//! A valid `cart_session` cookie is reused unchanged; otherwise a fresh
//! 128-bit identifier is drawn from the operating system's random source and
//! returned in a long-lived `HttpOnly` cookie. The cookie is neither signed
//! nor encrypted: its only protection is that it cannot be guessed.
//!
//! This middleware never touches the cart store.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use cookie::{Cookie, SameSite};
use rand::TryRngCore;
use rand::rngs::OsRng;

use basket_core::{SESSION_ID_BYTES, SessionId};

use crate::config::ServerConfig;
use crate::error::AppError;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cart_session";

/// Session cookie lifetime (one year).
const SESSION_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Failure to issue a new session identifier.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("random source unavailable: {0}")]
    Entropy(String),
}

/// Cookie attributes that depend on deployment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionSettings {
    /// Add the `Secure` attribute (HTTPS deployments).
    pub secure: bool,
}

impl From<&ServerConfig> for SessionSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            secure: config.secure_cookies,
        }
    }
}

/// The session the current request belongs to.
///
/// Inserted into request extensions by [`session_middleware`].
#[derive(Clone, Debug)]
pub struct CartSession(pub SessionId);

/// Draw a new session identifier from `rng`.
///
/// # Errors
///
/// Returns `SessionError::Entropy` if the random source fails. No weaker
/// fallback is attempted.
pub fn issue_session_id<R: TryRngCore + ?Sized>(rng: &mut R) -> Result<SessionId, SessionError> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| SessionError::Entropy(e.to_string()))?;
    Ok(SessionId::from_random_bytes(bytes))
}

/// Find a usable `cart_session` value among the request cookies.
fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .filter(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .find_map(|cookie| SessionId::parse(cookie.value_trimmed()).ok())
}

/// Build the `Set-Cookie` value for a newly issued session.
fn session_cookie(session_id: &SessionId, settings: SessionSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id.as_str().to_owned()))
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::days(SESSION_COOKIE_MAX_AGE_DAYS))
        .build()
}

/// Middleware that attaches a [`CartSession`] to every request.
///
/// Requests without a valid cookie get a new identifier and a `Set-Cookie`
/// header on the response. If the random source fails the request is answered
/// with 500 and never reaches the handler.
pub async fn session_middleware(
    State(settings): State<SessionSettings>,
    request: Request,
    next: Next,
) -> Response {
    resolve_session(settings, OsRng, request, next).await
}

/// Session resolution with an explicit random source for new identifiers.
async fn resolve_session<R: TryRngCore + Send>(
    settings: SessionSettings,
    mut rng: R,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(session_id) = session_from_headers(request.headers()) {
        request.extensions_mut().insert(CartSession(session_id));
        return next.run(request).await;
    }

    let session_id = match issue_session_id(&mut rng) {
        Ok(id) => id,
        Err(e) => return AppError::from(e).into_response(),
    };
    tracing::debug!("Issued new cart session");

    request
        .extensions_mut()
        .insert(CartSession(session_id.clone()));
    let mut response = next.run(request).await;

    let cookie = session_cookie(&session_id, settings);
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, "Failed to encode session cookie"),
    }

    response
}

/// Extractor to get the session from request extensions.
///
/// # Example
///
/// ```ignore
/// async fn handler(CartSession(session_id): CartSession) -> impl IntoResponse {
///     session_id.to_string()
/// }
/// ```
impl<S> FromRequestParts<S> for CartSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            AppError::Internal(
                "session not found in request extensions - middleware may be misconfigured"
                    .to_string(),
            )
        })
    }
}

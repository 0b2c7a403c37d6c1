//! Session binding: mapping an inbound request to a stable session token.
//!
//! Pure with respect to the registry and issuance; the transport layer
//! owns reading and setting the cookie itself.

use courseveil_types::SessionToken;

/// Cookie name the session token travels under.
pub const SESSION_COOKIE: &str = "session";

/// Session cookie lifetime: fifty years, so a respondent keeps the same
/// token for the life of the deployment.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 30 * 12 * 50;

/// A resolved session, possibly created by this request.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSession {
    pub token: SessionToken,
    /// True when no valid token was presented and a fresh one was
    /// generated; the caller must set the cookie on its response.
    pub newly_created: bool,
}

/// Resolves the presented cookie value to a session token, generating a
/// fresh random token when none is presented. A value that does not parse
/// as a token is treated as absent.
#[must_use]
pub fn resolve_session(presented: Option<&str>) -> ResolvedSession {
    match presented.and_then(|raw| SessionToken::parse(raw).ok()) {
        Some(token) => ResolvedSession {
            token,
            newly_created: false,
        },
        None => ResolvedSession {
            token: SessionToken::generate(),
            newly_created: true,
        },
    }
}

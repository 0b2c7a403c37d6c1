//! Core protocol components for courseveil.
//!
//! Four pieces, wired together by the transport layer:
//! - [`CourseRegistry`] creates and resolves course records
//! - [`KeyIssuer`] mints at most one keypair per `(course, session)`
//! - [`verify_course`] checks a submitted signature against every key
//!   ever issued for a course
//! - [`resolve_session`] binds a request to a stable session token
//!
//! Every component takes its store handle at construction time; there is
//! no process-wide state.

mod error;
mod issuance;
mod registry;
mod session;
mod verifier;

pub use error::{CoreError, CoreResult};
pub use issuance::{Issuance, KeyIssuer};
pub use registry::{CourseMatch, CourseRegistry};
pub use session::{resolve_session, ResolvedSession, SESSION_COOKIE, SESSION_TTL_SECS};
pub use verifier::{issued_digests, verify_course};

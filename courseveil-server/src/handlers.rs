//! Route handlers for the feedback attestation API.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use courseveil_core::{
    issued_digests, resolve_session, verify_course, CourseMatch, CourseRegistry, KeyIssuer,
    SESSION_COOKIE, SESSION_TTL_SECS,
};
use courseveil_store::CourseStore;
use courseveil_types::{CourseId, CourseRecord, IssuedKey, SessionToken, Year};

use crate::allowlist::Allowlist;
use crate::error::ApiError;

/// Application state shared across handlers.
pub struct AppState {
    pub registry: CourseRegistry,
    pub issuer: KeyIssuer,
    pub allowlist: Allowlist,
}

impl AppState {
    /// Wires the components over one explicitly-passed store handle.
    #[must_use]
    pub fn new(store: Arc<dyn CourseStore>, allowlist: Allowlist) -> Self {
        Self {
            registry: CourseRegistry::new(store.clone()),
            issuer: KeyIssuer::new(store),
            allowlist,
        }
    }
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Diagnostic dump of every course record.
#[derive(Serialize, Deserialize)]
pub struct IndexResponse {
    pub data: BTreeMap<Year, Vec<CourseRecord>>,
}

/// Digests of every key issued for one course.
#[derive(Serialize, Deserialize)]
pub struct OverviewResponse {
    pub keys: Vec<String>,
}

/// Result of course creation: the shareable course hash.
#[derive(Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
}

/// Verification outcome.
#[derive(Serialize, Deserialize)]
pub struct VerifyResponse {
    pub message: bool,
}

/// The course page payload.
///
/// `key` is absent during the pre-session phase (a raw-id visit with no
/// session). `private_key` is present exactly once, on the response that
/// minted the key; it is never stored and cannot be fetched again.
#[derive(Serialize, Deserialize)]
pub struct CoursePageResponse {
    pub course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<IssuedKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

fn parse_year(raw: &str) -> Result<Year, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("not a four-digit year: {raw}")))
}

fn session_cookie(token: SessionToken) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECS));
    cookie
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// GET /
///
/// Read-only dump of all course records, grouped by year partition.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Json<IndexResponse>, ApiError> {
    let data = state.registry.list_all()?;
    Ok(Json(IndexResponse { data }))
}

/// GET /overview/{year}/{course_id}
///
/// Lists the digests of every key issued for a course, without session
/// linkage.
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Path((year, course_id)): Path<(String, String)>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let year = parse_year(&year)?;
    let course_id = CourseId::new(course_id)?;
    let record = state.registry.find_by_id(year, &course_id)?;
    Ok(Json(OverviewResponse {
        keys: issued_digests(&record),
    }))
}

/// GET /new-course/{course_id}
///
/// Registers a course in the current calendar year. Only callers inside
/// the configured allowlist may register; rejection is a plain denial.
pub async fn new_course(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(course_id): Path<String>,
) -> Result<Json<CreatedResponse>, ApiError> {
    if !state.allowlist.permits(addr.ip()) {
        warn!(addr = %addr.ip(), course = %course_id, "course registration denied");
        return Err(ApiError::Forbidden(
            "address not allowed to register courses".into(),
        ));
    }

    let year = current_year()?;
    let course_id = CourseId::new(course_id)?;
    let hash = state.registry.create_course(year, course_id)?;
    Ok(Json(CreatedResponse {
        message: hash.to_string(),
    }))
}

/// GET /course/{year}/{token}
///
/// The course page: resolves the course by shareable hash or raw id,
/// binds the session, and issues-or-fetches the session's key. Raw-id
/// visits without an existing session stay in the pre-session phase and
/// mint nothing; keys are only ever handed out through the hash link or
/// to returning sessions.
pub async fn course_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path((year, token)): Path<(String, String)>,
) -> Result<(CookieJar, Json<CoursePageResponse>), ApiError> {
    let year = parse_year(&year)?;
    let matched = state.registry.lookup_either(year, &token)?;

    let presented = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
    let has_session = presented
        .as_deref()
        .is_some_and(|raw| SessionToken::parse(raw).is_ok());

    if !has_session && matches!(matched, CourseMatch::ById(_)) {
        return Ok((
            jar,
            Json(CoursePageResponse {
                course: matched.record().course_id.to_string(),
                key: None,
                private_key: None,
            }),
        ));
    }

    let record = matched.record();
    let resolved = resolve_session(presented.as_deref());
    let issuance = state
        .issuer
        .issue_or_fetch(year, &record.course_hash, resolved.token)?;

    if issuance.is_fresh() {
        info!(%year, course = %record.course_id, "delivered freshly minted key");
    }

    let private_key = issuance.private_key.as_ref().map(|key| key.to_hex());
    let body = CoursePageResponse {
        course: record.course_id.to_string(),
        key: Some(issuance.key),
        private_key,
    };

    let jar = if resolved.newly_created {
        jar.add(session_cookie(resolved.token))
    } else {
        jar
    };
    Ok((jar, Json(body)))
}

/// GET /course/{year}/{token}/verify/{signature}
///
/// Checks a submitted signature against every key issued for the course.
/// Always a definite boolean; reveals nothing about which key matched.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Path((year, token, signature)): Path<(String, String, String)>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let year = parse_year(&year)?;
    let matched = state.registry.lookup_either(year, &token)?;
    Ok(Json(VerifyResponse {
        message: verify_course(matched.record(), &signature),
    }))
}

fn current_year() -> Result<Year, ApiError> {
    let year = chrono::Utc::now().year();
    let year = u16::try_from(year)
        .map_err(|_| ApiError::Internal(format!("calendar year out of range: {year}")))?;
    Year::new(year).map_err(|err| ApiError::Internal(err.to_string()))
}

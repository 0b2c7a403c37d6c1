//! Persisted course records and their issued-key entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{CourseHash, CourseId, SessionToken, Year};

/// Current course-record schema version.
///
/// Version 1 records carried untagged plain-hash keys (the first revision
/// of the service); version 2 tags every key with its signature algorithm.
pub const SCHEMA_VERSION: u32 = 2;

/// Signature scheme an issued key was minted under.
///
/// Verification dispatches per key on this tag so records minted under an
/// old scheme stay verifiable after an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAlgorithm {
    /// Ed25519 over the key's own digest. The only scheme new issuance uses.
    Ed25519,
    /// Deprecated plain-hash scheme: a "signature" is the stored digest
    /// itself, compared by string equality. Never minted anymore.
    LegacySha256,
}

impl SignatureAlgorithm {
    /// Untagged entries predate algorithm tagging and are all plain-hash.
    fn legacy() -> Self {
        Self::LegacySha256
    }
}

/// Key material issued to one session for one course.
///
/// The matching private key is handed to the requesting client at mint
/// time and never persisted; only the fields below survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedKey {
    /// Scheme this key was minted under.
    #[serde(default = "SignatureAlgorithm::legacy")]
    pub algorithm: SignatureAlgorithm,

    /// Lowercase hex of the exported public key. Absent on legacy entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// Lowercase hex SHA-256 of the exported public key bytes. This is the
    /// fixed message every respondent signs.
    pub digest: String,

    /// Issuer self-attestation: hex signature over the digest, produced
    /// with the private key at mint time. Absent on legacy entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// The persisted entity representing one course offering in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Record schema version; readers must reject versions they don't know.
    #[serde(default = "CourseRecord::legacy_schema_version")]
    pub schema_version: u32,

    /// Year partition this record lives in.
    pub year: Year,

    /// Human-chosen identifier, unique within the year.
    pub course_id: CourseId,

    /// Derived shareable reference, fixed at creation.
    pub course_hash: CourseHash,

    /// Issued keys by session token. At most one entry per session.
    #[serde(default)]
    pub keys: HashMap<SessionToken, IssuedKey>,
}

impl CourseRecord {
    /// Creates a fresh record with no issued keys at the current schema
    /// version.
    #[must_use]
    pub fn new(year: Year, course_id: CourseId, course_hash: CourseHash) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            year,
            course_id,
            course_hash,
            keys: HashMap::new(),
        }
    }

    /// Untagged documents predate schema versioning.
    fn legacy_schema_version() -> u32 {
        1
    }

    /// Returns the issued key for a session, if one exists.
    #[must_use]
    pub fn key_for(&self, session: &SessionToken) -> Option<&IssuedKey> {
        self.keys.get(session)
    }
}

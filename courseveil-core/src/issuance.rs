//! Key issuance: one keypair per `(course, session)`, minted exactly once.
//!
//! The issuance path is the only read-check-then-write in the system. Two
//! concurrent first visits from the same session could both observe "no
//! key yet", so the write goes through the store's compare-and-swap and
//! the loser re-reads: the committed key wins and the second caller gets
//! the idempotent result.

use std::sync::Arc;

use courseveil_crypto::{mint_key, PrivateKeyMaterial};
use courseveil_store::{CasOutcome, CourseStore};
use courseveil_types::{CourseHash, IssuedKey, SessionToken, Year};
use tracing::{debug, info};

use crate::{CoreError, CoreResult};

/// Upper bound on CAS retries. Contention on one course record is a
/// handful of respondents clicking at once, not a hot loop.
const MAX_CAS_ATTEMPTS: usize = 8;

/// Result of an issue-or-fetch call.
#[derive(Debug)]
pub struct Issuance {
    /// The persisted key entry for this session.
    pub key: IssuedKey,
    /// Raw private key material, present only when this call minted the
    /// key. It exists nowhere else and is zeroized on drop; the caller
    /// must deliver it to the requesting client now or never.
    pub private_key: Option<PrivateKeyMaterial>,
}

impl Issuance {
    /// Whether this call minted the key (as opposed to an idempotent
    /// re-visit).
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.private_key.is_some()
    }
}

/// Mints or returns issued keys for course sessions.
pub struct KeyIssuer {
    store: Arc<dyn CourseStore>,
}

impl KeyIssuer {
    /// Creates an issuer over the given store handle.
    #[must_use]
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    /// Returns the session's issued key for a course, minting it if the
    /// session has none yet.
    ///
    /// Re-visits are idempotent: the stored entry is returned unchanged
    /// and nothing is written. A storage failure during the mint surfaces
    /// as [`CoreError::IssuanceFailed`] and leaves no partial entry.
    pub fn issue_or_fetch(
        &self,
        year: Year,
        course_hash: &CourseHash,
        session: SessionToken,
    ) -> CoreResult<Issuance> {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let Some((revision, mut record)) =
                self.store.get_versioned_by_hash(year, course_hash)?
            else {
                return Err(CoreError::NotFound(course_hash.to_string()));
            };

            if let Some(existing) = record.key_for(&session) {
                return Ok(Issuance {
                    key: existing.clone(),
                    private_key: None,
                });
            }

            let minted = mint_key();
            record.keys.insert(session, minted.issued.clone());

            match self.store.compare_and_swap(revision, record) {
                Ok(CasOutcome::Committed) => {
                    info!(
                        %year,
                        course = %course_hash,
                        digest = %minted.issued.digest,
                        "issued new respondent key"
                    );
                    return Ok(Issuance {
                        key: minted.issued,
                        private_key: Some(minted.private_key),
                    });
                }
                Ok(CasOutcome::Conflict) => {
                    // Someone else updated the record between our read and
                    // write; the fresh keypair is discarded and we re-read.
                    debug!(%course_hash, attempt, "issuance write conflicted, retrying");
                }
                Err(err) => return Err(CoreError::IssuanceFailed(err.to_string())),
            }
        }

        Err(CoreError::IssuanceFailed(format!(
            "gave up after {MAX_CAS_ATTEMPTS} conflicting writes on course {course_hash}"
        )))
    }
}

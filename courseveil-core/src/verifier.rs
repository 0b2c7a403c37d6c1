//! Signature verification against every key issued for a course.

use courseveil_crypto::verify_candidate;
use courseveil_types::CourseRecord;

/// Checks whether a submitted signature was produced by any key ever
/// issued for this course.
///
/// Each candidate key is checked under its own algorithm tag for the
/// fixed message that key's holder signs (the key's digest). Malformed
/// stored entries and undecodable submissions count as non-matches and
/// the scan continues. The result carries no information about which
/// session's key matched.
#[must_use]
pub fn verify_course(record: &CourseRecord, submitted: &str) -> bool {
    record.keys.values().any(|key| verify_candidate(key, submitted))
}

/// Digests of every key issued for a course, for the overview listing.
/// Session tokens are deliberately not part of the output.
#[must_use]
pub fn issued_digests(record: &CourseRecord) -> Vec<String> {
    let mut digests: Vec<String> = record.keys.values().map(|key| key.digest.clone()).collect();
    digests.sort();
    digests
}

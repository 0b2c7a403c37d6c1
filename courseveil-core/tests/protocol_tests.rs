//! The full issuance-and-verification protocol, end to end over a store.

use std::sync::Arc;

use courseveil_core::{
    issued_digests, resolve_session, verify_course, CourseRegistry, KeyIssuer,
};
use courseveil_crypto::SigningKey;
use courseveil_store::{CourseStore, JsonFileStore, MemoryStore};
use courseveil_types::{CourseId, SessionToken, Year};

fn run_protocol(store: Arc<dyn CourseStore>) {
    let year = Year::new(2024).unwrap();
    let registry = CourseRegistry::new(store.clone());
    let issuer = KeyIssuer::new(store);

    // Admin registers the course and gets the shareable hash.
    let hash = registry
        .create_course(year, CourseId::new("CS101").unwrap())
        .unwrap();

    // First visit: no cookie, so a session is created and a key minted.
    let session = resolve_session(None);
    assert!(session.newly_created);
    let first = issuer.issue_or_fetch(year, &hash, session.token).unwrap();
    assert!(first.is_fresh());
    let private_hex = first.private_key.as_ref().unwrap().to_hex();

    // Re-visit with the same cookie: the same key, nothing minted.
    let revisit = resolve_session(Some(&session.token.to_string()));
    assert!(!revisit.newly_created);
    let again = issuer.issue_or_fetch(year, &hash, revisit.token).unwrap();
    assert!(!again.is_fresh());
    assert_eq!(first.key, again.key);

    // The respondent signs their key's digest; the course verifies it.
    let sk = SigningKey::from_hex(&private_hex).unwrap();
    let signature = sk.sign(first.key.digest.as_bytes());
    let record = registry.find_by_hash(year, &hash).unwrap();
    assert!(verify_course(&record, &signature.to_hex()));

    // A signature from a key never issued for the course verifies false.
    let stranger = courseveil_crypto::mint_key();
    let stranger_sk = SigningKey::from_hex(&stranger.private_key.to_hex()).unwrap();
    let forged = stranger_sk.sign(first.key.digest.as_bytes());
    assert!(!verify_course(&record, &forged.to_hex()));

    // Overview shows the digest without any session linkage.
    let digests = issued_digests(&record);
    assert_eq!(digests, vec![first.key.digest.clone()]);

    // A second respondent gets an independent key.
    let other = issuer
        .issue_or_fetch(year, &hash, SessionToken::generate())
        .unwrap();
    assert_ne!(other.key.digest, first.key.digest);

    let record = registry.find_by_hash(year, &hash).unwrap();
    assert_eq!(issued_digests(&record).len(), 2);
    // Both respondents' signatures verify against the course.
    assert!(verify_course(&record, &signature.to_hex()));
}

#[test]
fn protocol_over_memory_store() {
    run_protocol(Arc::new(MemoryStore::new()));
}

#[test]
fn protocol_over_json_file_store() {
    let dir = tempfile::tempdir().unwrap();
    run_protocol(Arc::new(JsonFileStore::open(dir.path().join("db.json")).unwrap()));
}

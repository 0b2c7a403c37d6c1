//! Property-based tests for the crypto layer.
//!
//! These verify the protocol properties that must always hold:
//! - A minted key verifies its own holder's signature and nobody else's
//! - Arbitrary submissions never crash the candidate check
//! - Digests are stable and well-formed

use courseveil_crypto::{mint_key, sha256_hex, verify_candidate, SigningKey};
use proptest::prelude::*;

fn submission_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Arbitrary printable garbage
        prop::string::string_regex("[ -~]{0,200}").unwrap(),
        // Hex of the wrong lengths
        prop::collection::vec(any::<u8>(), 0..100).prop_map(hex::encode),
        // Correctly sized but random "signatures"
        prop::collection::vec(any::<u8>(), 64).prop_map(hex::encode),
    ]
}

proptest! {
    /// The candidate check is total: any submission yields a boolean,
    /// and a random one practically never matches a freshly minted key.
    #[test]
    fn arbitrary_submissions_are_absorbed(submission in submission_strategy()) {
        let minted = mint_key();
        prop_assert!(!verify_candidate(&minted.issued, &submission));
    }

    /// Digest output shape is invariant over the input.
    #[test]
    fn digest_shape(data in prop::collection::vec(any::<u8>(), 0..500)) {
        let d = sha256_hex(&data);
        prop_assert_eq!(d.len(), 64);
        prop_assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        prop_assert_eq!(d.clone(), sha256_hex(&data));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Only the holder of the minted private key can produce a matching
    /// signature over the key's digest.
    #[test]
    fn holder_signature_verifies(_ in 0..1u8) {
        let minted = mint_key();
        let sk = SigningKey::from_hex(&minted.private_key.to_hex()).unwrap();
        let sig = sk.sign(minted.issued.digest.as_bytes());
        prop_assert!(verify_candidate(&minted.issued, &sig.to_hex()));

        let stranger = mint_key();
        let stranger_sk = SigningKey::from_hex(&stranger.private_key.to_hex()).unwrap();
        let forged = stranger_sk.sign(minted.issued.digest.as_bytes());
        prop_assert!(!verify_candidate(&minted.issued, &forged.to_hex()));
    }
}

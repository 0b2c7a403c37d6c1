//! Minting of respondent keys and per-key signature checks.
//!
//! The fixed message a respondent signs is the hex digest of their own
//! public key, as ASCII bytes. The issuer signs the same message once at
//! mint time (self-attestation) so it can later prove the key is one it
//! generated.

use courseveil_types::{IssuedKey, SignatureAlgorithm};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::digest::sha256_hex;
use crate::signing::{KeyPair, Signature, SigningKey, VerifyingKey, KEY_LENGTH};

/// Raw private key material, handed to the requesting client exactly once.
/// Never persisted; zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyMaterial {
    bytes: [u8; KEY_LENGTH],
}

impl PrivateKeyMaterial {
    fn from_signing_key(key: &SigningKey) -> Self {
        Self { bytes: key.to_bytes() }
    }

    /// Returns the lowercase hex encoding for delivery to the client.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl std::fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyMaterial")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Result of minting: the persistable entry plus the transient secret.
pub struct MintedKey {
    /// Entry to persist into the course record.
    pub issued: IssuedKey,
    /// Matching private key; exists only in this value.
    pub private_key: PrivateKeyMaterial,
}

/// Mints a fresh Ed25519 respondent key.
///
/// Only the returned [`MintedKey::private_key`] ever holds the secret; the
/// keypair itself does not outlive this call.
#[must_use]
pub fn mint_key() -> MintedKey {
    let keypair = KeyPair::generate();
    let digest = sha256_hex(&keypair.verifying_key.to_bytes());
    let attestation = keypair.signing_key.sign(digest.as_bytes());

    MintedKey {
        issued: IssuedKey {
            algorithm: SignatureAlgorithm::Ed25519,
            public_key: Some(keypair.verifying_key.to_hex()),
            digest,
            signature: Some(attestation.to_hex()),
        },
        private_key: PrivateKeyMaterial::from_signing_key(&keypair.signing_key),
    }
}

/// Checks a submitted signature against one issued key, dispatching on the
/// key's algorithm tag.
///
/// Malformed stored material or an undecodable submission is a non-match,
/// never an error; the caller keeps scanning other candidates.
#[must_use]
pub fn verify_candidate(key: &IssuedKey, submitted: &str) -> bool {
    match key.algorithm {
        SignatureAlgorithm::Ed25519 => {
            let Some(public_hex) = key.public_key.as_deref() else {
                return false;
            };
            let Ok(verifying) = VerifyingKey::from_hex(public_hex) else {
                return false;
            };
            let Ok(signature) = Signature::from_hex(submitted) else {
                return false;
            };
            verifying.verify(key.digest.as_bytes(), &signature).is_ok()
        }
        SignatureAlgorithm::LegacySha256 => submitted == key.digest,
    }
}

/// Checks the issuer self-attestation stored alongside a key: proof the
/// issuer possessed the private key at mint time.
///
/// Legacy entries carry no attestation and always fail this check.
#[must_use]
pub fn verify_self_attestation(key: &IssuedKey) -> bool {
    match key.signature.as_deref() {
        Some(attestation) => verify_candidate(key, attestation),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_key_is_self_attested() {
        let minted = mint_key();
        assert_eq!(minted.issued.algorithm, SignatureAlgorithm::Ed25519);
        assert!(verify_self_attestation(&minted.issued));
    }

    #[test]
    fn minted_digest_matches_public_key() {
        let minted = mint_key();
        let public_hex = minted.issued.public_key.as_deref().unwrap();
        let bytes = hex::decode(public_hex).unwrap();
        assert_eq!(minted.issued.digest, sha256_hex(&bytes));
    }

    #[test]
    fn private_key_signs_verifiable_signature() {
        let minted = mint_key();
        let sk = SigningKey::from_hex(&minted.private_key.to_hex()).unwrap();
        let sig = sk.sign(minted.issued.digest.as_bytes());
        assert!(verify_candidate(&minted.issued, &sig.to_hex()));
    }

    #[test]
    fn foreign_signature_does_not_verify() {
        let minted = mint_key();
        let other = mint_key();
        let sk = SigningKey::from_hex(&other.private_key.to_hex()).unwrap();
        let sig = sk.sign(minted.issued.digest.as_bytes());
        assert!(!verify_candidate(&minted.issued, &sig.to_hex()));
    }

    #[test]
    fn malformed_submission_is_a_non_match() {
        let minted = mint_key();
        assert!(!verify_candidate(&minted.issued, "not hex"));
        assert!(!verify_candidate(&minted.issued, ""));
        assert!(!verify_candidate(&minted.issued, &"00".repeat(32)));
    }

    #[test]
    fn malformed_stored_key_is_a_non_match() {
        let mut key = mint_key().issued;
        key.public_key = Some("zz".into());
        assert!(!verify_candidate(&key, &"00".repeat(64)));

        key.public_key = None;
        assert!(!verify_candidate(&key, &"00".repeat(64)));
    }

    #[test]
    fn legacy_key_verifies_by_digest_equality() {
        let key = IssuedKey {
            algorithm: SignatureAlgorithm::LegacySha256,
            public_key: None,
            digest: "deadbeef".into(),
            signature: None,
        };
        assert!(verify_candidate(&key, "deadbeef"));
        assert!(!verify_candidate(&key, "deadbeee"));
        assert!(!verify_self_attestation(&key));
    }

    #[test]
    fn ed25519_key_never_matches_by_digest_equality() {
        let minted = mint_key();
        assert!(!verify_candidate(&minted.issued, &minted.issued.digest));
    }
}

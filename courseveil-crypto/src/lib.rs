//! Cryptographic layer for courseveil.
//!
//! One algorithm version is fixed per course-record schema version:
//! schema 2 issues Ed25519 keys whose holders sign the hex digest of their
//! own public key. Schema 1 records carried plain hashes; those remain
//! verifiable through the per-key algorithm tag but are never minted.

mod digest;
mod error;
mod issue;
mod signing;

pub use digest::sha256_hex;
pub use error::{CryptoError, CryptoResult};
pub use issue::{mint_key, verify_candidate, verify_self_attestation, MintedKey, PrivateKeyMaterial};
pub use signing::{KeyPair, Signature, SigningKey, VerifyingKey, KEY_LENGTH, SIGNATURE_LENGTH};

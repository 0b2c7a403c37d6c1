//! Ed25519 signing and verification for issued respondent keys.
//!
//! Key and signature material crosses the storage and HTTP boundaries as
//! lowercase hex, so the wrappers here convert between hex and the dalek
//! types in one place.

use ed25519_dalek::{
    Signature as DalekSignature, Signer as _, SigningKey as DalekSigningKey,
    Verifier as _, VerifyingKey as DalekVerifyingKey,
};
use rand::rngs::OsRng;

use crate::{CryptoError, CryptoResult};

/// Length of a raw Ed25519 secret or public key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Length of a raw Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Ed25519 signing key (secret half of an issued respondent key).
pub struct SigningKey(DalekSigningKey);

/// Ed25519 verifying key (public half of an issued respondent key).
pub struct VerifyingKey(DalekVerifyingKey);

/// Ed25519 signature bytes.
pub struct Signature(DalekSignature);

/// A freshly generated keypair.
pub struct KeyPair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generates a new random Ed25519 keypair.
    #[must_use]
    pub fn generate() -> Self {
        let signing = DalekSigningKey::generate(&mut OsRng);
        let verifying = signing.verifying_key();
        Self {
            signing_key: SigningKey(signing),
            verifying_key: VerifyingKey(verifying),
        }
    }
}

fn decode_fixed<const N: usize>(hex_str: &str) -> CryptoResult<[u8; N]> {
    let bytes = hex::decode(hex_str)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidLength { expected: N, actual })
}

impl SigningKey {
    /// Creates a signing key from the raw 32-byte secret.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; KEY_LENGTH]) -> Self {
        Self(DalekSigningKey::from_bytes(bytes))
    }

    /// Creates a signing key from its hex encoding.
    pub fn from_hex(hex_str: &str) -> CryptoResult<Self> {
        Ok(Self::from_bytes(&decode_fixed::<KEY_LENGTH>(hex_str)?))
    }

    /// Returns the raw 32-byte secret key.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Signs a message and returns the signature.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.0.sign(message))
    }

    /// Returns the corresponding verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }
}

impl VerifyingKey {
    /// Creates a verifying key from the raw 32-byte public key.
    pub fn from_bytes(bytes: &[u8; KEY_LENGTH]) -> CryptoResult<Self> {
        DalekVerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Creates a verifying key from its hex encoding.
    pub fn from_hex(hex_str: &str) -> CryptoResult<Self> {
        Self::from_bytes(&decode_fixed::<KEY_LENGTH>(hex_str)?)
    }

    /// Returns the raw 32-byte public key.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Returns the lowercase hex encoding of the public key.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verifies a signature against a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> CryptoResult<()> {
        self.0
            .verify(message, &signature.0)
            .map_err(|_| CryptoError::SignatureInvalid)
    }
}

impl Signature {
    /// Creates a signature from the raw 64-byte value.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LENGTH]) -> Self {
        Self(DalekSignature::from_bytes(bytes))
    }

    /// Creates a signature from its hex encoding.
    pub fn from_hex(hex_str: &str) -> CryptoResult<Self> {
        Ok(Self::from_bytes(&decode_fixed::<SIGNATURE_LENGTH>(hex_str)?))
    }

    /// Returns the raw 64-byte signature.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.to_bytes()
    }

    /// Returns the lowercase hex encoding of the signature.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let kp = KeyPair::generate();
        let msg = b"fixed message";
        let sig = kp.signing_key.sign(msg);
        assert!(kp.verifying_key.verify(msg, &sig).is_ok());
    }

    #[test]
    fn wrong_message_fails() {
        let kp = KeyPair::generate();
        let sig = kp.signing_key.sign(b"correct");
        assert!(kp.verifying_key.verify(b"wrong", &sig).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = KeyPair::generate();
        let kp2 = KeyPair::generate();
        let sig = kp1.signing_key.sign(b"message");
        assert!(kp2.verifying_key.verify(b"message", &sig).is_err());
    }

    #[test]
    fn hex_roundtrip() {
        let kp = KeyPair::generate();
        let sig = kp.signing_key.sign(b"data");

        let vk = VerifyingKey::from_hex(&kp.verifying_key.to_hex()).unwrap();
        let restored = Signature::from_hex(&sig.to_hex()).unwrap();
        assert!(vk.verify(b"data", &restored).is_ok());
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(VerifyingKey::from_hex("zz").is_err());
        assert!(VerifyingKey::from_hex("ab").is_err()); // wrong length
        assert!(Signature::from_hex(&"00".repeat(32)).is_err()); // 32 bytes, not 64
        assert!(SigningKey::from_hex("").is_err());
    }
}

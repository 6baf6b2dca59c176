//! Known-plaintext verification of submitted key shares.
//!
//! The verifier holds no secret. For each candidate it decodes the claimed
//! keys, encrypts a fixed probe message to the candidate height's identity
//! under the claimed master public key and checks that the claimed identity
//! secret key decrypts it back to the probe bytes. Each call is an independent
//! pure decision over its candidate; nothing persists between calls.

use crate::{
    encryption::Ciphertext,
    error::KeyshareError,
    setup::{IdentitySecretKey, MasterPublicKey},
};
use ark_ec::pairing::Pairing;
use ark_std::{
    cfg_into_iter,
    rand::{rngs::StdRng, RngCore, SeedableRng},
    string::{String, ToString},
    vec::Vec,
};
use digest::Digest;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Probe message known to both sides of the round trip. Not secret; its only
/// role is to detect whether decryption recovers the original bytes.
pub const PROBE_PLAINTEXT: &[u8] = b"test data";

/// Identity for a block height: its decimal encoding, no leading zeros.
/// Injective over u64, so distinct heights never share an identity.
pub fn height_identity(height: u64) -> String {
    height.to_string()
}

/// A key-share submission decoded from the transport by the upstream
/// extraction layer. Consumed exactly once by the verifier, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateKeyShare {
    pub height: u64,
    pub submitter: String,
    /// Compressed canonical G1 encoding of the claimed master public key
    pub master_public_key: Vec<u8>,
    /// Compressed canonical G2 encoding of the claimed identity secret key
    pub identity_secret_key: Vec<u8>,
}

/// Why a candidate was rejected. Downstream penalization policy depends on
/// telling garbage bytes apart from a cryptographically wrong key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidityReason {
    MalformedKeyEncoding,
    DecryptionFailed,
    PlaintextMismatch,
}

impl InvalidityReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedKeyEncoding => "malformed key encoding",
            Self::DecryptionFailed => "key does not decrypt ciphertext for this identity",
            Self::PlaintextMismatch => "decrypted output does not match known plaintext",
        }
    }
}

impl core::fmt::Display for InvalidityReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationVerdict {
    Valid,
    Invalid(InvalidityReason),
}

impl VerificationVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Populated only for invalid verdicts
    pub fn reason(&self) -> Option<InvalidityReason> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(*reason),
        }
    }
}

/// Decide whether `candidate` carries a correct identity secret key for its
/// height. Returns `Err` only for internal defects (the probe encryption
/// failing on a well-formed key); every adversarial or malformed submission
/// maps to an invalid verdict, never an error.
pub fn verify_key_share<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
    candidate: &CandidateKeyShare,
) -> Result<VerificationVerdict, KeyshareError> {
    let master_public_key = match MasterPublicKey::<E>::from_bytes(&candidate.master_public_key) {
        Ok(pk) => pk,
        Err(_) => {
            return Ok(VerificationVerdict::Invalid(
                InvalidityReason::MalformedKeyEncoding,
            ))
        }
    };
    let identity_secret_key =
        match IdentitySecretKey::<E>::from_bytes(&candidate.identity_secret_key) {
            Ok(sk) => sk,
            Err(_) => {
                return Ok(VerificationVerdict::Invalid(
                    InvalidityReason::MalformedKeyEncoding,
                ))
            }
        };

    let identity = height_identity(candidate.height);
    let ciphertext = Ciphertext::<E>::new::<_, D>(
        rng,
        &master_public_key,
        identity.as_bytes(),
        PROBE_PLAINTEXT,
    )?;

    match ciphertext.decrypt::<D>(&identity_secret_key) {
        Ok(plaintext) => {
            if plaintext.as_slice() == PROBE_PLAINTEXT {
                Ok(VerificationVerdict::Valid)
            } else {
                Ok(VerificationVerdict::Invalid(
                    InvalidityReason::PlaintextMismatch,
                ))
            }
        }
        Err(KeyshareError::InvalidCiphertext) | Err(KeyshareError::MalformedCiphertext) => Ok(
            VerificationVerdict::Invalid(InvalidityReason::DecryptionFailed),
        ),
        Err(e) => Err(e),
    }
}

/// Verify a batch, one verdict per candidate in order. Verifications are
/// independent and run in parallel when the `parallel` feature is enabled;
/// each candidate gets its own rng seeded from the caller's.
pub fn verify_key_shares<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
    candidates: &[CandidateKeyShare],
) -> Result<Vec<VerificationVerdict>, KeyshareError> {
    let mut seeds = Vec::with_capacity(candidates.len());
    for _ in 0..candidates.len() {
        let mut seed = <StdRng as SeedableRng>::Seed::default();
        rng.fill_bytes(&mut seed);
        seeds.push(seed);
    }
    cfg_into_iter!(seeds)
        .zip(cfg_into_iter!(candidates))
        .map(|(seed, candidate)| {
            verify_key_share::<E, D, _>(&mut StdRng::from_seed(seed), candidate)
        })
        .collect()
}

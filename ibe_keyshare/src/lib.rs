#![cfg_attr(not(feature = "std"), no_std)]

//! # IBE key-share verification
//!
//! Verifies decryption-key submissions in a threshold identity-based encryption
//! scheme without the verifier holding any secret. A participant submits, for a
//! block height, a claimed identity secret key together with the master public
//! key it was derived under. The verifier encrypts a fixed probe message to the
//! height's identity and checks that the submitted key decrypts it back to the
//! same bytes.
//!
//! The scheme is Boneh-Franklin IBE over a pairing-friendly curve, with the
//! Fujisaki-Okamoto consistency check on decryption:
//!
//! 1. The master public key is `mpk = s * g1` in G1, where `s` is the master
//!    secret held (in shares) by the key-generation committee.
//! 2. A height `h` maps to the identity `decimal(h)`, hashed to `Q_id` in G2.
//! 3. The identity secret key for `h` is `s * Q_id` in G2.
//! 4. Encryption samples `sigma`, derives the ephemeral scalar
//!    `r = H(sigma || msg)` and computes `u = r * g1`, masking `sigma` with
//!    `e(mpk, Q_id)^r` and the message with `sigma`.
//! 5. Decryption recovers `sigma` from `e(u, sk)`, re-derives `r` and rejects
//!    the ciphertext unless `r * g1 == u`.
//!
//! A key share is valid exactly when decryption succeeds and returns the probe
//! bytes. Malformed point encodings, failed consistency checks and plaintext
//! mismatches are reported as three distinct invalidity reasons.

extern crate alloc;

pub mod encryption;
pub mod error;
pub mod hashing_utils;
pub mod serde_utils;
pub mod setup;
pub mod sink;
pub mod verification;

pub use encryption::Ciphertext;
pub use error::KeyshareError;
pub use setup::{IdentitySecretKey, MasterPublicKey, MasterSecretKey};
pub use verification::{
    verify_key_share, verify_key_shares, CandidateKeyShare, InvalidityReason, VerificationVerdict,
    PROBE_PLAINTEXT,
};

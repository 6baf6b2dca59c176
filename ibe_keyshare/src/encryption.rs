//! Boneh-Franklin encryption to an identity and the matching decryption.
//!
//! Encryption is randomized; any ciphertext produced for an identity under a
//! master public key can be decrypted by that identity's secret key, which is
//! all the known-plaintext verification needs. Decryption carries the
//! Fujisaki-Okamoto consistency check: the ephemeral scalar is re-derived from
//! the recovered `sigma` and message, and the ciphertext is rejected unless it
//! reproduces the ephemeral key `u`. A wrong identity secret key therefore
//! fails inside `decrypt` rather than yielding garbage bytes.

use crate::{
    error::KeyshareError,
    hashing_utils::{expand_mask, field_elem_from_try_and_incr, xor_in_place},
    serde_utils::ArkObjectBytes,
    setup::{identity_point, IdentitySecretKey, MasterPublicKey},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec, vec::Vec};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Byte length of the commitment randomness `sigma`
pub const SIGMA_BYTE_SIZE: usize = 32;

const SIGMA_MASK_DOMAIN: &[u8] = b"ibe-keyshare : sigma mask";
const MESSAGE_MASK_DOMAIN: &[u8] = b"ibe-keyshare : message mask";
const EPHEMERAL_SCALAR_DOMAIN: &[u8] = b"ibe-keyshare : ephemeral scalar : ";

#[serde_as]
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
pub struct Ciphertext<E: Pairing> {
    /// Ephemeral key `r * g1`
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G1Affine,
    /// `sigma` masked by the shared pairing value `e(mpk, Q_id)^r`
    pub v: [u8; SIGMA_BYTE_SIZE],
    /// Message masked by `sigma`
    pub w: Vec<u8>,
}

impl<E: Pairing> Ciphertext<E> {
    /// Encrypt `msg` to `identity` under `master_public_key`. Cannot fail for
    /// a well-formed key and a message within the mask bound.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        master_public_key: &MasterPublicKey<E>,
        identity: &[u8],
        msg: &[u8],
    ) -> Result<Self, KeyshareError> {
        let q_id = identity_point::<E, D>(identity);

        let mut sigma = [0u8; SIGMA_BYTE_SIZE];
        rng.fill_bytes(&mut sigma);
        let r = ephemeral_scalar::<E::ScalarField, D>(&sigma, msg);

        let u = (E::G1Affine::generator() * r).into_affine();
        // e(mpk, Q_id)^r = e(r * mpk, Q_id)
        let shared = E::pairing(master_public_key.0 * r, q_id);

        let mut v = sigma;
        xor_in_place(&mut v, &sigma_mask::<E>(&shared)?);

        let mut w = msg.to_vec();
        let mut msg_mask = vec![0u8; w.len()];
        expand_mask(&sigma, MESSAGE_MASK_DOMAIN, &mut msg_mask)
            .map_err(|_| KeyshareError::MessageTooLong(msg.len()))?;
        xor_in_place(&mut w, &msg_mask);

        Ok(Self { u, v, w })
    }

    /// Decrypt with the identity secret key. Fails with
    /// [`KeyshareError::InvalidCiphertext`] when the consistency check rejects
    /// the key/ciphertext pairing.
    pub fn decrypt<D: Digest>(
        &self,
        identity_secret_key: &IdentitySecretKey<E>,
    ) -> Result<Vec<u8>, KeyshareError> {
        // e(u, sk) = e(r * g1, s * Q_id) = e(mpk, Q_id)^r
        let shared = E::pairing(self.u, identity_secret_key.0);

        let mut sigma = self.v;
        xor_in_place(&mut sigma, &sigma_mask::<E>(&shared)?);

        let mut msg = self.w.clone();
        let mut msg_mask = vec![0u8; msg.len()];
        expand_mask(&sigma, MESSAGE_MASK_DOMAIN, &mut msg_mask)
            .map_err(|_| KeyshareError::MalformedCiphertext)?;
        xor_in_place(&mut msg, &msg_mask);

        let r = ephemeral_scalar::<E::ScalarField, D>(&sigma, &msg);
        if (E::G1Affine::generator() * r).into_affine() != self.u {
            return Err(KeyshareError::InvalidCiphertext);
        }
        Ok(msg)
    }
}

/// `r = H(sigma || msg)`, binding the ephemeral key to commitment and message
fn ephemeral_scalar<F: ark_ff::PrimeField, D: Digest>(
    sigma: &[u8; SIGMA_BYTE_SIZE],
    msg: &[u8],
) -> F {
    let mut input = Vec::with_capacity(EPHEMERAL_SCALAR_DOMAIN.len() + SIGMA_BYTE_SIZE + msg.len());
    input.extend_from_slice(EPHEMERAL_SCALAR_DOMAIN);
    input.extend_from_slice(sigma);
    input.extend_from_slice(msg);
    field_elem_from_try_and_incr::<F, D>(&input)
}

fn sigma_mask<E: Pairing>(
    shared: &ark_ec::pairing::PairingOutput<E>,
) -> Result<[u8; SIGMA_BYTE_SIZE], KeyshareError> {
    let mut shared_bytes = Vec::with_capacity(shared.compressed_size());
    shared.serialize_compressed(&mut shared_bytes)?;
    let mut mask = [0u8; SIGMA_BYTE_SIZE];
    // 32 bytes is always within the HKDF bound
    expand_mask(&shared_bytes, SIGMA_MASK_DOMAIN, &mut mask)
        .map_err(|_| KeyshareError::MalformedCiphertext)?;
    Ok(mask)
}

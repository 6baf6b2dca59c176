//! Keys of the IBE scheme and their byte-level codec.
//!
//! The master public key lives in G1, identity secret keys in G2, matching the
//! group assignment of the distributed key-generation protocol that produces
//! them. Both are exchanged as compressed canonical point encodings;
//! deserialization enforces length, on-curve and subgroup checks, so a key
//! that decodes is a well-formed group element.

use crate::{
    error::KeyshareError,
    hashing_utils::{field_elem_from_try_and_incr, projective_group_elem_from_try_and_incr},
    serde_utils::ArkObjectBytes,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{rand::RngCore, vec::Vec};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Master secret of the scheme. Never held by the verifier; kept here as the
/// reference key generation used by tests and honest submitters.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct MasterSecretKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

/// Master public key `s * g1`
#[serde_as]
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
pub struct MasterPublicKey<E: Pairing>(
    #[serde_as(as = "ArkObjectBytes")] pub E::G1Affine,
);

/// Secret key `s * H_G2(identity)` claimed to decrypt ciphertexts encrypted
/// to `identity` under the paired master public key
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct IdentitySecretKey<E: Pairing>(
    #[serde_as(as = "ArkObjectBytes")] pub E::G2Affine,
);

/// Hash an identity byte string to its G2 point `Q_id`
pub fn identity_point<E: Pairing, D: Digest>(identity: &[u8]) -> E::G2Affine {
    projective_group_elem_from_try_and_incr::<E::G2Affine, D>(identity).into_affine()
}

/// Decode a point from its compressed canonical encoding. `deserialize_compressed`
/// enforces on-curve and subgroup membership but tolerates trailing bytes and
/// non-canonical infinity encodings, so the decoded point is re-serialized and
/// required to reproduce the input exactly. The group identity is rejected as
/// well; it is never a usable key.
fn point_from_bytes<G: AffineRepr>(bytes: &[u8]) -> Result<G, KeyshareError> {
    let point = G::deserialize_compressed(bytes)?;
    let mut canonical = Vec::with_capacity(point.compressed_size());
    point.serialize_compressed(&mut canonical)?;
    if canonical.as_slice() != bytes || point.is_zero() {
        return Err(SerializationError::InvalidData.into());
    }
    Ok(point)
}

impl<F: PrimeField> MasterSecretKey<F> {
    pub fn new<R: RngCore>(rng: &mut R) -> Self {
        Self(F::rand(rng))
    }

    /// Deterministic key from a seed, for reproducible test fixtures
    pub fn from_seed<D: Digest>(seed: &[u8]) -> Self {
        Self(field_elem_from_try_and_incr::<F, D>(seed))
    }
}

impl<F: PrimeField> AsRef<F> for MasterSecretKey<F> {
    fn as_ref(&self) -> &F {
        &self.0
    }
}

impl<E: Pairing> MasterPublicKey<E> {
    pub fn new(secret_key: &MasterSecretKey<E::ScalarField>) -> Self {
        Self((E::G1Affine::generator() * secret_key.0).into_affine())
    }

    /// Decode from compressed canonical bytes. Fails on anything that is not
    /// the exact canonical encoding of a non-identity G1 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyshareError> {
        Ok(Self(point_from_bytes::<E::G1Affine>(bytes)?))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyshareError> {
        let mut bytes = Vec::with_capacity(self.0.compressed_size());
        self.0.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }
}

impl<E: Pairing> AsRef<E::G1Affine> for MasterPublicKey<E> {
    fn as_ref(&self) -> &E::G1Affine {
        &self.0
    }
}

impl<E: Pairing> IdentitySecretKey<E> {
    /// Extract the secret key for `identity`, i.e. `s * H_G2(identity)`
    pub fn new<D: Digest>(
        master_secret_key: &MasterSecretKey<E::ScalarField>,
        identity: &[u8],
    ) -> Self {
        Self((identity_point::<E, D>(identity) * master_secret_key.0).into_affine())
    }

    /// Decode from compressed canonical bytes. Fails on anything that is not
    /// the exact canonical encoding of a non-identity G2 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyshareError> {
        Ok(Self(point_from_bytes::<E::G2Affine>(bytes)?))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyshareError> {
        let mut bytes = Vec::with_capacity(self.0.compressed_size());
        self.0.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }
}

impl<E: Pairing> AsRef<E::G2Affine> for IdentitySecretKey<E> {
    fn as_ref(&self) -> &E::G2Affine {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyshareError;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;

    type Fr = <Bls12_381 as Pairing>::ScalarField;

    #[test]
    fn keygen_and_codec_round_trip() {
        let mut rng = StdRng::seed_from_u64(0u64);

        let msk = MasterSecretKey::<Fr>::new(&mut rng);
        let mpk = MasterPublicKey::<Bls12_381>::new(&msk);
        let isk = IdentitySecretKey::<Bls12_381>::new::<Blake2b512>(&msk, b"100");

        let mpk_decoded =
            MasterPublicKey::<Bls12_381>::from_bytes(&mpk.to_bytes().unwrap()).unwrap();
        assert_eq!(mpk, mpk_decoded);
        let isk_decoded =
            IdentitySecretKey::<Bls12_381>::from_bytes(&isk.to_bytes().unwrap()).unwrap();
        assert_eq!(isk, isk_decoded);
    }

    #[test]
    fn seeded_keygen_is_deterministic() {
        let a = MasterSecretKey::<Fr>::from_seed::<Blake2b512>(b"fixture");
        let b = MasterSecretKey::<Fr>::from_seed::<Blake2b512>(b"fixture");
        let c = MasterSecretKey::<Fr>::from_seed::<Blake2b512>(b"other");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn malformed_point_encodings_are_rejected() {
        // too short, too long, and right-length garbage
        for bytes in [&[1u8, 2, 3][..], &[0u8; 100][..], &[0xffu8; 48][..]] {
            assert!(matches!(
                MasterPublicKey::<Bls12_381>::from_bytes(bytes),
                Err(KeyshareError::Serialization(_))
            ));
        }
        for bytes in [&[1u8, 2, 3][..], &[0u8; 200][..], &[0xffu8; 96][..]] {
            assert!(matches!(
                IdentitySecretKey::<Bls12_381>::from_bytes(bytes),
                Err(KeyshareError::Serialization(_))
            ));
        }

        // a G1 encoding is not a valid G2 key
        let msk = MasterSecretKey::<Fr>::from_seed::<Blake2b512>(b"fixture");
        let mpk = MasterPublicKey::<Bls12_381>::new(&msk);
        assert!(IdentitySecretKey::<Bls12_381>::from_bytes(&mpk.to_bytes().unwrap()).is_err());
    }

    #[test]
    fn trailing_bytes_after_a_valid_encoding_are_rejected() {
        let msk = MasterSecretKey::<Fr>::from_seed::<Blake2b512>(b"fixture");
        let mpk = MasterPublicKey::<Bls12_381>::new(&msk);
        let isk = IdentitySecretKey::<Bls12_381>::new::<Blake2b512>(&msk, b"100");

        let mut padded_pk = mpk.to_bytes().unwrap();
        padded_pk.extend_from_slice(&[0u8; 5]);
        assert!(matches!(
            MasterPublicKey::<Bls12_381>::from_bytes(&padded_pk),
            Err(KeyshareError::Serialization(_))
        ));

        let mut padded_sk = isk.to_bytes().unwrap();
        padded_sk.push(0);
        assert!(matches!(
            IdentitySecretKey::<Bls12_381>::from_bytes(&padded_sk),
            Err(KeyshareError::Serialization(_))
        ));
    }

    #[test]
    fn group_identity_is_not_a_usable_key() {
        let mut zero_g1 = Vec::new();
        <Bls12_381 as Pairing>::G1Affine::zero()
            .serialize_compressed(&mut zero_g1)
            .unwrap();
        assert!(MasterPublicKey::<Bls12_381>::from_bytes(&zero_g1).is_err());

        let mut zero_g2 = Vec::new();
        <Bls12_381 as Pairing>::G2Affine::zero()
            .serialize_compressed(&mut zero_g2)
            .unwrap();
        assert!(IdentitySecretKey::<Bls12_381>::from_bytes(&zero_g2).is_err());
    }
}

//! Hashing bytes to group and field elements, and deriving XOR masks

use ark_ec::AffineRepr;
use ark_ff::Field;
use ark_std::vec::Vec;
use digest::Digest;
use hkdf::Hkdf;
use sha2::Sha256;

/// Hash bytes to a point on the curve. Returns as Projective coordinates. This is vulnerable to
/// timing attack and is only used when the input is public anyway, like an identity string.
pub fn projective_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G::Group {
    let mut hash = D::digest(bytes);
    let mut g = G::from_random_bytes(&hash);
    let mut j = 1u64;
    while g.is_none() {
        hash = D::digest(&attempt_input(bytes, j));
        g = G::from_random_bytes(&hash);
        j += 1;
    }
    g.unwrap().mul_by_cofactor_to_group()
}

/// Hash bytes to a field element. Same caveats as hashing to the group.
pub fn field_elem_from_try_and_incr<F: Field, D: Digest>(bytes: &[u8]) -> F {
    let mut hash = D::digest(bytes);
    let mut f = F::from_random_bytes(&hash);
    let mut j = 1u64;
    while f.is_none() {
        hash = D::digest(&attempt_input(bytes, j));
        f = F::from_random_bytes(&hash);
        j += 1;
    }
    f.unwrap()
}

fn attempt_input(bytes: &[u8], attempt: u64) -> Vec<u8> {
    let mut input = Vec::with_capacity(bytes.len() + 17);
    input.extend_from_slice(bytes);
    input.extend_from_slice(b"-attempt-");
    input.extend_from_slice(&attempt.to_le_bytes());
    input
}

/// Expand `ikm` into `out.len()` mask bytes with HKDF-SHA256 under the domain
/// separator `info`. Fails when more bytes are requested than HKDF can produce
/// (255 blocks).
pub fn expand_mask(ikm: &[u8], info: &[u8], out: &mut [u8]) -> Result<(), hkdf::InvalidLength> {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    hk.expand(info, out)
}

/// XOR `mask` into `data`. Lengths must match.
pub fn xor_in_place(data: &mut [u8], mask: &[u8]) {
    for (d, m) in data.iter_mut().zip(mask.iter()) {
        *d ^= m;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G2Affine};
    use ark_std::vec;
    use blake2::Blake2b512;

    #[test]
    fn group_hash_is_deterministic_and_spread() {
        let p1 = projective_group_elem_from_try_and_incr::<G2Affine, Blake2b512>(b"100");
        let p2 = projective_group_elem_from_try_and_incr::<G2Affine, Blake2b512>(b"101");
        let p3 = projective_group_elem_from_try_and_incr::<G2Affine, Blake2b512>(b"100");
        assert_ne!(p1, p2);
        assert_eq!(p1, p3);

        let f1 = field_elem_from_try_and_incr::<Fr, Blake2b512>(b"a");
        let f2 = field_elem_from_try_and_incr::<Fr, Blake2b512>(b"b");
        assert_ne!(f1, f2);
    }

    #[test]
    fn mask_expansion_bounds() {
        let mut small = [0u8; 32];
        expand_mask(b"ikm", b"info", &mut small).unwrap();
        assert_ne!(small, [0u8; 32]);

        // 255 * 32 is the HKDF-SHA256 ceiling
        let mut too_long = vec![0u8; 255 * 32 + 1];
        assert!(expand_mask(b"ikm", b"info", &mut too_long).is_err());
    }

    #[test]
    fn xor_round_trips() {
        let mut data = *b"test data";
        let mask = [0x5au8; 9];
        xor_in_place(&mut data, &mask);
        assert_ne!(&data, b"test data");
        xor_in_place(&mut data, &mask);
        assert_eq!(&data, b"test data");
    }
}

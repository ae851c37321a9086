//! KTY04 traceable signatures (Kiayias, Tsiounis, Yung) over an RSA
//! group of hidden order. Witnesses live in public integer spheres;
//! signatures are Fiat-Shamir interval proofs whose responses are
//! integers, not residues.

pub mod join;
pub mod keys;
pub mod open;
pub mod prime;
pub mod proof;
pub mod sign;
pub mod sphere;

pub use join::{join_manager, join_member, JOIN_SEQ, JOIN_START};
pub use keys::{setup, GroupKey, ManagerKey, MemberKey};
pub use open::{open, reveal, trace, Crl, CrlEntry, Gml, GmlEntry};
pub use proof::{
    claim, claim_verify, prove_equality, prove_equality_verify, EqualityProof,
};
pub use sign::{sign, verify, Signature};

use crate::error::GroupSigError;
use ark_std::vec::Vec;
use blake2::{Blake2b512, Digest};
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed};

/// Hashes a transcript to a `k`-bit challenge. `k` is a multiple of 8,
/// enforced at setup.
pub(crate) fn challenge(domain: &[u8], transcript: &[u8], k: u64) -> BigUint {
    let mut hasher = Blake2b512::new();
    hasher.update(domain);
    hasher.update(transcript);
    let digest = hasher.finalize();
    let take = ((k / 8) as usize).min(digest.len());
    BigUint::from_bytes_be(&digest[..take])
}

/// `a^-1 mod n`, `None` when not invertible.
pub(crate) fn mod_inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    let a = BigInt::from_biguint(Sign::Plus, a.clone());
    let n_int = BigInt::from_biguint(Sign::Plus, n.clone());
    let ext = a.extended_gcd(&n_int);
    if !ext.gcd.is_one() {
        return None;
    }
    let inv = ext.x.mod_floor(&n_int);
    inv.to_biguint()
}

/// Modular exponentiation with a signed exponent. Negative exponents
/// invert the base, which must be a unit mod `n`.
pub(crate) fn powm(
    base: &BigUint,
    exp: &BigInt,
    n: &BigUint,
) -> Result<BigUint, GroupSigError> {
    if exp.is_negative() {
        let inv = mod_inverse(base, n)
            .ok_or(GroupSigError::InvalidArgument("base is not a unit"))?;
        Ok(inv.modpow(exp.magnitude(), n))
    } else {
        Ok(base.modpow(exp.magnitude(), n))
    }
}

/// Big-endian bytes of a residue, length-prefixed into the transcript.
pub(crate) fn absorb(transcript: &mut Vec<u8>, v: &BigUint) {
    crate::codec::put_biguint(transcript, v);
}

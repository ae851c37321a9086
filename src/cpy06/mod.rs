//! CPY06 pairing-based group signatures (Choi, Park, Yung). Members
//! hold a membership certificate issued blindly over a secret exponent;
//! signatures are Fiat-Shamir proofs of holding such a certificate,
//! with opening and tracing trapdoors recoverable by the manager.

pub mod join;
pub mod keys;
pub mod open;
pub mod proof;
pub mod sign;

pub use join::{join_manager, join_member, JOIN_SEQ, JOIN_START};
pub use keys::{setup, GroupKey, ManagerKey, MemberKey};
pub use open::{open, reveal, trace, Crl, CrlEntry, Gml, GmlEntry};
pub use proof::{
    claim, claim_verify, prove_equality, prove_equality_verify, EqualityProof,
};
pub use sign::{sign, verify, Signature};

use ark_ff::{
    field_hashers::{DefaultFieldHasher, HashToField},
    PrimeField,
};
use blake2::Blake2b512;

/// Hashes a transcript into the scalar field. All CPY06 challenges go
/// through here, domain-separated per protocol.
pub(crate) fn challenge<F: PrimeField>(domain: &[u8], transcript: &[u8]) -> F {
    let hasher = <DefaultFieldHasher<Blake2b512> as HashToField<F>>::new(domain);
    hasher.hash_to_field(transcript, 1).pop().unwrap()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::rngs::StdRng;

    pub fn group(
        rng: &mut StdRng,
    ) -> (GroupKey<Bls12_381>, ManagerKey<Bls12_381>, Gml<Bls12_381>) {
        let (gkey, mkey) = setup(rng).unwrap();
        (gkey, mkey, Gml::new())
    }

    /// Runs the full five-phase handshake and returns the member key.
    pub fn enroll(
        rng: &mut StdRng,
        gkey: &GroupKey<Bls12_381>,
        mgrkey: &ManagerKey<Bls12_381>,
        gml: &mut Gml<Bls12_381>,
    ) -> MemberKey<Bls12_381> {
        let mut memkey = MemberKey::default();
        let m1 = join_member(rng, &mut memkey, 0, None, gkey)
            .unwrap()
            .unwrap();
        let m2 = join_manager(rng, mgrkey, gml, 1, &m1, gkey).unwrap();
        let m3 = join_member(rng, &mut memkey, 2, Some(&m2), gkey)
            .unwrap()
            .unwrap();
        let m4 = join_manager(rng, mgrkey, gml, 3, &m3, gkey).unwrap();
        let out = join_member(rng, &mut memkey, 4, Some(&m4), gkey).unwrap();
        assert!(out.is_none());
        memkey
    }
}

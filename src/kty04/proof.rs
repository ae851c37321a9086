//! Claiming and linking signatures through the claiming handle
//! `(T7, T6) = (g^k', T7^x)`: a Schnorr proof of the member exponent
//! `x` over the base `T7` of every signature in the set.

use crate::{
    codec::{self, Reader, TAG_PROOF},
    error::GroupSigError,
    kty04::{
        absorb, challenge,
        keys::{GroupKey, MemberKey},
        powm,
        sign::Signature,
        sphere::sample_signed,
    },
    scheme::Scheme,
};
use ark_std::{rand::RngCore, vec::Vec};
use num_bigint::{BigInt, BigUint};

const CHALLENGE_DOMAIN: &[u8] = b"KTY04-EQUALITY-CHALLENGE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EqualityProof {
    pub c: BigUint,
    pub s: BigInt,
}

fn transcript_challenge(
    gkey: &GroupKey,
    commitments: &[(BigUint, BigUint)],
) -> BigUint {
    let mut bytes = Vec::new();
    for (t7r, t7) in commitments {
        absorb(&mut bytes, t7r);
        absorb(&mut bytes, t7);
    }
    absorb(&mut bytes, &gkey.n);
    challenge(CHALLENGE_DOMAIN, &bytes, gkey.k)
}

/// Proves that every signature in `sigs` was produced with `memkey`.
pub fn prove_equality<R: RngCore>(
    rng: &mut R,
    memkey: &MemberKey,
    gkey: &GroupKey,
    sigs: &[Signature],
) -> Result<EqualityProof, GroupSigError> {
    if sigs.is_empty() {
        return Err(GroupSigError::InvalidArgument(
            "equality proof over an empty signature set",
        ));
    }
    let r = sample_signed(rng, gkey.epsilon * (gkey.m.max().bits() + gkey.k));
    let mut commitments = Vec::with_capacity(sigs.len());
    for sig in sigs {
        let t7r = powm(&sig.t7, &r, &gkey.n)?;
        commitments.push((t7r, sig.t7.clone()));
    }
    let c = transcript_challenge(gkey, &commitments);
    let s = &r - BigInt::from(c.clone()) * BigInt::from(memkey.x.clone());
    Ok(EqualityProof { c, s })
}

/// Checks an equality proof by recovering `T7^r = T7^s * T6^c mod n`
/// for every signature and rehashing.
pub fn prove_equality_verify(
    proof: &EqualityProof,
    gkey: &GroupKey,
    sigs: &[Signature],
) -> Result<bool, GroupSigError> {
    if sigs.is_empty() {
        return Err(GroupSigError::InvalidArgument(
            "equality proof over an empty signature set",
        ));
    }
    let c = BigInt::from(proof.c.clone());
    let mut commitments = Vec::with_capacity(sigs.len());
    for sig in sigs {
        if !gkey.unit(&sig.t7) || !gkey.unit(&sig.t6) {
            return Ok(false);
        }
        let t7r = (powm(&sig.t7, &proof.s, &gkey.n)?
            * powm(&sig.t6, &c, &gkey.n)?)
            % &gkey.n;
        commitments.push((t7r, sig.t7.clone()));
    }
    Ok(transcript_challenge(gkey, &commitments) == proof.c)
}

/// Claims authorship of a single signature.
pub fn claim<R: RngCore>(
    rng: &mut R,
    memkey: &MemberKey,
    gkey: &GroupKey,
    sig: &Signature,
) -> Result<EqualityProof, GroupSigError> {
    prove_equality(rng, memkey, gkey, core::slice::from_ref(sig))
}

pub fn claim_verify(
    proof: &EqualityProof,
    gkey: &GroupKey,
    sig: &Signature,
) -> Result<bool, GroupSigError> {
    prove_equality_verify(proof, gkey, core::slice::from_ref(sig))
}

impl EqualityProof {
    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::biguint_size(&self.c)
            + codec::bigint_size(&self.s)
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Kty04, TAG_PROOF);
        codec::put_biguint(&mut buf, &self.c);
        codec::put_bigint(&mut buf, &self.s);
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Kty04, TAG_PROOF)?;
        let proof = Self {
            c: reader.biguint()?,
            s: reader.bigint()?,
        };
        reader.finish()?;
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kty04::{sign::sign, testing};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn claims_hold_for_own_signatures_only() {
        let mut rng = StdRng::seed_from_u64(140u64);
        let (gkey, mgrkey) = testing::group();
        let mut gml = testing::empty_gml();
        let k0 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let k1 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);

        let s0 = sign(&mut rng, b"Hello, World!", &k0, &gkey).unwrap();
        let s0b = sign(&mut rng, b"Hello, Worlds!", &k0, &gkey).unwrap();
        let s1 = sign(&mut rng, b"Hello, World!", &k1, &gkey).unwrap();

        let proof = claim(&mut rng, &k0, &gkey, &s0).unwrap();
        assert!(claim_verify(&proof, &gkey, &s0).unwrap());
        assert!(!claim_verify(&proof, &gkey, &s0b).unwrap());
        assert!(!claim_verify(&proof, &gkey, &s1).unwrap());
    }

    #[test]
    fn equality_proof_links_signatures_of_one_member() {
        let mut rng = StdRng::seed_from_u64(141u64);
        let (gkey, mgrkey) = testing::group();
        let mut gml = testing::empty_gml();
        let k0 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let k1 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);

        let sigs = [
            sign(&mut rng, b"first", &k0, &gkey).unwrap(),
            sign(&mut rng, b"second", &k0, &gkey).unwrap(),
        ];
        let proof = prove_equality(&mut rng, &k0, &gkey, &sigs).unwrap();
        assert!(prove_equality_verify(&proof, &gkey, &sigs).unwrap());

        // bound to the exact signature sequence
        let reordered = [sigs[1].clone(), sigs[0].clone()];
        assert!(!prove_equality_verify(&proof, &gkey, &reordered).unwrap());
        let duplicated = [sigs[0].clone(), sigs[0].clone()];
        assert!(!prove_equality_verify(&proof, &gkey, &duplicated).unwrap());

        let mixed = [
            sigs[0].clone(),
            sign(&mut rng, b"second", &k1, &gkey).unwrap(),
        ];
        let proof = prove_equality(&mut rng, &k0, &gkey, &mixed).unwrap();
        assert!(!prove_equality_verify(&proof, &gkey, &mixed).unwrap());
    }

    #[test]
    fn proof_round_trips_through_export() {
        let mut rng = StdRng::seed_from_u64(142u64);
        let (gkey, mgrkey) = testing::group();
        let mut gml = testing::empty_gml();
        let k0 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let sig = sign(&mut rng, b"Hello, World!", &k0, &gkey).unwrap();
        let proof = claim(&mut rng, &k0, &gkey, &sig).unwrap();

        let bytes = proof.export().unwrap();
        assert_eq!(bytes.len(), proof.export_size());
        let restored = EqualityProof::import(&bytes).unwrap();
        assert_eq!(restored, proof);
        assert!(claim_verify(&restored, &gkey, &sig).unwrap());
    }
}

//! Authorship proofs: a member can claim a signature as their own, or
//! prove that a batch of signatures share one (unrevealed) signer.
//!
//! Both are Schnorr proofs of the discrete log `x` tying every
//! signature's tracing handle together: `T5_i = e(g1, T4_i)^x`.

use crate::{
    codec::{self, Reader, TAG_PROOF},
    cpy06::{
        challenge,
        keys::{GroupKey, MemberKey},
        sign::Signature,
    },
    error::GroupSigError,
    scheme::Scheme,
};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};

const CHALLENGE_DOMAIN: &[u8] = b"CPY06-EQUALITY-CHALLENGE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EqualityProof<E: Pairing> {
    pub c: E::ScalarField,
    pub s: E::ScalarField,
}

fn transcript_challenge<E: Pairing>(
    commitments: &[(PairingOutput<E>, PairingOutput<E>, PairingOutput<E>)],
) -> Result<E::ScalarField, GroupSigError> {
    let mut bytes = Vec::new();
    for (blinded, base, t5) in commitments {
        codec::put_ark(&mut bytes, blinded)?;
        codec::put_ark(&mut bytes, base)?;
        codec::put_ark(&mut bytes, t5)?;
    }
    Ok(challenge(CHALLENGE_DOMAIN, &bytes))
}

/// Proves that every signature in `sigs` was produced with `memkey`.
pub fn prove_equality<E: Pairing, R: RngCore>(
    rng: &mut R,
    memkey: &MemberKey<E>,
    gkey: &GroupKey<E>,
    sigs: &[Signature<E>],
) -> Result<EqualityProof<E>, GroupSigError> {
    if sigs.is_empty() {
        return Err(GroupSigError::InvalidArgument(
            "equality proof over an empty signature set",
        ));
    }
    let r = E::ScalarField::rand(rng);
    let mut commitments = Vec::with_capacity(sigs.len());
    for sig in sigs {
        let base = E::pairing(gkey.g1, sig.t4);
        commitments.push((base * r, base, sig.t5));
    }
    let c = transcript_challenge::<E>(&commitments)?;
    Ok(EqualityProof {
        c,
        s: r + c * memkey.x,
    })
}

/// Checks an equality proof over `sigs`; `Ok(false)` when any
/// signature was produced by a different member (or the proof is
/// otherwise invalid).
pub fn prove_equality_verify<E: Pairing>(
    proof: &EqualityProof<E>,
    gkey: &GroupKey<E>,
    sigs: &[Signature<E>],
) -> Result<bool, GroupSigError> {
    if sigs.is_empty() {
        return Err(GroupSigError::InvalidArgument(
            "equality proof over an empty signature set",
        ));
    }
    let mut commitments = Vec::with_capacity(sigs.len());
    for sig in sigs {
        let base = E::pairing(gkey.g1, sig.t4);
        // base^s * T5^-c recovers base^r for the honest signer
        commitments.push((base * proof.s - sig.t5 * proof.c, base, sig.t5));
    }
    let c = transcript_challenge::<E>(&commitments)?;
    Ok(c == proof.c)
}

/// Claims authorship of a single signature.
pub fn claim<E: Pairing, R: RngCore>(
    rng: &mut R,
    memkey: &MemberKey<E>,
    gkey: &GroupKey<E>,
    sig: &Signature<E>,
) -> Result<EqualityProof<E>, GroupSigError> {
    prove_equality(rng, memkey, gkey, core::slice::from_ref(sig))
}

pub fn claim_verify<E: Pairing>(
    proof: &EqualityProof<E>,
    gkey: &GroupKey<E>,
    sig: &Signature<E>,
) -> Result<bool, GroupSigError> {
    prove_equality_verify(proof, gkey, core::slice::from_ref(sig))
}

impl<E: Pairing> EqualityProof<E> {
    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE + codec::ark_size(&self.c) + codec::ark_size(&self.s)
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Cpy06, TAG_PROOF);
        codec::put_ark(&mut buf, &self.c)?;
        codec::put_ark(&mut buf, &self.s)?;
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Cpy06, TAG_PROOF)?;
        let proof = Self {
            c: reader.ark()?,
            s: reader.ark()?,
        };
        reader.finish()?;
        Ok(proof)
    }
}

//! Signature generation and verification.
//!
//! A signature is a proof of knowledge of `(x, t, A)` with
//! `A = (g1*x + q) * (gamma + t)^-1`, blinded by `(r1, r2, r3)`:
//! `T1 = x_pub*r1` and `T2 = y_pub*r2` commit to the opening trapdoor,
//! `T3 = A + z*(r1+r2)` hides the certificate, and the pair
//! `(T4, T5) = (w*r3, e(g1, w)^(r3*x))` is the tracing handle.

use crate::{
    codec::{self, Reader, TAG_SIGNATURE},
    cpy06::{
        challenge,
        keys::{GroupKey, MemberKey},
    },
    error::GroupSigError,
    scheme::Scheme,
};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    CurveGroup,
};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};

const CHALLENGE_DOMAIN: &[u8] = b"CPY06-SIGN-CHALLENGE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature<E: Pairing> {
    pub t1: E::G1Affine,
    pub t2: E::G1Affine,
    pub t3: E::G1Affine,
    pub t4: E::G2Affine,
    pub t5: PairingOutput<E>,
    pub c: E::ScalarField,
    pub sr1: E::ScalarField,
    pub sr2: E::ScalarField,
    pub sd1: E::ScalarField,
    pub sd2: E::ScalarField,
    pub sx: E::ScalarField,
    pub st: E::ScalarField,
}

#[allow(clippy::too_many_arguments)]
fn transcript_challenge<E: Pairing>(
    message: &[u8],
    t1: &E::G1Affine,
    t2: &E::G1Affine,
    t3: &E::G1Affine,
    t4: &E::G2Affine,
    t5: &PairingOutput<E>,
    b1: &E::G1,
    b2: &E::G1,
    b3: &E::G1,
    b4: &E::G1,
    b5: &PairingOutput<E>,
    b6: &PairingOutput<E>,
) -> Result<E::ScalarField, GroupSigError> {
    let mut bytes = Vec::new();
    codec::put_field(&mut bytes, message);
    codec::put_ark(&mut bytes, t1)?;
    codec::put_ark(&mut bytes, t2)?;
    codec::put_ark(&mut bytes, t3)?;
    codec::put_ark(&mut bytes, t4)?;
    codec::put_ark(&mut bytes, t5)?;
    codec::put_ark(&mut bytes, &b1.into_affine())?;
    codec::put_ark(&mut bytes, &b2.into_affine())?;
    codec::put_ark(&mut bytes, &b3.into_affine())?;
    codec::put_ark(&mut bytes, &b4.into_affine())?;
    codec::put_ark(&mut bytes, b5)?;
    codec::put_ark(&mut bytes, b6)?;
    Ok(challenge(CHALLENGE_DOMAIN, &bytes))
}

/// Signs `message` under the group of `gkey`. The member key must come
/// out of a completed join.
pub fn sign<E: Pairing, R: RngCore>(
    rng: &mut R,
    message: &[u8],
    memkey: &MemberKey<E>,
    gkey: &GroupKey<E>,
) -> Result<Signature<E>, GroupSigError> {
    if !memkey.is_complete() {
        return Err(GroupSigError::InvalidArgument(
            "member key has no certificate",
        ));
    }

    let r1 = E::ScalarField::rand(rng);
    let r2 = E::ScalarField::rand(rng);
    let r3 = E::ScalarField::rand(rng);
    let d1 = memkey.t * r1;
    let d2 = memkey.t * r2;

    let t1 = (gkey.x * r1).into_affine();
    let t2 = (gkey.y * r2).into_affine();
    let t3 = (gkey.z * (r1 + r2) + memkey.a).into_affine();
    let t4 = (gkey.w * r3).into_affine();
    let t5 = gkey.t5 * (r3 * memkey.x);

    let br1 = E::ScalarField::rand(rng);
    let br2 = E::ScalarField::rand(rng);
    let bd1 = E::ScalarField::rand(rng);
    let bd2 = E::ScalarField::rand(rng);
    let bt = E::ScalarField::rand(rng);
    let bx = E::ScalarField::rand(rng);

    let b1 = gkey.x * br1;
    let b2 = gkey.y * br2;
    let b3 = t1 * bt - gkey.x * bd1;
    let b4 = t2 * bt - gkey.y * bd2;
    let b5 = E::pairing(gkey.g1, t4) * bx;
    let b6 = E::pairing(t3, gkey.g2) * bt
        - gkey.e2 * (bd1 + bd2)
        - gkey.e3 * (br1 + br2)
        - gkey.e4 * bx;

    let c = transcript_challenge::<E>(
        message, &t1, &t2, &t3, &t4, &t5, &b1, &b2, &b3, &b4, &b5, &b6,
    )?;

    Ok(Signature {
        t1,
        t2,
        t3,
        t4,
        t5,
        c,
        sr1: br1 + c * r1,
        sr2: br2 + c * r2,
        sd1: bd1 + c * d1,
        sd2: bd2 + c * d2,
        sx: bx + c * memkey.x,
        st: bt + c * memkey.t,
    })
}

/// Checks `sig` over `message`. A signature that does not hold yields
/// `Ok(false)`.
pub fn verify<E: Pairing>(
    sig: &Signature<E>,
    message: &[u8],
    gkey: &GroupKey<E>,
) -> Result<bool, GroupSigError> {
    let c = sig.c;

    let b1 = gkey.x * sig.sr1 - sig.t1 * c;
    let b2 = gkey.y * sig.sr2 - sig.t2 * c;
    let b3 = sig.t1 * sig.st - gkey.x * sig.sd1;
    let b4 = sig.t2 * sig.st - gkey.y * sig.sd2;
    let b5 = E::pairing(gkey.g1, sig.t4) * sig.sx - sig.t5 * c;
    let b6 = E::pairing(sig.t3, gkey.g2) * sig.st
        - gkey.e2 * (sig.sd1 + sig.sd2)
        - gkey.e3 * (sig.sr1 + sig.sr2)
        - gkey.e4 * sig.sx
        + (E::pairing(sig.t3, gkey.r) - gkey.e5) * c;

    let expected = transcript_challenge::<E>(
        message, &sig.t1, &sig.t2, &sig.t3, &sig.t4, &sig.t5, &b1, &b2, &b3,
        &b4, &b5, &b6,
    )?;
    Ok(expected == c)
}

impl<E: Pairing> Signature<E> {
    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::ark_size(&self.t1)
            + codec::ark_size(&self.t2)
            + codec::ark_size(&self.t3)
            + codec::ark_size(&self.t4)
            + codec::ark_size(&self.t5)
            + codec::ark_size(&self.c)
            + codec::ark_size(&self.sr1)
            + codec::ark_size(&self.sr2)
            + codec::ark_size(&self.sd1)
            + codec::ark_size(&self.sd2)
            + codec::ark_size(&self.sx)
            + codec::ark_size(&self.st)
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Cpy06, TAG_SIGNATURE);
        codec::put_ark(&mut buf, &self.t1)?;
        codec::put_ark(&mut buf, &self.t2)?;
        codec::put_ark(&mut buf, &self.t3)?;
        codec::put_ark(&mut buf, &self.t4)?;
        codec::put_ark(&mut buf, &self.t5)?;
        codec::put_ark(&mut buf, &self.c)?;
        codec::put_ark(&mut buf, &self.sr1)?;
        codec::put_ark(&mut buf, &self.sr2)?;
        codec::put_ark(&mut buf, &self.sd1)?;
        codec::put_ark(&mut buf, &self.sd2)?;
        codec::put_ark(&mut buf, &self.sx)?;
        codec::put_ark(&mut buf, &self.st)?;
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Cpy06, TAG_SIGNATURE)?;
        let sig = Self {
            t1: reader.ark()?,
            t2: reader.ark()?,
            t3: reader.ark()?,
            t4: reader.ark()?,
            t5: reader.ark()?,
            c: reader.ark()?,
            sr1: reader.ark()?,
            sr2: reader.ark()?,
            sd1: reader.ark()?,
            sd2: reader.ark()?,
            sx: reader.ark()?,
            st: reader.ark()?,
        };
        reader.finish()?;
        Ok(sig)
    }
}

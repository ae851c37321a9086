//! Five-phase join handshake. The member runs even phases, the manager
//! odd ones; every exchange travels as an opaque [`Message`].
//!
//! Phase 0: member commits to a blinded exponent `I = g1*y + q*r`.
//! Phase 1: manager contributes randomizers `(u, v)` and echoes `I`.
//! Phase 2: member fixes `x = u*y + v`, publishes `pi = g1*x` with a
//! proof that `pi` is consistent with `I` and `(u, v)`.
//! Phase 3: manager checks the proof, issues the certificate
//! `A = (pi + q) * (gamma + t)^-1` and records the new entry.
//! Phase 4: member checks `e(A, r + g2*t) == e(pi + q, g2)` and keeps
//! the certificate. The member secret never leaves the member.

use crate::{
    codec::{self, Reader},
    cpy06::{
        challenge,
        keys::{nonzero_scalar, GroupKey, JoinScratch, ManagerKey, MemberKey},
        open::{Gml, GmlEntry},
    },
    error::GroupSigError,
    message::Message,
};
use ark_ec::{pairing::Pairing, CurveGroup};
use ark_ff::{Field, Zero};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};

/// First phase of the handshake, run by the member.
pub const JOIN_START: u8 = 0;
/// Last phase of the handshake, run by the member.
pub const JOIN_SEQ: u8 = 4;

const CHALLENGE_DOMAIN: &[u8] = b"CPY06-JOIN-CHALLENGE";

/// Proof that `pi = g1*x` for the `x` determined by the committed `I`
/// and the manager's `(u, v)`, i.e. knowledge of `(x, v, u, rr)` with
/// `pi = g1*x` and `pi = g1*v + I*u - q*rr`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ConsistencyProof<E: Pairing> {
    c: E::ScalarField,
    s_x: E::ScalarField,
    s_v: E::ScalarField,
    s_u: E::ScalarField,
    s_rr: E::ScalarField,
}

impl<E: Pairing> ConsistencyProof<E> {
    fn new<R: RngCore>(
        rng: &mut R,
        gkey: &GroupKey<E>,
        i: &E::G1Affine,
        pi: &E::G1Affine,
        x: &E::ScalarField,
        v: &E::ScalarField,
        u: &E::ScalarField,
        rr: &E::ScalarField,
    ) -> Result<Self, GroupSigError> {
        let b_x = E::ScalarField::rand(rng);
        let b_v = E::ScalarField::rand(rng);
        let b_u = E::ScalarField::rand(rng);
        let b_rr = E::ScalarField::rand(rng);
        let t_dl = (gkey.g1 * b_x).into_affine();
        let t_rep = (gkey.g1 * b_v + *i * b_u - gkey.q * b_rr).into_affine();
        let c = Self::transcript_challenge(gkey, i, pi, &t_dl, &t_rep)?;
        Ok(Self {
            c,
            s_x: b_x + c * x,
            s_v: b_v + c * v,
            s_u: b_u + c * u,
            s_rr: b_rr + c * rr,
        })
    }

    fn verify(
        &self,
        gkey: &GroupKey<E>,
        i: &E::G1Affine,
        pi: &E::G1Affine,
    ) -> Result<bool, GroupSigError> {
        let t_dl = (gkey.g1 * self.s_x - *pi * self.c).into_affine();
        let t_rep = (gkey.g1 * self.s_v + *i * self.s_u
            - gkey.q * self.s_rr
            - *pi * self.c)
            .into_affine();
        let c = Self::transcript_challenge(gkey, i, pi, &t_dl, &t_rep)?;
        Ok(c == self.c)
    }

    fn transcript_challenge(
        gkey: &GroupKey<E>,
        i: &E::G1Affine,
        pi: &E::G1Affine,
        t_dl: &E::G1Affine,
        t_rep: &E::G1Affine,
    ) -> Result<E::ScalarField, GroupSigError> {
        let mut bytes = Vec::new();
        codec::put_ark(&mut bytes, &gkey.g1)?;
        codec::put_ark(&mut bytes, &gkey.q)?;
        codec::put_ark(&mut bytes, i)?;
        codec::put_ark(&mut bytes, pi)?;
        codec::put_ark(&mut bytes, t_dl)?;
        codec::put_ark(&mut bytes, t_rep)?;
        Ok(challenge(CHALLENGE_DOMAIN, &bytes))
    }
}

/// Advances the member's side of the handshake. Returns the message to
/// forward to the manager, or `None` once the handshake is complete.
pub fn join_member<E: Pairing, R: RngCore>(
    rng: &mut R,
    memkey: &mut MemberKey<E>,
    phase: u8,
    input: Option<&Message>,
    gkey: &GroupKey<E>,
) -> Result<Option<Message>, GroupSigError> {
    match phase {
        0 => {
            if memkey.scratch.is_some() || memkey.is_complete() {
                return Err(GroupSigError::UnexpectedJoinPhase(phase));
            }
            let y = E::ScalarField::rand(rng);
            let r = E::ScalarField::rand(rng);
            let i = (gkey.g1 * y + gkey.q * r).into_affine();
            memkey.scratch = Some(JoinScratch { y, r });

            let mut out = Vec::new();
            codec::put_ark(&mut out, &i)?;
            Ok(Some(Message::from_bytes(out)))
        }
        2 => {
            // scratch is consumed only after the reply checks out, so a
            // malformed manager message leaves the join resumable
            let (sy, sr) = match &memkey.scratch {
                Some(scratch) => (scratch.y, scratch.r),
                None => {
                    return Err(GroupSigError::UnexpectedJoinPhase(phase))
                }
            };
            let input = input.ok_or(GroupSigError::MissingJoinMessage(phase))?;
            let mut reader = Reader::new(input.as_bytes());
            let u: E::ScalarField = reader.ark()?;
            let v: E::ScalarField = reader.ark()?;
            let i: E::G1Affine = reader.ark()?;
            reader.finish()?;

            // the echoed commitment must be the one sent in phase 0
            let own = (gkey.g1 * sy + gkey.q * sr).into_affine();
            if i != own {
                return Err(GroupSigError::JoinProtocolFailure(
                    "manager echoed a foreign commitment",
                ));
            }

            let x = u * sy + v;
            let rr = u * sr;
            let pi = (gkey.g1 * x).into_affine();
            let proof =
                ConsistencyProof::new(rng, gkey, &i, &pi, &x, &v, &u, &rr)?;
            memkey.x = x;
            memkey.scratch = None;

            let mut out = Vec::new();
            codec::put_ark(&mut out, &i)?;
            codec::put_ark(&mut out, &pi)?;
            codec::put_ark(&mut out, &proof.c)?;
            codec::put_ark(&mut out, &proof.s_x)?;
            codec::put_ark(&mut out, &proof.s_v)?;
            codec::put_ark(&mut out, &proof.s_u)?;
            codec::put_ark(&mut out, &proof.s_rr)?;
            Ok(Some(Message::from_bytes(out)))
        }
        4 => {
            if memkey.x.is_zero() || memkey.scratch.is_some() {
                return Err(GroupSigError::UnexpectedJoinPhase(phase));
            }
            let input = input.ok_or(GroupSigError::MissingJoinMessage(phase))?;
            let mut reader = Reader::new(input.as_bytes());
            let a: E::G1Affine = reader.ark()?;
            let t: E::ScalarField = reader.ark()?;
            reader.finish()?;

            let pi = gkey.g1 * memkey.x;
            let lhs = E::pairing(a, (gkey.r + gkey.g2 * t).into_affine());
            let rhs = E::pairing((pi + gkey.q).into_affine(), gkey.g2);
            if lhs != rhs {
                return Err(GroupSigError::JoinProtocolFailure(
                    "certificate does not verify against the group key",
                ));
            }
            memkey.a = a;
            memkey.t = t;
            Ok(None)
        }
        _ => Err(GroupSigError::UnexpectedJoinPhase(phase)),
    }
}

/// Advances the manager's side of the handshake. Phase 3 appends the
/// new member to the GML.
pub fn join_manager<E: Pairing, R: RngCore>(
    rng: &mut R,
    mgrkey: &ManagerKey<E>,
    gml: &mut Gml<E>,
    phase: u8,
    input: &Message,
    gkey: &GroupKey<E>,
) -> Result<Message, GroupSigError> {
    match phase {
        1 => {
            let mut reader = Reader::new(input.as_bytes());
            let i: E::G1Affine = reader.ark()?;
            reader.finish()?;

            let u = nonzero_scalar::<E::ScalarField, _>(rng);
            let v = E::ScalarField::rand(rng);

            let mut out = Vec::new();
            codec::put_ark(&mut out, &u)?;
            codec::put_ark(&mut out, &v)?;
            codec::put_ark(&mut out, &i)?;
            Ok(Message::from_bytes(out))
        }
        3 => {
            let mut reader = Reader::new(input.as_bytes());
            let i: E::G1Affine = reader.ark()?;
            let pi: E::G1Affine = reader.ark()?;
            let proof = ConsistencyProof::<E> {
                c: reader.ark()?,
                s_x: reader.ark()?,
                s_v: reader.ark()?,
                s_u: reader.ark()?,
                s_rr: reader.ark()?,
            };
            reader.finish()?;

            if !proof.verify(gkey, &i, &pi)? {
                return Err(GroupSigError::JoinProtocolFailure(
                    "member exponent proof does not verify",
                ));
            }

            // gamma + t must be invertible for the certificate to exist
            let mut t = nonzero_scalar::<E::ScalarField, _>(rng);
            while (mgrkey.gamma + t).is_zero() {
                t = nonzero_scalar::<E::ScalarField, _>(rng);
            }
            let inv = (mgrkey.gamma + t)
                .inverse()
                .ok_or(GroupSigError::DegenerateGroupElement)?;
            let a = ((pi + gkey.q) * inv).into_affine();

            gml.append(GmlEntry {
                id: gml.next_id(),
                open_trapdoor: a,
                trace_trapdoor: pi,
            })?;

            let mut out = Vec::new();
            codec::put_ark(&mut out, &a)?;
            codec::put_ark(&mut out, &t)?;
            Ok(Message::from_bytes(out))
        }
        _ => Err(GroupSigError::UnexpectedJoinPhase(phase)),
    }
}

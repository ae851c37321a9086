//! De-anonymization: opening a signature to a member identity,
//! revealing a member's tracing trapdoor, and tracing signatures of
//! revoked members.

use crate::{
    codec::{self, Reader},
    cpy06::{keys::ManagerKey, sign::Signature},
    error::GroupSigError,
    gml::{Roster, RosterEntry},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_std::vec::Vec;

/// Group membership list entry, recorded by the manager at join time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GmlEntry<E: Pairing> {
    pub id: u64,
    /// The member's certificate `A`; equals the value recovered from
    /// any of the member's signatures when opening.
    pub open_trapdoor: E::G1Affine,
    /// `g1 * x`; pairs with a signature's `(T4, T5)` when tracing.
    pub trace_trapdoor: E::G1Affine,
}

/// Revocation list entry: a revealed tracing trapdoor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrlEntry<E: Pairing> {
    pub id: u64,
    pub trapdoor: E::G1Affine,
}

pub type Gml<E> = Roster<GmlEntry<E>>;
pub type Crl<E> = Roster<CrlEntry<E>>;

impl<E: Pairing> RosterEntry for GmlEntry<E> {
    fn id(&self) -> u64 {
        self.id
    }

    fn entry_size(&self) -> usize {
        codec::UINT_SIZE
            + codec::ark_size(&self.open_trapdoor)
            + codec::ark_size(&self.trace_trapdoor)
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<(), GroupSigError> {
        codec::put_uint(buf, self.id);
        codec::put_ark(buf, &self.open_trapdoor)?;
        codec::put_ark(buf, &self.trace_trapdoor)
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, GroupSigError> {
        Ok(Self {
            id: reader.uint()?,
            open_trapdoor: reader.ark()?,
            trace_trapdoor: reader.ark()?,
        })
    }
}

impl<E: Pairing> RosterEntry for CrlEntry<E> {
    fn id(&self) -> u64 {
        self.id
    }

    fn entry_size(&self) -> usize {
        codec::UINT_SIZE + codec::ark_size(&self.trapdoor)
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<(), GroupSigError> {
        codec::put_uint(buf, self.id);
        codec::put_ark(buf, &self.trapdoor)
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, GroupSigError> {
        Ok(Self {
            id: reader.uint()?,
            trapdoor: reader.ark()?,
        })
    }
}

/// Recovers the signer's certificate `A = T3 - (T1*xi1 + T2*xi2)` and
/// looks it up in the GML. `Ok(None)` when no live entry matches.
pub fn open<E: Pairing>(
    mgrkey: &ManagerKey<E>,
    gml: &Gml<E>,
    sig: &Signature<E>,
) -> Result<Option<u64>, GroupSigError> {
    let a = (sig.t3.into_group() - (sig.t1 * mgrkey.xi1 + sig.t2 * mgrkey.xi2))
        .into_affine();
    Ok(gml
        .iter()
        .find(|entry| entry.open_trapdoor == a)
        .map(|entry| entry.id))
}

/// Publishes the tracing trapdoor of member `id` on the CRL and
/// returns it.
pub fn reveal<E: Pairing>(
    gml: &Gml<E>,
    crl: &mut Crl<E>,
    id: u64,
) -> Result<E::G1Affine, GroupSigError> {
    let trapdoor = gml.get(id)?.trace_trapdoor;
    crl.append(CrlEntry {
        id: crl.next_id(),
        trapdoor,
    })?;
    Ok(trapdoor)
}

/// Whether `sig` was produced by any member on the CRL:
/// `e(trapdoor, T4) == T5` for a revoked trapdoor `g1*x` and a
/// signature handle `(T4, T5) = (w*r3, e(g1, w)^(r3*x))`.
pub fn trace<E: Pairing>(sig: &Signature<E>, crl: &Crl<E>) -> bool {
    crl.iter()
        .any(|entry| E::pairing(entry.trapdoor, sig.t4) == sig.t5)
}

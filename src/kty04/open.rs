//! Opening, revealing and tracing for the RSA scheme.

use crate::{
    codec::{self, Reader},
    error::GroupSigError,
    gml::{Roster, RosterEntry},
    kty04::{
        keys::{GroupKey, ManagerKey},
        mod_inverse,
        sign::Signature,
    },
};
use ark_std::vec::Vec;
use num_bigint::BigUint;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GmlEntry {
    pub id: u64,
    /// The certificate residue `A`, recovered when opening.
    pub open_trapdoor: BigUint,
    /// The tracing exponent `x'`, published on reveal.
    pub trace_trapdoor: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrlEntry {
    pub id: u64,
    pub trapdoor: BigUint,
}

pub type Gml = Roster<GmlEntry>;
pub type Crl = Roster<CrlEntry>;

impl RosterEntry for GmlEntry {
    fn id(&self) -> u64 {
        self.id
    }

    fn entry_size(&self) -> usize {
        codec::UINT_SIZE
            + codec::biguint_size(&self.open_trapdoor)
            + codec::biguint_size(&self.trace_trapdoor)
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<(), GroupSigError> {
        codec::put_uint(buf, self.id);
        codec::put_biguint(buf, &self.open_trapdoor);
        codec::put_biguint(buf, &self.trace_trapdoor);
        Ok(())
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, GroupSigError> {
        Ok(Self {
            id: reader.uint()?,
            open_trapdoor: reader.biguint()?,
            trace_trapdoor: reader.biguint()?,
        })
    }
}

impl RosterEntry for CrlEntry {
    fn id(&self) -> u64 {
        self.id
    }

    fn entry_size(&self) -> usize {
        codec::UINT_SIZE + codec::biguint_size(&self.trapdoor)
    }

    fn write(&self, buf: &mut Vec<u8>) -> Result<(), GroupSigError> {
        codec::put_uint(buf, self.id);
        codec::put_biguint(buf, &self.trapdoor);
        Ok(())
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, GroupSigError> {
        Ok(Self {
            id: reader.uint()?,
            trapdoor: reader.biguint()?,
        })
    }
}

/// Recovers the signer's certificate `A = T1 * (T2^x)^-1 mod n` and
/// looks it up in the GML.
pub fn open(
    mgrkey: &ManagerKey,
    gml: &Gml,
    sig: &Signature,
    gkey: &GroupKey,
) -> Result<Option<u64>, GroupSigError> {
    let t2x = sig.t2.modpow(&mgrkey.x, &gkey.n);
    let inv = mod_inverse(&t2x, &gkey.n).ok_or(
        GroupSigError::InvalidArgument("signature residue is not a unit"),
    )?;
    let a = (&sig.t1 * inv) % &gkey.n;
    Ok(gml
        .iter()
        .find(|entry| entry.open_trapdoor == a)
        .map(|entry| entry.id))
}

/// Publishes the tracing exponent of member `id` on the CRL.
pub fn reveal(
    gml: &Gml,
    crl: &mut Crl,
    id: u64,
) -> Result<BigUint, GroupSigError> {
    let trapdoor = gml.get(id)?.trace_trapdoor.clone();
    crl.append(CrlEntry {
        id: crl.next_id(),
        trapdoor: trapdoor.clone(),
    })?;
    Ok(trapdoor)
}

/// Whether `sig` was produced by a revoked member:
/// `T5 == T4^x' mod n` for some revealed exponent.
pub fn trace(sig: &Signature, gkey: &GroupKey, crl: &Crl) -> bool {
    crl.iter()
        .any(|entry| sig.t4.modpow(&entry.trapdoor, &gkey.n) == sig.t5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kty04::{sign::sign, testing};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn open_identifies_the_signer() {
        let mut rng = StdRng::seed_from_u64(120u64);
        let (gkey, mgrkey) = testing::group();
        let mut gml = testing::empty_gml();
        let k0 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let k1 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);

        let s0 = sign(&mut rng, b"Hello, World!", &k0, &gkey).unwrap();
        let s1 = sign(&mut rng, b"Hello, World!", &k1, &gkey).unwrap();

        assert_eq!(open(&mgrkey, &gml, &s0, &gkey).unwrap(), Some(0));
        assert_eq!(open(&mgrkey, &gml, &s1, &gkey).unwrap(), Some(1));

        gml.remove(0).unwrap();
        assert_eq!(open(&mgrkey, &gml, &s0, &gkey).unwrap(), None);
    }

    #[test]
    fn trace_flips_once_the_member_is_revealed() {
        let mut rng = StdRng::seed_from_u64(121u64);
        let (gkey, mgrkey) = testing::group();
        let mut gml = testing::empty_gml();
        let k0 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let k1 = testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);

        let s0 = sign(&mut rng, b"Hello, World!", &k0, &gkey).unwrap();
        let s1 = sign(&mut rng, b"Hello, Worlds!", &k1, &gkey).unwrap();

        let mut crl = Crl::new();
        assert!(!trace(&s0, &gkey, &crl));

        let revealed = reveal(&gml, &mut crl, 0).unwrap();
        assert_eq!(revealed, k0.xx);
        assert!(trace(&s0, &gkey, &crl));
        assert!(!trace(&s1, &gkey, &crl));
    }

    #[test]
    fn rosters_round_trip_through_export() {
        let mut rng = StdRng::seed_from_u64(122u64);
        let (gkey, mgrkey) = testing::group();
        let mut gml = testing::empty_gml();
        testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        testing::enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        gml.remove(0).unwrap();

        let bytes = gml.export().unwrap();
        assert_eq!(bytes.len(), gml.export_size());
        assert_eq!(Gml::import(&bytes).unwrap(), gml);

        let mut crl = Crl::new();
        reveal(&gml, &mut crl, 1).unwrap();
        let bytes = crl.export().unwrap();
        assert_eq!(Crl::import(&bytes).unwrap(), crl);
    }
}

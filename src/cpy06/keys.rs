//! CPY06 key material and group setup.

use crate::{
    codec::{self, Reader, TAG_GROUP_KEY, TAG_MANAGER_KEY, TAG_MEMBER_KEY},
    error::GroupSigError,
    scheme::Scheme,
};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_ff::{Field, Zero};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Public group context. Carries the generators explicitly along with
/// the pairings that every sign/verify would otherwise recompute; the
/// cached values are rebuilt on import rather than trusted from bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupKey<E: Pairing> {
    pub g1: E::G1Affine,
    pub q: E::G1Affine,
    pub z: E::G1Affine,
    /// `z * xi1^-1`, base of the first opening commitment.
    pub x: E::G1Affine,
    /// `z * xi2^-1`, base of the second opening commitment.
    pub y: E::G1Affine,
    pub g2: E::G2Affine,
    /// `g2 * gamma`, the issuing authority's public key.
    pub r: E::G2Affine,
    pub w: E::G2Affine,
    /// e(g1, w)
    pub t5: PairingOutput<E>,
    /// e(z, g2)
    pub e2: PairingOutput<E>,
    /// e(z, r)
    pub e3: PairingOutput<E>,
    /// e(g1, g2)
    pub e4: PairingOutput<E>,
    /// e(q, g2)
    pub e5: PairingOutput<E>,
}

/// Manager secrets. `xi1`/`xi2` open signatures, `gamma` issues
/// membership certificates; opening never touches `gamma` and issuing
/// never touches the `xi`s.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ManagerKey<E: Pairing> {
    pub xi1: E::ScalarField,
    pub xi2: E::ScalarField,
    pub gamma: E::ScalarField,
}

/// Member secret `x` with certificate `(a, t)`. Zeroed fields until the
/// join handshake fills them in; `scratch` holds the blinding values of
/// an unfinished join and is never exported.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MemberKey<E: Pairing> {
    pub x: E::ScalarField,
    pub t: E::ScalarField,
    #[zeroize(skip)]
    pub a: E::G1Affine,
    pub(crate) scratch: Option<JoinScratch<E::ScalarField>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub(crate) struct JoinScratch<F: Zeroize> {
    pub y: F,
    pub r: F,
}

impl<E: Pairing> Default for MemberKey<E> {
    fn default() -> Self {
        Self {
            x: E::ScalarField::zero(),
            t: E::ScalarField::zero(),
            a: E::G1Affine::zero(),
            scratch: None,
        }
    }
}

impl<E: Pairing> MemberKey<E> {
    /// Whether the join handshake has completed and the key can sign.
    pub fn is_complete(&self) -> bool {
        !self.a.is_zero() && self.scratch.is_none()
    }
}

pub(crate) fn nonzero_scalar<F: Field, R: RngCore>(rng: &mut R) -> F {
    let mut v = F::rand(rng);
    while v.is_zero() {
        v = F::rand(rng);
    }
    v
}

/// Creates a new group, returning the public context and the manager
/// key.
pub fn setup<E: Pairing, R: RngCore>(
    rng: &mut R,
) -> Result<(GroupKey<E>, ManagerKey<E>), GroupSigError> {
    let xi1 = nonzero_scalar::<E::ScalarField, _>(rng);
    let xi2 = nonzero_scalar::<E::ScalarField, _>(rng);
    let gamma = nonzero_scalar::<E::ScalarField, _>(rng);

    let g1 = E::G1Affine::generator();
    let g2 = E::G2Affine::generator();

    let q = E::G1::rand(rng).into_affine();
    let w = E::G2::rand(rng).into_affine();
    let mut z = E::G1::rand(rng);
    while z.is_zero() {
        z = E::G1::rand(rng);
    }
    let z = z.into_affine();

    let xi1_inv = xi1.inverse().ok_or(GroupSigError::DegenerateGroupElement)?;
    let xi2_inv = xi2.inverse().ok_or(GroupSigError::DegenerateGroupElement)?;
    let x = (z * xi1_inv).into_affine();
    let y = (z * xi2_inv).into_affine();
    let r = (g2 * gamma).into_affine();

    let gkey = GroupKey::with_cached_pairings(g1, q, z, x, y, g2, r, w);
    let mgrkey = ManagerKey { xi1, xi2, gamma };
    Ok((gkey, mgrkey))
}

impl<E: Pairing> GroupKey<E> {
    #[allow(clippy::too_many_arguments)]
    fn with_cached_pairings(
        g1: E::G1Affine,
        q: E::G1Affine,
        z: E::G1Affine,
        x: E::G1Affine,
        y: E::G1Affine,
        g2: E::G2Affine,
        r: E::G2Affine,
        w: E::G2Affine,
    ) -> Self {
        Self {
            t5: E::pairing(g1, w),
            e2: E::pairing(z, g2),
            e3: E::pairing(z, r),
            e4: E::pairing(g1, g2),
            e5: E::pairing(q, g2),
            g1,
            q,
            z,
            x,
            y,
            g2,
            r,
            w,
        }
    }

    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::ark_size(&self.g1)
            + codec::ark_size(&self.q)
            + codec::ark_size(&self.z)
            + codec::ark_size(&self.x)
            + codec::ark_size(&self.y)
            + codec::ark_size(&self.g2)
            + codec::ark_size(&self.r)
            + codec::ark_size(&self.w)
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Cpy06, TAG_GROUP_KEY);
        codec::put_ark(&mut buf, &self.g1)?;
        codec::put_ark(&mut buf, &self.q)?;
        codec::put_ark(&mut buf, &self.z)?;
        codec::put_ark(&mut buf, &self.x)?;
        codec::put_ark(&mut buf, &self.y)?;
        codec::put_ark(&mut buf, &self.g2)?;
        codec::put_ark(&mut buf, &self.r)?;
        codec::put_ark(&mut buf, &self.w)?;
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Cpy06, TAG_GROUP_KEY)?;
        let g1 = reader.ark()?;
        let q = reader.ark()?;
        let z = reader.ark()?;
        let x = reader.ark()?;
        let y = reader.ark()?;
        let g2 = reader.ark()?;
        let r = reader.ark()?;
        let w = reader.ark()?;
        reader.finish()?;
        Ok(Self::with_cached_pairings(g1, q, z, x, y, g2, r, w))
    }
}

impl<E: Pairing> ManagerKey<E> {
    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::ark_size(&self.xi1)
            + codec::ark_size(&self.xi2)
            + codec::ark_size(&self.gamma)
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Cpy06, TAG_MANAGER_KEY);
        codec::put_ark(&mut buf, &self.xi1)?;
        codec::put_ark(&mut buf, &self.xi2)?;
        codec::put_ark(&mut buf, &self.gamma)?;
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Cpy06, TAG_MANAGER_KEY)?;
        let xi1 = reader.ark()?;
        let xi2 = reader.ark()?;
        let gamma = reader.ark()?;
        reader.finish()?;
        Ok(Self { xi1, xi2, gamma })
    }
}

impl<E: Pairing> MemberKey<E> {
    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::ark_size(&self.x)
            + codec::ark_size(&self.t)
            + codec::ark_size(&self.a)
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Cpy06, TAG_MEMBER_KEY);
        codec::put_ark(&mut buf, &self.x)?;
        codec::put_ark(&mut buf, &self.t)?;
        codec::put_ark(&mut buf, &self.a)?;
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Cpy06, TAG_MEMBER_KEY)?;
        let x = reader.ark()?;
        let t = reader.ark()?;
        let a = reader.ark()?;
        reader.finish()?;
        Ok(Self {
            x,
            t,
            a,
            scratch: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_ec::pairing::Pairing;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type Fr = <Bls12_381 as Pairing>::ScalarField;

    #[test]
    fn setup_builds_consistent_context() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (gkey, mgrkey) = setup::<Bls12_381, _>(&mut rng).unwrap();

        assert_eq!((gkey.x * mgrkey.xi1).into_affine(), gkey.z);
        assert_eq!((gkey.y * mgrkey.xi2).into_affine(), gkey.z);
        assert_eq!((gkey.g2 * mgrkey.gamma).into_affine(), gkey.r);
        assert_eq!(gkey.t5, Bls12_381::pairing(gkey.g1, gkey.w));
        assert_eq!(gkey.e5, Bls12_381::pairing(gkey.q, gkey.g2));
    }

    #[test]
    fn keys_round_trip_through_export() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let (gkey, mgrkey) = setup::<Bls12_381, _>(&mut rng).unwrap();

        let bytes = gkey.export().unwrap();
        assert_eq!(bytes.len(), gkey.export_size());
        assert_eq!(GroupKey::<Bls12_381>::import(&bytes).unwrap(), gkey);

        let bytes = mgrkey.export().unwrap();
        assert_eq!(bytes.len(), mgrkey.export_size());
        assert_eq!(ManagerKey::<Bls12_381>::import(&bytes).unwrap(), mgrkey);

        let memkey = MemberKey::<Bls12_381> {
            x: Fr::from(7u64),
            t: Fr::from(11u64),
            a: (gkey.g1 * Fr::from(3u64)).into_affine(),
            scratch: None,
        };
        let bytes = memkey.export().unwrap();
        assert_eq!(bytes.len(), memkey.export_size());
        assert_eq!(MemberKey::<Bls12_381>::import(&bytes).unwrap(), memkey);
    }

    #[test]
    fn imports_reject_foreign_headers() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let (gkey, _) = setup::<Bls12_381, _>(&mut rng).unwrap();
        let mut bytes = gkey.export().unwrap();
        bytes[0] = Scheme::Kty04 as u8;
        assert!(matches!(
            GroupKey::<Bls12_381>::import(&bytes),
            Err(GroupSigError::SchemeMismatch { .. })
        ));
        assert!(matches!(
            ManagerKey::<Bls12_381>::import(&gkey.export().unwrap()),
            Err(GroupSigError::UnexpectedTypeTag { .. })
        ));
    }

    #[test]
    fn truncated_group_key_fails_import() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let (gkey, _) = setup::<Bls12_381, _>(&mut rng).unwrap();
        let bytes = gkey.export().unwrap();
        assert!(GroupKey::<Bls12_381>::import(&bytes[..bytes.len() - 1]).is_err());
        let mut extended = bytes;
        extended.push(0);
        assert!(matches!(
            GroupKey::<Bls12_381>::import(&extended),
            Err(GroupSigError::TrailingBytes(1))
        ));
    }
}

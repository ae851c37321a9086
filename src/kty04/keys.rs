//! KTY04 key material and group setup.

use crate::{
    codec::{self, Reader, TAG_GROUP_KEY, TAG_MANAGER_KEY, TAG_MEMBER_KEY},
    error::GroupSigError,
    kty04::{
        mod_inverse,
        prime::safe_prime,
        sphere::{self, Sphere},
    },
    scheme::Scheme,
};
use ark_std::{rand::RngCore, vec::Vec};
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Public group context: the modulus, the quadratic-residue generators
/// and the sphere family. The spheres are derived from
/// `(nu, epsilon, k)` and rebuilt on import rather than trusted from
/// bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupKey {
    pub n: BigUint,
    pub a: BigUint,
    pub a0: BigUint,
    pub b: BigUint,
    pub g: BigUint,
    pub h: BigUint,
    /// `g^x mod n` for the manager's opening exponent `x`.
    pub y: BigUint,
    pub nu: u64,
    pub epsilon: u64,
    pub k: u64,
    pub lambda: Sphere,
    pub m: Sphere,
    pub gamma: Sphere,
    pub inner_lambda: Sphere,
    pub inner_m: Sphere,
    pub inner_gamma: Sphere,
}

/// Manager secrets: the safe-prime factorization (issuing authority)
/// and the opening exponent (opening authority).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagerKey {
    pub p: BigUint,
    pub q: BigUint,
    pub x: BigUint,
    pub nu: u64,
}

impl ManagerKey {
    /// Order of the quadratic-residue group, `p' * q'`.
    pub(crate) fn group_order(&self) -> BigUint {
        let one = BigUint::one();
        ((&self.p - &one) >> 1u32) * ((&self.q - &one) >> 1u32)
    }
}

/// Member key `(A, e)` certificate over the secrets `x` and `x'`
/// (called `xx` here), with `C = b^xx` the join-time commitment.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MemberKey {
    pub a: BigUint,
    pub c: BigUint,
    pub x: BigUint,
    pub xx: BigUint,
    pub e: BigUint,
}

impl MemberKey {
    /// Whether the manager has issued the certificate.
    pub fn is_complete(&self) -> bool {
        !self.e.is_zero()
    }
}

fn random_qr<R: RngCore>(rng: &mut R, n: &BigUint) -> BigUint {
    // squares of random units generate QR(n)
    loop {
        let r = rng.gen_biguint_below(n);
        if r.is_zero() || !r.gcd(n).is_one() {
            continue;
        }
        let sq = (&r * &r) % n;
        if !sq.is_one() {
            return sq;
        }
    }
}

/// Creates a new group over a fresh `nu`-bit safe-prime modulus.
/// `epsilon` widens proof blindings, `k` is the challenge bit length
/// (a multiple of 8).
pub fn setup<R: RngCore>(
    rng: &mut R,
    nu: u64,
    epsilon: u64,
    k: u64,
) -> Result<(GroupKey, ManagerKey), GroupSigError> {
    if nu < 256 || nu % 4 != 0 {
        return Err(GroupSigError::InvalidArgument(
            "modulus bit length must be a multiple of 4, at least 256",
        ));
    }
    if epsilon < 2 {
        return Err(GroupSigError::InvalidArgument(
            "epsilon must be at least 2",
        ));
    }
    if k < 16 || k % 8 != 0 || epsilon * (k + 2) >= nu / 4 {
        return Err(GroupSigError::InvalidArgument(
            "challenge length must be a multiple of 8 fitting the spheres",
        ));
    }

    let (p, p_prime) = safe_prime(nu / 2, rng);
    let (q, q_prime) = loop {
        let (q, q_prime) = safe_prime(nu / 2, rng);
        if q != p {
            break (q, q_prime);
        }
    };
    let n = &p * &q;

    let a = random_qr(rng, &n);
    let a0 = random_qr(rng, &n);
    let b = random_qr(rng, &n);
    let g = random_qr(rng, &n);
    let h = random_qr(rng, &n);

    let order = &p_prime * &q_prime;
    let mut x = rng.gen_biguint_below(&order);
    while x.is_zero() {
        x = rng.gen_biguint_below(&order);
    }
    let y = g.modpow(&x, &n);

    let gkey = GroupKey::derive(n, a, a0, b, g, h, y, nu, epsilon, k);
    let mgrkey = ManagerKey { p, q, x, nu };
    Ok((gkey, mgrkey))
}

impl GroupKey {
    #[allow(clippy::too_many_arguments)]
    fn derive(
        n: BigUint,
        a: BigUint,
        a0: BigUint,
        b: BigUint,
        g: BigUint,
        h: BigUint,
        y: BigUint,
        nu: u64,
        epsilon: u64,
        k: u64,
    ) -> Self {
        let lambda = sphere::lambda(nu);
        let m = sphere::m(nu);
        let gamma = sphere::gamma(nu);
        Self {
            inner_lambda: lambda.inner(epsilon, k),
            inner_m: m.inner(epsilon, k),
            inner_gamma: gamma.inner(epsilon, k),
            lambda,
            m,
            gamma,
            n,
            a,
            a0,
            b,
            g,
            h,
            y,
            nu,
            epsilon,
            k,
        }
    }

    /// Whether `v` is invertible mod `n`, i.e. a usable residue.
    pub(crate) fn unit(&self, v: &BigUint) -> bool {
        !v.is_zero() && v.gcd(&self.n).is_one()
    }

    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::biguint_size(&self.n)
            + codec::biguint_size(&self.a)
            + codec::biguint_size(&self.a0)
            + codec::biguint_size(&self.b)
            + codec::biguint_size(&self.g)
            + codec::biguint_size(&self.h)
            + codec::biguint_size(&self.y)
            + 3 * codec::UINT_SIZE
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Kty04, TAG_GROUP_KEY);
        codec::put_biguint(&mut buf, &self.n);
        codec::put_biguint(&mut buf, &self.a);
        codec::put_biguint(&mut buf, &self.a0);
        codec::put_biguint(&mut buf, &self.b);
        codec::put_biguint(&mut buf, &self.g);
        codec::put_biguint(&mut buf, &self.h);
        codec::put_biguint(&mut buf, &self.y);
        codec::put_uint(&mut buf, self.nu);
        codec::put_uint(&mut buf, self.epsilon);
        codec::put_uint(&mut buf, self.k);
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Kty04, TAG_GROUP_KEY)?;
        let n = reader.biguint()?;
        let a = reader.biguint()?;
        let a0 = reader.biguint()?;
        let b = reader.biguint()?;
        let g = reader.biguint()?;
        let h = reader.biguint()?;
        let y = reader.biguint()?;
        let nu = reader.uint()?;
        let epsilon = reader.uint()?;
        let k = reader.uint()?;
        reader.finish()?;
        if n.is_zero() || epsilon < 2 || k < 16 {
            return Err(GroupSigError::InvalidArgument(
                "imported group key has degenerate parameters",
            ));
        }
        Ok(Self::derive(n, a, a0, b, g, h, y, nu, epsilon, k))
    }
}

impl ManagerKey {
    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::biguint_size(&self.p)
            + codec::biguint_size(&self.q)
            + codec::biguint_size(&self.x)
            + codec::UINT_SIZE
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Kty04, TAG_MANAGER_KEY);
        codec::put_biguint(&mut buf, &self.p);
        codec::put_biguint(&mut buf, &self.q);
        codec::put_biguint(&mut buf, &self.x);
        codec::put_uint(&mut buf, self.nu);
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Kty04, TAG_MANAGER_KEY)?;
        let key = Self {
            p: reader.biguint()?,
            q: reader.biguint()?,
            x: reader.biguint()?,
            nu: reader.uint()?,
        };
        reader.finish()?;
        Ok(key)
    }
}

impl MemberKey {
    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::biguint_size(&self.a)
            + codec::biguint_size(&self.c)
            + codec::biguint_size(&self.x)
            + codec::biguint_size(&self.xx)
            + codec::biguint_size(&self.e)
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Kty04, TAG_MEMBER_KEY);
        codec::put_biguint(&mut buf, &self.a);
        codec::put_biguint(&mut buf, &self.c);
        codec::put_biguint(&mut buf, &self.x);
        codec::put_biguint(&mut buf, &self.xx);
        codec::put_biguint(&mut buf, &self.e);
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Kty04, TAG_MEMBER_KEY)?;
        let key = Self {
            a: reader.biguint()?,
            c: reader.biguint()?,
            x: reader.biguint()?,
            xx: reader.biguint()?,
            e: reader.biguint()?,
        };
        reader.finish()?;
        Ok(key)
    }
}

/// `e^-1 mod p'q'`; fails when `e` shares a factor with the group
/// order, in which case the manager redraws.
pub(crate) fn certificate_exponent(
    mgrkey: &ManagerKey,
    e: &BigUint,
) -> Option<BigUint> {
    mod_inverse(e, &mgrkey.group_order())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kty04::testing;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn setup_produces_a_consistent_group() {
        let (gkey, mgrkey) = testing::group();
        assert_eq!(&mgrkey.p * &mgrkey.q, gkey.n);
        assert_eq!(gkey.g.modpow(&mgrkey.x, &gkey.n), gkey.y);
        assert_eq!(gkey.nu, 512);
        // generators are units
        for v in [&gkey.a, &gkey.a0, &gkey.b, &gkey.g, &gkey.h, &gkey.y] {
            assert!(gkey.unit(v));
        }
        assert!(gkey.inner_lambda.radius < gkey.lambda.radius);
    }

    #[test]
    fn setup_rejects_bad_parameters() {
        let mut rng = StdRng::seed_from_u64(0u64);
        assert!(setup(&mut rng, 100, 2, 32).is_err());
        assert!(setup(&mut rng, 512, 1, 32).is_err());
        assert!(setup(&mut rng, 512, 2, 12).is_err());
        assert!(setup(&mut rng, 512, 2, 33).is_err());
    }

    #[test]
    fn keys_round_trip_through_export() {
        let (gkey, mgrkey) = testing::group();

        let bytes = gkey.export().unwrap();
        assert_eq!(bytes.len(), gkey.export_size());
        assert_eq!(GroupKey::import(&bytes).unwrap(), gkey);

        let bytes = mgrkey.export().unwrap();
        assert_eq!(bytes.len(), mgrkey.export_size());
        assert_eq!(ManagerKey::import(&bytes).unwrap(), mgrkey);

        let memkey = MemberKey {
            a: BigUint::from(5u32),
            c: BigUint::from(6u32),
            x: BigUint::from(7u32),
            xx: BigUint::from(8u32),
            e: BigUint::from(9u32),
        };
        let bytes = memkey.export().unwrap();
        assert_eq!(bytes.len(), memkey.export_size());
        assert_eq!(MemberKey::import(&bytes).unwrap(), memkey);
    }

    #[test]
    fn imports_reject_foreign_headers() {
        let (gkey, _) = testing::group();
        let mut bytes = gkey.export().unwrap();
        bytes[0] = Scheme::Cpy06 as u8;
        assert!(matches!(
            GroupKey::import(&bytes),
            Err(GroupSigError::SchemeMismatch { .. })
        ));
        assert!(matches!(
            MemberKey::import(&gkey.export().unwrap()),
            Err(GroupSigError::UnexpectedTypeTag { .. })
        ));
    }
}

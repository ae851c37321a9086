//! Integer spheres: the public intervals witnesses live in.
//!
//! A sphere `S(center, radius)` is the interval
//! `[center - radius, center + radius]`. The group key derives three
//! from the modulus bit length nu:
//! `Lambda = S(2^(nu/4-1), 2^(nu/4-1))` for member exponents,
//! `M = S(2^(nu/2-1), 2^(nu/2-1))` for issuing exponents, and
//! `Gamma = S(2^(3nu/4) + 2^(nu/4-1), 2^(nu/4-1))` for certificate
//! primes. Witnesses are drawn from shrunken inner spheres so that
//! proof responses stay inside the outer sphere bound.

use ark_std::rand::RngCore;
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::One;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sphere {
    pub center: BigUint,
    pub radius: BigUint,
}

impl Sphere {
    pub fn new(center: BigUint, radius: BigUint) -> Self {
        Self { center, radius }
    }

    pub fn min(&self) -> BigUint {
        // the derived families always have center >= radius
        &self.center - &self.radius
    }

    pub fn max(&self) -> BigUint {
        &self.center + &self.radius
    }

    pub fn contains(&self, v: &BigUint) -> bool {
        *v >= self.min() && *v <= self.max()
    }

    /// Bit length of the radius; the `mu` of the interval proof.
    pub fn radius_bits(&self) -> u64 {
        self.radius.bits()
    }

    /// Uniform draw from the sphere.
    pub fn sample<R: RngCore>(&self, rng: &mut R) -> BigUint {
        let min = self.min();
        let max = self.max();
        rng.gen_biguint_range(&min, &(max + BigUint::one()))
    }

    /// The inner sphere witnesses are drawn from: same center, radius
    /// shrunk to `2^(radius_bits/epsilon - k - 2)`. Responses
    /// `b + c*(w - center)` over witnesses of the inner sphere stay
    /// below `2^(epsilon*(radius_bits + k) + 1)`, the bound
    /// verification enforces against the outer sphere.
    pub fn inner(&self, epsilon: u64, k: u64) -> Self {
        let bits = self.radius_bits() / epsilon;
        let bits = bits.saturating_sub(k + 2).max(1);
        Self {
            center: self.center.clone(),
            radius: BigUint::one() << bits,
        }
    }
}

/// Sphere of member exponents.
pub fn lambda(nu: u64) -> Sphere {
    let r = BigUint::one() << (nu / 4 - 1);
    Sphere::new(r.clone(), r)
}

/// Sphere of issuing exponents.
pub fn m(nu: u64) -> Sphere {
    let r = BigUint::one() << (nu / 2 - 1);
    Sphere::new(r.clone(), r)
}

/// Sphere of certificate primes.
pub fn gamma(nu: u64) -> Sphere {
    let r = BigUint::one() << (nu / 4 - 1);
    Sphere::new((BigUint::one() << (3 * nu / 4)) + &r, r)
}

/// Signed uniform draw from `[-2^bits, 2^bits]`, used for proof
/// blindings.
pub fn sample_signed<R: RngCore>(rng: &mut R, bits: u64) -> BigInt {
    let bound = BigInt::one() << bits;
    rng.gen_bigint_range(&(-&bound), &(bound + BigInt::one()))
}

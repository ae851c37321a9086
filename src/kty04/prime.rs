//! Probable-prime testing and generation for the RSA group setup. The
//! modulus is a product of two safe primes, and each membership
//! certificate carries a prime drawn from the Gamma sphere.

use crate::kty04::sphere::Sphere;
use ark_std::rand::RngCore;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;

const MILLER_RABIN_ROUNDS: usize = 40;

// primes below 1000, for cheap sieving before Miller-Rabin
const SMALL_PRIMES: [u32; 168] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67,
    71, 73, 79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149,
    151, 157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227,
    229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389,
    397, 401, 409, 419, 421, 431, 433, 439, 443, 449, 457, 461, 463, 467,
    479, 487, 491, 499, 503, 509, 521, 523, 541, 547, 557, 563, 569, 571,
    577, 587, 593, 599, 601, 607, 613, 617, 619, 631, 641, 643, 647, 653,
    659, 661, 673, 677, 683, 691, 701, 709, 719, 727, 733, 739, 743, 751,
    757, 761, 769, 773, 787, 797, 809, 811, 821, 823, 827, 829, 839, 853,
    857, 859, 863, 877, 881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,
];

/// Miller-Rabin with random bases, preceded by a small-prime sieve.
pub fn is_probable_prime<R: RngCore>(n: &BigUint, rng: &mut R) -> bool {
    if n < &BigUint::from(2u32) {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if n.is_multiple_of(&p) {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let n_minus_1 = n - &one;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;

    'witness: for _ in 0..MILLER_RABIN_ROUNDS {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Random `bits`-bit prime with the top bit set.
pub fn random_prime<R: RngCore>(bits: u64, rng: &mut R) -> BigUint {
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate, rng) {
            return candidate;
        }
    }
}

/// Random safe prime `p = 2p' + 1` of `bits` bits; returns `(p, p')`.
pub fn safe_prime<R: RngCore>(bits: u64, rng: &mut R) -> (BigUint, BigUint) {
    let one = BigUint::one();
    loop {
        let mut p_prime = rng.gen_biguint(bits - 1);
        p_prime.set_bit(bits - 2, true);
        p_prime.set_bit(0, true);
        if !is_probable_prime(&p_prime, rng) {
            continue;
        }
        let p = (&p_prime << 1u32) + &one;
        if is_probable_prime(&p, rng) {
            return (p, p_prime);
        }
    }
}

/// Random prime inside a sphere. Gives up only if the sphere is so
/// narrow that no odd candidate is prime, which the derived families
/// never are.
pub fn prime_in_sphere<R: RngCore>(sphere: &Sphere, rng: &mut R) -> BigUint {
    loop {
        let mut candidate = sphere.sample(rng);
        if candidate.is_even() {
            if candidate == sphere.max() {
                candidate -= BigUint::one();
            } else {
                candidate += BigUint::one();
            }
        }
        if is_probable_prime(&candidate, rng) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kty04::sphere;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn classifies_known_primes_and_composites() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for p in [2u64, 3, 5, 7, 65537, 2147483647] {
            assert!(is_probable_prime(&BigUint::from(p), &mut rng), "{p}");
        }
        for c in [0u64, 1, 4, 561, 65536, 2147483647 * 3] {
            assert!(!is_probable_prime(&BigUint::from(c), &mut rng), "{c}");
        }
    }

    #[test]
    fn generated_primes_have_requested_size() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let p = random_prime(64, &mut rng);
        assert_eq!(p.bits(), 64);
        assert!(is_probable_prime(&p, &mut rng));
    }

    #[test]
    fn safe_primes_are_safe() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let (p, p_prime) = safe_prime(128, &mut rng);
        assert_eq!(p.bits(), 128);
        assert_eq!(p, (&p_prime << 1u32) + BigUint::one());
        assert!(is_probable_prime(&p, &mut rng));
        assert!(is_probable_prime(&p_prime, &mut rng));
    }

    #[test]
    fn sphere_primes_stay_inside() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let s = sphere::gamma(512).inner(2, 32);
        let e = prime_in_sphere(&s, &mut rng);
        assert!(s.contains(&e));
        assert!(is_probable_prime(&e, &mut rng));
    }
}

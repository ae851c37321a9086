//! Signature generation and verification.
//!
//! A signature proves knowledge of a certificate `(A, e)` over secrets
//! `(x, x')` with `A^e = a^x * b^x' * a0 mod n`, via seven residues:
//! `T1 = A*y^r` and `T2 = g^r` blind the certificate for opening,
//! `T3 = g^e * h^r` commits to the prime, `(T4, T5) = (g^k, T4^x')` is
//! the tracing handle and `(T7, T6) = (g^k', T7^x)` the claiming
//! handle. Nine discrete-log relations tie them together; responses
//! are integers offset by the public sphere centers, and verification
//! range-checks the sphere-bound responses.

use crate::{
    codec::{self, Reader, TAG_SIGNATURE},
    error::GroupSigError,
    kty04::{
        challenge,
        keys::{GroupKey, MemberKey},
        powm,
        sphere::sample_signed,
    },
    scheme::Scheme,
};
use ark_std::{rand::RngCore, vec::Vec};
use num_bigint::{BigInt, BigUint};

const CHALLENGE_DOMAIN: &[u8] = b"KTY04-SIGN-CHALLENGE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub c: BigUint,
    pub t1: BigUint,
    pub t2: BigUint,
    pub t3: BigUint,
    pub t4: BigUint,
    pub t5: BigUint,
    pub t6: BigUint,
    pub t7: BigUint,
    pub sx: BigInt,
    pub sxx: BigInt,
    pub se: BigInt,
    pub sr: BigInt,
    pub ser: BigInt,
    pub sk: BigInt,
    pub skxx: BigInt,
    pub skp: BigInt,
}

/// Blinding bit widths per witness. Sphere-bound witnesses blind their
/// distance to the sphere center; product witnesses blind their full
/// magnitude.
struct Widths {
    x: u64,
    xx: u64,
    e: u64,
    r: u64,
    er: u64,
    k: u64,
    kxx: u64,
    kp: u64,
}

impl Widths {
    fn of(gkey: &GroupKey) -> Self {
        let eps = gkey.epsilon;
        let kb = gkey.k;
        let m = gkey.m.radius_bits();
        let lambda = gkey.lambda.radius_bits();
        let gamma = gkey.gamma.radius_bits();
        Self {
            x: eps * (m + kb),
            xx: eps * (lambda + kb),
            e: eps * (gamma + kb),
            r: eps * (m + kb),
            er: eps * (gkey.gamma.max().bits() + gkey.m.max().bits() + kb),
            k: eps * (m + kb),
            kxx: eps * (gkey.m.max().bits() + gkey.lambda.max().bits() + kb),
            kp: eps * (m + kb),
        }
    }
}

fn response(b: &BigInt, c: &BigInt, witness: &BigUint, center: &BigUint) -> BigInt {
    b + c * (BigInt::from(witness.clone()) - BigInt::from(center.clone()))
}

#[allow(clippy::too_many_arguments)]
fn transcript_challenge(
    message: &[u8],
    gkey: &GroupKey,
    t: [&BigUint; 7],
    b: [&BigUint; 9],
) -> BigUint {
    let mut bytes = Vec::new();
    codec::put_field(&mut bytes, message);
    for v in t {
        crate::kty04::absorb(&mut bytes, v);
    }
    for v in b {
        crate::kty04::absorb(&mut bytes, v);
    }
    challenge(CHALLENGE_DOMAIN, &bytes, gkey.k)
}

/// Signs `message` with a completed member key.
pub fn sign<R: RngCore>(
    rng: &mut R,
    message: &[u8],
    memkey: &MemberKey,
    gkey: &GroupKey,
) -> Result<Signature, GroupSigError> {
    if !memkey.is_complete() {
        return Err(GroupSigError::InvalidArgument(
            "member key has no certificate",
        ));
    }
    let n = &gkey.n;

    let r = gkey.inner_m.sample(rng);
    let kk = gkey.inner_m.sample(rng);
    let kp = gkey.inner_m.sample(rng);
    let er = &memkey.e * &r;
    let kxx = &kk * &memkey.xx;

    let t1 = (&memkey.a * gkey.y.modpow(&r, n)) % n;
    let t2 = gkey.g.modpow(&r, n);
    let t3 = (gkey.g.modpow(&memkey.e, n) * gkey.h.modpow(&r, n)) % n;
    let t4 = gkey.g.modpow(&kk, n);
    let t5 = t4.modpow(&memkey.xx, n);
    let t7 = gkey.g.modpow(&kp, n);
    let t6 = t7.modpow(&memkey.x, n);

    let w = Widths::of(gkey);
    let b_x = sample_signed(rng, w.x);
    let b_xx = sample_signed(rng, w.xx);
    let b_e = sample_signed(rng, w.e);
    let b_r = sample_signed(rng, w.r);
    let b_er = sample_signed(rng, w.er);
    let b_k = sample_signed(rng, w.k);
    let b_kxx = sample_signed(rng, w.kxx);
    let b_kp = sample_signed(rng, w.kp);

    let b1 = powm(&gkey.g, &b_r, n)?;
    let b2 = (powm(&gkey.g, &b_e, n)? * powm(&gkey.h, &b_r, n)?) % n;
    let b3 = (powm(&t2, &b_e, n)? * powm(&gkey.g, &(-&b_er), n)?) % n;
    let b4 = powm(&gkey.g, &b_k, n)?;
    let b5 = powm(&gkey.g, &b_kxx, n)?;
    let b6 = powm(&t4, &b_xx, n)?;
    let b7 = powm(&gkey.g, &b_kp, n)?;
    let b8 = powm(&t7, &b_x, n)?;
    let b9 = (((powm(&t1, &b_e, n)? * powm(&gkey.a, &(-&b_x), n)?) % n
        * powm(&gkey.b, &(-&b_xx), n)?)
        % n
        * powm(&gkey.y, &(-&b_er), n)?)
        % n;

    let c = transcript_challenge(
        message,
        gkey,
        [&t1, &t2, &t3, &t4, &t5, &t6, &t7],
        [&b1, &b2, &b3, &b4, &b5, &b6, &b7, &b8, &b9],
    );
    let ci = BigInt::from(c.clone());
    let zero = BigUint::from(0u32);

    Ok(Signature {
        sx: response(&b_x, &ci, &memkey.x, &gkey.m.center),
        sxx: response(&b_xx, &ci, &memkey.xx, &gkey.lambda.center),
        se: response(&b_e, &ci, &memkey.e, &gkey.gamma.center),
        sr: response(&b_r, &ci, &r, &gkey.m.center),
        ser: response(&b_er, &ci, &er, &zero),
        sk: response(&b_k, &ci, &kk, &gkey.m.center),
        skxx: response(&b_kxx, &ci, &kxx, &zero),
        skp: response(&b_kp, &ci, &kp, &gkey.m.center),
        c,
        t1,
        t2,
        t3,
        t4,
        t5,
        t6,
        t7,
    })
}

fn in_range(s: &BigInt, bits: u64) -> bool {
    s.magnitude().bits() <= bits + 1
}

/// Checks `sig` over `message`; `Ok(false)` when it does not hold.
pub fn verify(
    sig: &Signature,
    message: &[u8],
    gkey: &GroupKey,
) -> Result<bool, GroupSigError> {
    let n = &gkey.n;
    for t in [
        &sig.t1, &sig.t2, &sig.t3, &sig.t4, &sig.t5, &sig.t6, &sig.t7,
    ] {
        if !gkey.unit(t) {
            return Ok(false);
        }
    }

    // responses of sphere-bound witnesses must respect the outer bound
    let w = Widths::of(gkey);
    if !in_range(&sig.sx, w.x)
        || !in_range(&sig.sxx, w.xx)
        || !in_range(&sig.se, w.e)
        || !in_range(&sig.sr, w.r)
    {
        return Ok(false);
    }

    let c = BigInt::from(sig.c.clone());
    let neg_c = -&c;
    let ex_x = &sig.sx + &c * BigInt::from(gkey.m.center.clone());
    let ex_xx = &sig.sxx + &c * BigInt::from(gkey.lambda.center.clone());
    let ex_e = &sig.se + &c * BigInt::from(gkey.gamma.center.clone());
    let ex_r = &sig.sr + &c * BigInt::from(gkey.m.center.clone());
    let ex_k = &sig.sk + &c * BigInt::from(gkey.m.center.clone());
    let ex_kp = &sig.skp + &c * BigInt::from(gkey.m.center.clone());

    let b1 = (powm(&gkey.g, &ex_r, n)? * powm(&sig.t2, &neg_c, n)?) % n;
    let b2 = ((powm(&gkey.g, &ex_e, n)? * powm(&gkey.h, &ex_r, n)?) % n
        * powm(&sig.t3, &neg_c, n)?)
        % n;
    let b3 = (powm(&sig.t2, &ex_e, n)? * powm(&gkey.g, &(-&sig.ser), n)?) % n;
    let b4 = (powm(&gkey.g, &ex_k, n)? * powm(&sig.t4, &neg_c, n)?) % n;
    let b5 = (powm(&gkey.g, &sig.skxx, n)? * powm(&sig.t5, &neg_c, n)?) % n;
    let b6 = (powm(&sig.t4, &ex_xx, n)? * powm(&sig.t5, &neg_c, n)?) % n;
    let b7 = (powm(&gkey.g, &ex_kp, n)? * powm(&sig.t7, &neg_c, n)?) % n;
    let b8 = (powm(&sig.t7, &ex_x, n)? * powm(&sig.t6, &neg_c, n)?) % n;
    let b9 = ((((powm(&sig.t1, &ex_e, n)? * powm(&gkey.a, &(-&ex_x), n)?) % n
        * powm(&gkey.b, &(-&ex_xx), n)?)
        % n
        * powm(&gkey.y, &(-&sig.ser), n)?)
        % n
        * powm(&gkey.a0, &neg_c, n)?)
        % n;

    let expected = transcript_challenge(
        message,
        gkey,
        [
            &sig.t1, &sig.t2, &sig.t3, &sig.t4, &sig.t5, &sig.t6, &sig.t7,
        ],
        [&b1, &b2, &b3, &b4, &b5, &b6, &b7, &b8, &b9],
    );
    Ok(expected == sig.c)
}

impl Signature {
    pub fn export_size(&self) -> usize {
        codec::HEADER_SIZE
            + codec::biguint_size(&self.c)
            + codec::biguint_size(&self.t1)
            + codec::biguint_size(&self.t2)
            + codec::biguint_size(&self.t3)
            + codec::biguint_size(&self.t4)
            + codec::biguint_size(&self.t5)
            + codec::biguint_size(&self.t6)
            + codec::biguint_size(&self.t7)
            + codec::bigint_size(&self.sx)
            + codec::bigint_size(&self.sxx)
            + codec::bigint_size(&self.se)
            + codec::bigint_size(&self.sr)
            + codec::bigint_size(&self.ser)
            + codec::bigint_size(&self.sk)
            + codec::bigint_size(&self.skxx)
            + codec::bigint_size(&self.skp)
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_header(&mut buf, Scheme::Kty04, TAG_SIGNATURE);
        codec::put_biguint(&mut buf, &self.c);
        codec::put_biguint(&mut buf, &self.t1);
        codec::put_biguint(&mut buf, &self.t2);
        codec::put_biguint(&mut buf, &self.t3);
        codec::put_biguint(&mut buf, &self.t4);
        codec::put_biguint(&mut buf, &self.t5);
        codec::put_biguint(&mut buf, &self.t6);
        codec::put_biguint(&mut buf, &self.t7);
        codec::put_bigint(&mut buf, &self.sx);
        codec::put_bigint(&mut buf, &self.sxx);
        codec::put_bigint(&mut buf, &self.se);
        codec::put_bigint(&mut buf, &self.sr);
        codec::put_bigint(&mut buf, &self.ser);
        codec::put_bigint(&mut buf, &self.sk);
        codec::put_bigint(&mut buf, &self.skxx);
        codec::put_bigint(&mut buf, &self.skp);
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        reader.expect_header(Scheme::Kty04, TAG_SIGNATURE)?;
        let sig = Self {
            c: reader.biguint()?,
            t1: reader.biguint()?,
            t2: reader.biguint()?,
            t3: reader.biguint()?,
            t4: reader.biguint()?,
            t5: reader.biguint()?,
            t6: reader.biguint()?,
            t7: reader.biguint()?,
            sx: reader.bigint()?,
            sxx: reader.bigint()?,
            se: reader.bigint()?,
            sr: reader.bigint()?,
            ser: reader.bigint()?,
            sk: reader.bigint()?,
            skxx: reader.bigint()?,
            skp: reader.bigint()?,
        };
        reader.finish()?;
        Ok(sig)
    }
}

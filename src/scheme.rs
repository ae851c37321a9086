//! Scheme-tagged artifacts and the scheme-generic operation surface.
//!
//! The supported schemes form a closed set: every artifact is an enum
//! over the per-scheme types, and the free functions here dispatch on
//! the tag, rejecting mismatched combinations before any cryptography
//! runs. The CPY06 scheme is instantiated over BLS12-381.

use crate::{
    codec,
    cpy06,
    error::GroupSigError,
    kty04,
    message::Message,
};
use ark_bls12_381::Bls12_381;
use ark_std::{
    fmt,
    rand::RngCore,
    vec::Vec,
};
use num_bigint::BigUint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Scheme {
    Cpy06 = 1,
    Kty04 = 2,
}

impl Scheme {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, GroupSigError> {
        match tag {
            1 => Ok(Self::Cpy06),
            2 => Ok(Self::Kty04),
            other => Err(GroupSigError::UnknownSchemeTag(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Cpy06 => "cpy06",
            Self::Kty04 => "kty04",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default KTY04 parameters for [`setup`]: 2048-bit modulus, epsilon 2,
/// 128-bit challenges.
pub const KTY04_MODULUS_BITS: u64 = 2048;
pub const KTY04_EPSILON: u64 = 2;
pub const KTY04_CHALLENGE_BITS: u64 = 128;

macro_rules! tagged_artifact {
    ($(#[$doc:meta])* $name:ident, $cpy06:ty, $kty04:ty) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum $name {
            Cpy06($cpy06),
            Kty04($kty04),
        }

        impl $name {
            pub fn scheme(&self) -> Scheme {
                match self {
                    Self::Cpy06(_) => Scheme::Cpy06,
                    Self::Kty04(_) => Scheme::Kty04,
                }
            }

            pub fn export_size(&self) -> usize {
                match self {
                    Self::Cpy06(inner) => inner.export_size(),
                    Self::Kty04(inner) => inner.export_size(),
                }
            }

            pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
                match self {
                    Self::Cpy06(inner) => inner.export(),
                    Self::Kty04(inner) => inner.export(),
                }
            }

            pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
                match codec::peek_scheme(bytes)? {
                    Scheme::Cpy06 => {
                        <$cpy06>::import(bytes).map(Self::Cpy06)
                    }
                    Scheme::Kty04 => {
                        <$kty04>::import(bytes).map(Self::Kty04)
                    }
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let bytes = self.export().map_err(|_| fmt::Error)?;
                write!(f, "{}:", self.scheme())?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    };
}

tagged_artifact!(
    /// Public group context of either scheme.
    GroupKey,
    cpy06::GroupKey<Bls12_381>,
    kty04::GroupKey
);
tagged_artifact!(
    /// Manager secrets of either scheme.
    ManagerKey,
    cpy06::ManagerKey<Bls12_381>,
    kty04::ManagerKey
);
tagged_artifact!(
    /// Member key of either scheme.
    MemberKey,
    cpy06::MemberKey<Bls12_381>,
    kty04::MemberKey
);
tagged_artifact!(
    /// Group signature of either scheme.
    Signature,
    cpy06::Signature<Bls12_381>,
    kty04::Signature
);
tagged_artifact!(
    /// Authorship (claim / equality) proof of either scheme.
    Proof,
    cpy06::EqualityProof<Bls12_381>,
    kty04::EqualityProof
);

/// Group membership list of either scheme. List exports carry no
/// scheme header, so imports take the scheme explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gml {
    Cpy06(cpy06::Gml<Bls12_381>),
    Kty04(kty04::Gml),
}

/// Revocation list of either scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Crl {
    Cpy06(cpy06::Crl<Bls12_381>),
    Kty04(kty04::Crl),
}

/// A revealed tracing trapdoor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trapdoor {
    Cpy06(<Bls12_381 as ark_ec::pairing::Pairing>::G1Affine),
    Kty04(BigUint),
}

macro_rules! tagged_roster {
    ($name:ident, $cpy06:ty, $kty04:ty) => {
        impl $name {
            pub fn new(scheme: Scheme) -> Self {
                match scheme {
                    Scheme::Cpy06 => Self::Cpy06(<$cpy06>::new()),
                    Scheme::Kty04 => Self::Kty04(<$kty04>::new()),
                }
            }

            pub fn scheme(&self) -> Scheme {
                match self {
                    Self::Cpy06(_) => Scheme::Cpy06,
                    Self::Kty04(_) => Scheme::Kty04,
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    Self::Cpy06(inner) => inner.len(),
                    Self::Kty04(inner) => inner.len(),
                }
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            pub fn remove(&mut self, id: u64) -> Result<(), GroupSigError> {
                match self {
                    Self::Cpy06(inner) => inner.remove(id).map(|_| ()),
                    Self::Kty04(inner) => inner.remove(id).map(|_| ()),
                }
            }

            pub fn export_size(&self) -> usize {
                match self {
                    Self::Cpy06(inner) => inner.export_size(),
                    Self::Kty04(inner) => inner.export_size(),
                }
            }

            pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
                match self {
                    Self::Cpy06(inner) => inner.export(),
                    Self::Kty04(inner) => inner.export(),
                }
            }

            pub fn import(
                scheme: Scheme,
                bytes: &[u8],
            ) -> Result<Self, GroupSigError> {
                match scheme {
                    Scheme::Cpy06 => {
                        <$cpy06>::import(bytes).map(Self::Cpy06)
                    }
                    Scheme::Kty04 => {
                        <$kty04>::import(bytes).map(Self::Kty04)
                    }
                }
            }
        }
    };
}

tagged_roster!(Gml, cpy06::Gml<Bls12_381>, kty04::Gml);
tagged_roster!(Crl, cpy06::Crl<Bls12_381>, kty04::Crl);

impl Trapdoor {
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Cpy06(_) => Scheme::Cpy06,
            Self::Kty04(_) => Scheme::Kty04,
        }
    }
}

fn mismatch(expected: Scheme, found: Scheme) -> GroupSigError {
    GroupSigError::SchemeMismatch { expected, found }
}

/// `(first phase, last phase)` of the join handshake; the member runs
/// even phases, the manager odd ones.
pub fn join_bounds(scheme: Scheme) -> (u8, u8) {
    match scheme {
        Scheme::Cpy06 => (cpy06::JOIN_START, cpy06::JOIN_SEQ),
        Scheme::Kty04 => (kty04::JOIN_START, kty04::JOIN_SEQ),
    }
}

/// Creates a new group. KTY04 groups use the default parameters
/// ([`KTY04_MODULUS_BITS`] etc.); call `kty04::setup` directly to pick
/// others.
pub fn setup<R: RngCore>(
    scheme: Scheme,
    rng: &mut R,
) -> Result<(GroupKey, ManagerKey, Gml), GroupSigError> {
    match scheme {
        Scheme::Cpy06 => {
            let (gkey, mgrkey) = cpy06::setup::<Bls12_381, _>(rng)?;
            Ok((
                GroupKey::Cpy06(gkey),
                ManagerKey::Cpy06(mgrkey),
                Gml::new(scheme),
            ))
        }
        Scheme::Kty04 => {
            let (gkey, mgrkey) = kty04::setup(
                rng,
                KTY04_MODULUS_BITS,
                KTY04_EPSILON,
                KTY04_CHALLENGE_BITS,
            )?;
            Ok((
                GroupKey::Kty04(gkey),
                ManagerKey::Kty04(mgrkey),
                Gml::new(scheme),
            ))
        }
    }
}

/// A fresh, unjoined member key for the group's scheme.
pub fn new_member_key(scheme: Scheme) -> MemberKey {
    match scheme {
        Scheme::Cpy06 => MemberKey::Cpy06(Default::default()),
        Scheme::Kty04 => MemberKey::Kty04(Default::default()),
    }
}

pub fn join_member<R: RngCore>(
    rng: &mut R,
    memkey: &mut MemberKey,
    phase: u8,
    input: Option<&Message>,
    gkey: &GroupKey,
) -> Result<Option<Message>, GroupSigError> {
    match (memkey, gkey) {
        (MemberKey::Cpy06(memkey), GroupKey::Cpy06(gkey)) => {
            cpy06::join_member(rng, memkey, phase, input, gkey)
        }
        (MemberKey::Kty04(memkey), GroupKey::Kty04(gkey)) => {
            kty04::join_member(rng, memkey, phase, input, gkey)
        }
        (memkey, gkey) => Err(mismatch(gkey.scheme(), memkey.scheme())),
    }
}

pub fn join_manager<R: RngCore>(
    rng: &mut R,
    mgrkey: &ManagerKey,
    gml: &mut Gml,
    phase: u8,
    input: &Message,
    gkey: &GroupKey,
) -> Result<Message, GroupSigError> {
    match (mgrkey, gml, gkey) {
        (ManagerKey::Cpy06(mgrkey), Gml::Cpy06(gml), GroupKey::Cpy06(gkey)) => {
            cpy06::join_manager(rng, mgrkey, gml, phase, input, gkey)
        }
        (ManagerKey::Kty04(mgrkey), Gml::Kty04(gml), GroupKey::Kty04(gkey)) => {
            kty04::join_manager(rng, mgrkey, gml, phase, input, gkey)
        }
        (mgrkey, gml, gkey) => {
            let found = if mgrkey.scheme() != gkey.scheme() {
                mgrkey.scheme()
            } else {
                gml.scheme()
            };
            Err(mismatch(gkey.scheme(), found))
        }
    }
}

pub fn sign<R: RngCore>(
    rng: &mut R,
    message: &[u8],
    memkey: &MemberKey,
    gkey: &GroupKey,
) -> Result<Signature, GroupSigError> {
    match (memkey, gkey) {
        (MemberKey::Cpy06(memkey), GroupKey::Cpy06(gkey)) => {
            cpy06::sign(rng, message, memkey, gkey).map(Signature::Cpy06)
        }
        (MemberKey::Kty04(memkey), GroupKey::Kty04(gkey)) => {
            kty04::sign(rng, message, memkey, gkey).map(Signature::Kty04)
        }
        (memkey, gkey) => Err(mismatch(gkey.scheme(), memkey.scheme())),
    }
}

pub fn verify(
    sig: &Signature,
    message: &[u8],
    gkey: &GroupKey,
) -> Result<bool, GroupSigError> {
    match (sig, gkey) {
        (Signature::Cpy06(sig), GroupKey::Cpy06(gkey)) => {
            cpy06::verify(sig, message, gkey)
        }
        (Signature::Kty04(sig), GroupKey::Kty04(gkey)) => {
            kty04::verify(sig, message, gkey)
        }
        (sig, gkey) => Err(mismatch(gkey.scheme(), sig.scheme())),
    }
}

/// Opens a signature to the GML identity of its signer, `Ok(None)`
/// when no live entry matches.
pub fn open(
    mgrkey: &ManagerKey,
    gml: &Gml,
    sig: &Signature,
    gkey: &GroupKey,
) -> Result<Option<u64>, GroupSigError> {
    match (mgrkey, gml, sig, gkey) {
        (
            ManagerKey::Cpy06(mgrkey),
            Gml::Cpy06(gml),
            Signature::Cpy06(sig),
            GroupKey::Cpy06(_),
        ) => cpy06::open(mgrkey, gml, sig),
        (
            ManagerKey::Kty04(mgrkey),
            Gml::Kty04(gml),
            Signature::Kty04(sig),
            GroupKey::Kty04(gkey),
        ) => kty04::open(mgrkey, gml, sig, gkey),
        (mgrkey, _, sig, gkey) => {
            let found = if sig.scheme() != gkey.scheme() {
                sig.scheme()
            } else {
                mgrkey.scheme()
            };
            Err(mismatch(gkey.scheme(), found))
        }
    }
}

/// Publishes the tracing trapdoor of member `id` on the CRL.
pub fn reveal(
    gml: &Gml,
    crl: &mut Crl,
    id: u64,
) -> Result<Trapdoor, GroupSigError> {
    match (gml, crl) {
        (Gml::Cpy06(gml), Crl::Cpy06(crl)) => {
            cpy06::reveal(gml, crl, id).map(Trapdoor::Cpy06)
        }
        (Gml::Kty04(gml), Crl::Kty04(crl)) => {
            kty04::reveal(gml, crl, id).map(Trapdoor::Kty04)
        }
        (gml, crl) => Err(mismatch(gml.scheme(), crl.scheme())),
    }
}

/// Whether the signature was produced by a revoked member.
pub fn trace(
    sig: &Signature,
    gkey: &GroupKey,
    crl: &Crl,
) -> Result<bool, GroupSigError> {
    match (sig, gkey, crl) {
        (Signature::Cpy06(sig), GroupKey::Cpy06(_), Crl::Cpy06(crl)) => {
            Ok(cpy06::trace(sig, crl))
        }
        (Signature::Kty04(sig), GroupKey::Kty04(gkey), Crl::Kty04(crl)) => {
            Ok(kty04::trace(sig, gkey, crl))
        }
        (sig, gkey, crl) => {
            let found = if sig.scheme() != gkey.scheme() {
                sig.scheme()
            } else {
                crl.scheme()
            };
            Err(mismatch(gkey.scheme(), found))
        }
    }
}

pub fn claim<R: RngCore>(
    rng: &mut R,
    memkey: &MemberKey,
    gkey: &GroupKey,
    sig: &Signature,
) -> Result<Proof, GroupSigError> {
    match (memkey, gkey, sig) {
        (
            MemberKey::Cpy06(memkey),
            GroupKey::Cpy06(gkey),
            Signature::Cpy06(sig),
        ) => cpy06::claim(rng, memkey, gkey, sig).map(Proof::Cpy06),
        (
            MemberKey::Kty04(memkey),
            GroupKey::Kty04(gkey),
            Signature::Kty04(sig),
        ) => kty04::claim(rng, memkey, gkey, sig).map(Proof::Kty04),
        (memkey, gkey, sig) => {
            let found = if memkey.scheme() != gkey.scheme() {
                memkey.scheme()
            } else {
                sig.scheme()
            };
            Err(mismatch(gkey.scheme(), found))
        }
    }
}

pub fn claim_verify(
    proof: &Proof,
    gkey: &GroupKey,
    sig: &Signature,
) -> Result<bool, GroupSigError> {
    match (proof, gkey, sig) {
        (Proof::Cpy06(proof), GroupKey::Cpy06(gkey), Signature::Cpy06(sig)) => {
            cpy06::claim_verify(proof, gkey, sig)
        }
        (Proof::Kty04(proof), GroupKey::Kty04(gkey), Signature::Kty04(sig)) => {
            kty04::claim_verify(proof, gkey, sig)
        }
        (proof, gkey, sig) => {
            let found = if proof.scheme() != gkey.scheme() {
                proof.scheme()
            } else {
                sig.scheme()
            };
            Err(mismatch(gkey.scheme(), found))
        }
    }
}

/// Proves that all signatures in `sigs` share one signer.
pub fn prove_equality<R: RngCore>(
    rng: &mut R,
    memkey: &MemberKey,
    gkey: &GroupKey,
    sigs: &[Signature],
) -> Result<Proof, GroupSigError> {
    match (memkey, gkey) {
        (MemberKey::Cpy06(memkey), GroupKey::Cpy06(gkey)) => {
            let sigs = unwrap_cpy06(sigs)?;
            cpy06::prove_equality(rng, memkey, gkey, &sigs).map(Proof::Cpy06)
        }
        (MemberKey::Kty04(memkey), GroupKey::Kty04(gkey)) => {
            let sigs = unwrap_kty04(sigs)?;
            kty04::prove_equality(rng, memkey, gkey, &sigs).map(Proof::Kty04)
        }
        (memkey, gkey) => Err(mismatch(gkey.scheme(), memkey.scheme())),
    }
}

pub fn prove_equality_verify(
    proof: &Proof,
    gkey: &GroupKey,
    sigs: &[Signature],
) -> Result<bool, GroupSigError> {
    match (proof, gkey) {
        (Proof::Cpy06(proof), GroupKey::Cpy06(gkey)) => {
            let sigs = unwrap_cpy06(sigs)?;
            cpy06::prove_equality_verify(proof, gkey, &sigs)
        }
        (Proof::Kty04(proof), GroupKey::Kty04(gkey)) => {
            let sigs = unwrap_kty04(sigs)?;
            kty04::prove_equality_verify(proof, gkey, &sigs)
        }
        (proof, gkey) => Err(mismatch(gkey.scheme(), proof.scheme())),
    }
}

fn unwrap_cpy06(
    sigs: &[Signature],
) -> Result<Vec<cpy06::Signature<Bls12_381>>, GroupSigError> {
    sigs.iter()
        .map(|sig| match sig {
            Signature::Cpy06(sig) => Ok(sig.clone()),
            other => Err(mismatch(Scheme::Cpy06, other.scheme())),
        })
        .collect()
}

fn unwrap_kty04(
    sigs: &[Signature],
) -> Result<Vec<kty04::Signature>, GroupSigError> {
    sigs.iter()
        .map(|sig| match sig {
            Signature::Kty04(sig) => Ok(sig.clone()),
            other => Err(mismatch(Scheme::Kty04, other.scheme())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn enroll<R: RngCore>(
        rng: &mut R,
        gkey: &GroupKey,
        mgrkey: &ManagerKey,
        gml: &mut Gml,
    ) -> MemberKey {
        let scheme = gkey.scheme();
        let (start, seq) = join_bounds(scheme);
        let mut memkey = new_member_key(scheme);
        let mut msg: Option<Message> = None;
        for phase in start..=seq {
            if phase % 2 == 0 {
                msg = join_member(rng, &mut memkey, phase, msg.as_ref(), gkey)
                    .unwrap();
            } else {
                msg = Some(
                    join_manager(
                        rng,
                        mgrkey,
                        gml,
                        phase,
                        msg.as_ref().unwrap(),
                        gkey,
                    )
                    .unwrap(),
                );
            }
        }
        match scheme {
            // the KTY04 member key arrives in the manager's reply
            Scheme::Kty04 => {
                MemberKey::import(msg.unwrap().as_bytes()).unwrap()
            }
            Scheme::Cpy06 => memkey,
        }
    }

    #[test]
    fn full_lifecycle_over_the_generic_surface() {
        let mut rng = StdRng::seed_from_u64(200u64);
        let (gkey, mgrkey, mut gml) = setup(Scheme::Cpy06, &mut rng).unwrap();
        let k0 = enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let k1 = enroll(&mut rng, &gkey, &mgrkey, &mut gml);

        let s0 = sign(&mut rng, b"Hello, World!", &k0, &gkey).unwrap();
        let s1 = sign(&mut rng, b"Hello, World!", &k1, &gkey).unwrap();

        assert!(verify(&s0, b"Hello, World!", &gkey).unwrap());
        assert!(!verify(&s0, b"Hello, Worlds!", &gkey).unwrap());

        assert_eq!(open(&mgrkey, &gml, &s0, &gkey).unwrap(), Some(0));
        assert_eq!(open(&mgrkey, &gml, &s1, &gkey).unwrap(), Some(1));

        let proof = claim(&mut rng, &k0, &gkey, &s0).unwrap();
        assert!(claim_verify(&proof, &gkey, &s0).unwrap());
        assert!(!claim_verify(&proof, &gkey, &s1).unwrap());

        let mut crl = Crl::new(Scheme::Cpy06);
        assert!(!trace(&s0, &gkey, &crl).unwrap());
        reveal(&gml, &mut crl, 0).unwrap();
        assert!(trace(&s0, &gkey, &crl).unwrap());
        assert!(!trace(&s1, &gkey, &crl).unwrap());

        let sigs = [s0.clone(), sign(&mut rng, b"more", &k0, &gkey).unwrap()];
        let proof = prove_equality(&mut rng, &k0, &gkey, &sigs).unwrap();
        assert!(prove_equality_verify(&proof, &gkey, &sigs).unwrap());
    }

    #[test]
    fn kty04_lifecycle_over_the_generic_surface() {
        let mut rng = StdRng::seed_from_u64(201u64);
        let (raw_gkey, raw_mgrkey) = crate::kty04::testing::group();
        let gkey = GroupKey::Kty04(raw_gkey);
        let mgrkey = ManagerKey::Kty04(raw_mgrkey);
        let mut gml = Gml::new(Scheme::Kty04);

        let k0 = enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let s0 = sign(&mut rng, b"Hello, World!", &k0, &gkey).unwrap();
        assert!(verify(&s0, b"Hello, World!", &gkey).unwrap());
        assert_eq!(open(&mgrkey, &gml, &s0, &gkey).unwrap(), Some(0));

        let mut crl = Crl::new(Scheme::Kty04);
        assert!(!trace(&s0, &gkey, &crl).unwrap());
        reveal(&gml, &mut crl, 0).unwrap();
        assert!(trace(&s0, &gkey, &crl).unwrap());
    }

    #[test]
    fn mismatched_schemes_are_rejected_up_front() {
        let mut rng = StdRng::seed_from_u64(202u64);
        let (gkey, mgrkey, mut gml) = setup(Scheme::Cpy06, &mut rng).unwrap();
        let memkey = enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let sig = sign(&mut rng, b"msg", &memkey, &gkey).unwrap();

        let (kty_gkey, kty_mgrkey) = crate::kty04::testing::group();
        let kty_gkey = GroupKey::Kty04(kty_gkey);
        let kty_mgrkey = ManagerKey::Kty04(kty_mgrkey);

        assert!(matches!(
            verify(&sig, b"msg", &kty_gkey),
            Err(GroupSigError::SchemeMismatch { .. })
        ));
        assert!(matches!(
            sign(&mut rng, b"msg", &memkey, &kty_gkey),
            Err(GroupSigError::SchemeMismatch { .. })
        ));
        assert!(matches!(
            open(&kty_mgrkey, &gml, &sig, &gkey),
            Err(GroupSigError::SchemeMismatch { .. })
        ));
        let mut crl = Crl::new(Scheme::Kty04);
        assert!(matches!(
            reveal(&gml, &mut crl, 0),
            Err(GroupSigError::SchemeMismatch { .. })
        ));
    }

    #[test]
    fn artifacts_round_trip_through_the_tagged_import() {
        let mut rng = StdRng::seed_from_u64(203u64);
        let (gkey, mgrkey, mut gml) = setup(Scheme::Cpy06, &mut rng).unwrap();
        let memkey = enroll(&mut rng, &gkey, &mgrkey, &mut gml);
        let sig = sign(&mut rng, b"Hello, World!", &memkey, &gkey).unwrap();

        let restored = GroupKey::import(&gkey.export().unwrap()).unwrap();
        assert_eq!(restored, gkey);
        assert_eq!(restored.scheme(), Scheme::Cpy06);

        let restored = Signature::import(&sig.export().unwrap()).unwrap();
        assert!(verify(&restored, b"Hello, World!", &gkey).unwrap());

        let restored =
            Gml::import(Scheme::Cpy06, &gml.export().unwrap()).unwrap();
        assert_eq!(restored, gml);

        assert!(matches!(
            GroupKey::import(&[9u8, 0, 0]),
            Err(GroupSigError::UnknownSchemeTag(9))
        ));
    }

    #[test]
    fn to_string_renders_scheme_and_payload() {
        let mut rng = StdRng::seed_from_u64(204u64);
        let (gkey, _, _) = setup(Scheme::Cpy06, &mut rng).unwrap();
        let s = gkey.to_string();
        assert!(s.starts_with("cpy06:"));
        assert_eq!(s.len(), "cpy06:".len() + 2 * gkey.export_size());
    }
}

//! End-to-end runs of both schemes through the public API only:
//! setup, a multi-phase join, sign/verify, open, reveal/trace and
//! claim, with every artifact pushed through its byte format along the
//! way.

use ark_std::rand::{rngs::StdRng, SeedableRng};
use groupsig::{
    claim, claim_verify, join_bounds, join_manager, join_member,
    new_member_key, open, prove_equality, prove_equality_verify, reveal,
    setup, sign, trace, verify, Crl, Gml, GroupKey, ManagerKey, MemberKey,
    Message, Scheme, Signature,
};

fn enroll(
    rng: &mut StdRng,
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
                join_manager(rng, mgrkey, gml, phase, msg.as_ref().unwrap(), gkey)
                    .unwrap(),
            );
        }
    }
    match scheme {
        Scheme::Kty04 => MemberKey::import(msg.unwrap().as_bytes()).unwrap(),
        Scheme::Cpy06 => memkey,
    }
}

fn run_lifecycle(rng: &mut StdRng, gkey: GroupKey, mgrkey: ManagerKey) {
    let scheme = gkey.scheme();

    // everything the parties persist survives a byte round-trip
    let gkey = GroupKey::import(&gkey.export().unwrap()).unwrap();
    let mgrkey = ManagerKey::import(&mgrkey.export().unwrap()).unwrap();

    let mut gml = Gml::new(scheme);
    let k0 = enroll(rng, &gkey, &mgrkey, &mut gml);
    let k1 = enroll(rng, &gkey, &mgrkey, &mut gml);
    let gml = Gml::import(scheme, &gml.export().unwrap()).unwrap();

    let s0 = sign(rng, b"Hello, World!", &k0, &gkey).unwrap();
    let s0 = Signature::import(&s0.export().unwrap()).unwrap();
    let s1 = sign(rng, b"Hello, World!", &k1, &gkey).unwrap();

    assert!(verify(&s0, b"Hello, World!", &gkey).unwrap());
    assert!(verify(&s1, b"Hello, World!", &gkey).unwrap());
    assert!(!verify(&s0, b"Hello, Worlds!", &gkey).unwrap());

    assert_eq!(open(&mgrkey, &gml, &s0, &gkey).unwrap(), Some(0));
    assert_eq!(open(&mgrkey, &gml, &s1, &gkey).unwrap(), Some(1));

    let proof = claim(rng, &k0, &gkey, &s0).unwrap();
    assert!(claim_verify(&proof, &gkey, &s0).unwrap());
    assert!(!claim_verify(&proof, &gkey, &s1).unwrap());

    let pair = [s0.clone(), sign(rng, b"again", &k0, &gkey).unwrap()];
    let proof = prove_equality(rng, &k0, &gkey, &pair).unwrap();
    assert!(prove_equality_verify(&proof, &gkey, &pair).unwrap());

    let mut crl = Crl::new(scheme);
    assert!(!trace(&s0, &gkey, &crl).unwrap());
    reveal(&gml, &mut crl, 0).unwrap();
    let crl = Crl::import(scheme, &crl.export().unwrap()).unwrap();
    assert!(trace(&s0, &gkey, &crl).unwrap());
    assert!(!trace(&s1, &gkey, &crl).unwrap());
}

#[test]
fn cpy06_lifecycle() {
    let mut rng = StdRng::seed_from_u64(1u64);
    let (gkey, mgrkey, _) = setup(Scheme::Cpy06, &mut rng).unwrap();
    run_lifecycle(&mut rng, gkey, mgrkey);
}

#[test]
fn kty04_lifecycle() {
    let mut rng = StdRng::seed_from_u64(2u64);
    // test-sized parameters; the default 2048-bit setup takes minutes
    let (gkey, mgrkey) = groupsig::kty04::setup(&mut rng, 512, 2, 32).unwrap();
    run_lifecycle(
        &mut rng,
        GroupKey::Kty04(gkey),
        ManagerKey::Kty04(mgrkey),
    );
}

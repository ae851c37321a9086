//! Two-phase join. The member commits to its tracing exponent, the
//! manager answers with the completed member key; there is no further
//! in-protocol round, the certificate travels back on the same message
//! channel.

use crate::{
    error::GroupSigError,
    gml::Roster,
    kty04::{
        keys::{certificate_exponent, GroupKey, ManagerKey, MemberKey},
        open::GmlEntry,
        prime::prime_in_sphere,
    },
    message::Message,
};
use ark_std::rand::RngCore;

/// First phase, run by the member.
pub const JOIN_START: u8 = 0;
/// Last phase, run by the manager.
pub const JOIN_SEQ: u8 = 1;

/// Member side: draws the tracing exponent `xx` from the inner Lambda
/// sphere, commits to it as `C = b^xx mod n` and sends the partial key.
/// The completed key arrives in the manager's reply and is imported
/// with [`MemberKey::import`]; there is no later member phase.
pub fn join_member<R: RngCore>(
    rng: &mut R,
    memkey: &mut MemberKey,
    phase: u8,
    _input: Option<&Message>,
    gkey: &GroupKey,
) -> Result<Option<Message>, GroupSigError> {
    if phase != JOIN_START {
        return Err(GroupSigError::UnexpectedJoinPhase(phase));
    }
    if memkey.is_complete() {
        return Err(GroupSigError::UnexpectedJoinPhase(phase));
    }

    memkey.xx = gkey.inner_lambda.sample(rng);
    memkey.c = gkey.b.modpow(&memkey.xx, &gkey.n);

    let bytes = memkey.export()?;
    Ok(Some(Message::from_bytes(bytes)))
}

/// Manager side: checks the commitment, draws the issuing exponent and
/// a certificate prime, issues `A = (a^x * C * a0)^(e^-1 mod p'q')`,
/// records the member on the GML and returns the completed key.
pub fn join_manager<R: RngCore>(
    rng: &mut R,
    mgrkey: &ManagerKey,
    gml: &mut Roster<GmlEntry>,
    phase: u8,
    input: &Message,
    gkey: &GroupKey,
) -> Result<Message, GroupSigError> {
    if phase != JOIN_SEQ {
        return Err(GroupSigError::UnexpectedJoinPhase(phase));
    }
    let mut memkey = MemberKey::import(input.as_bytes())?;

    if !gkey.inner_lambda.contains(&memkey.xx) {
        return Err(GroupSigError::JoinProtocolFailure(
            "tracing exponent outside its sphere",
        ));
    }
    if memkey.c != gkey.b.modpow(&memkey.xx, &gkey.n) {
        return Err(GroupSigError::JoinProtocolFailure(
            "commitment does not match the tracing exponent",
        ));
    }

    memkey.x = gkey.inner_m.sample(rng);
    let (e, d) = loop {
        let e = prime_in_sphere(&gkey.inner_gamma, rng);
        // the certificate prime must be invertible mod the group order
        if let Some(d) = certificate_exponent(mgrkey, &e) {
            break (e, d);
        }
    };
    memkey.e = e;

    let base = (gkey.a.modpow(&memkey.x, &gkey.n) * &memkey.c) % &gkey.n;
    let base = (base * &gkey.a0) % &gkey.n;
    memkey.a = base.modpow(&d, &gkey.n);

    gml.append(GmlEntry {
        id: gml.next_id(),
        open_trapdoor: memkey.a.clone(),
        trace_trapdoor: memkey.xx.clone(),
    })?;

    let bytes = memkey.export()?;
    Ok(Message::from_bytes(bytes))
}

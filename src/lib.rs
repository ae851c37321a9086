#![cfg_attr(not(feature = "std"), no_std)]

//! # Group signatures with verifiable opening and tracing
//!
//! Members of a group sign messages anonymously on the group's behalf;
//! a group manager can de-anonymize a signature (*open*) or publish a
//! member's tracing trapdoor so that anyone can recognize that member's
//! signatures (*reveal* / *trace*). Members can also prove authorship
//! of their own signatures (*claim* / *prove equality*) without the
//! manager's help.
//!
//! Two schemes are implemented:
//!
//! 1. [CPY06](cpy06), the pairing-based group signature scheme of Choi,
//!    Park and Yung, instantiated over BLS12-381.
//! 2. [KTY04](kty04), the traceable signature scheme of Kiayias,
//!    Tsiounis and Yung over an RSA group of hidden order.
//!
//! Use a scheme module directly, or the scheme-tagged artifacts and
//! free functions in [`scheme`] when the scheme is chosen at runtime.
//! All artifacts serialize to a self-describing byte format through
//! their `export` / `import` methods.

extern crate alloc;

pub mod codec;
pub mod cpy06;
pub mod error;
pub mod gml;
pub mod kty04;
pub mod message;
pub mod scheme;

pub use error::GroupSigError;
pub use message::Message;
pub use scheme::{
    claim, claim_verify, join_bounds, join_manager, join_member,
    new_member_key, open, prove_equality, prove_equality_verify, reveal,
    setup, sign, trace, verify, Crl, Gml, GroupKey, ManagerKey, MemberKey,
    Proof, Scheme, Signature, Trapdoor,
};

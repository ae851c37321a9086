// TODO: At some point this should be replaced with crates anyhow and thiserror but thiserror is no_std compatible at the moment.

use crate::scheme::Scheme;
use ark_serialize::SerializationError;

/// Failures of the library API. A signature, proof or trace check that
/// simply does not hold is reported as `Ok(false)`/`Ok(None)` by the
/// respective operation, never as an error.
#[derive(Debug)]
pub enum GroupSigError {
    /// An artifact tagged for one scheme was passed to an operation of
    /// another.
    SchemeMismatch { expected: Scheme, found: Scheme },
    /// Byte input carries an unknown scheme tag.
    UnknownSchemeTag(u8),
    /// Byte input carries an unexpected artifact type tag.
    UnexpectedTypeTag { expected: u8, found: u8 },
    /// Byte input ended before the announced field length.
    UnexpectedEndOfInput,
    /// Byte input has bytes left over after the last field.
    TrailingBytes(usize),
    /// A length prefix that cannot fit the remaining input.
    InvalidFieldLength(usize),
    /// Index into a membership or revocation list that was never
    /// assigned.
    IndexOutOfBounds(u64),
    /// Index whose entry was removed.
    RemovedEntry(u64),
    /// A join step invoked with a sequence number the protocol does not
    /// assign to that party.
    UnexpectedJoinPhase(u8),
    /// A join step that needed an incoming message got none, or one it
    /// cannot parse.
    MissingJoinMessage(u8),
    /// The counterparty's join message failed verification.
    JoinProtocolFailure(&'static str),
    /// A malformed argument, e.g. an empty signature set for an
    /// equality proof or a member key with no certificate.
    InvalidArgument(&'static str),
    /// Group setup drew a degenerate element and gave up after retries.
    DegenerateGroupElement,
    Serialization(SerializationError),
}

impl From<SerializationError> for GroupSigError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

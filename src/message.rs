//! Opaque byte envelope exchanged between member and manager during the
//! join handshake. The contents are scheme- and phase-specific; parties
//! only ever forward messages verbatim.

use ark_std::vec::Vec;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Message(Vec<u8>);

impl Message {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Message {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Message {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

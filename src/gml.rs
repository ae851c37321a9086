//! Index-stable membership and revocation lists.
//!
//! Both the group membership list (GML) and the revocation list (CRL)
//! of either scheme are a [`Roster`]: append assigns the next identity
//! in sequence, removal leaves a tombstone so identities issued earlier
//! keep their meaning, and iteration skips tombstones. Exports carry
//! `[u64 live-count][entries…]`; each entry records its own identity,
//! so an import reconstructs tombstones from the gaps.

use crate::{
    codec::{self, Reader},
    error::GroupSigError,
};
use ark_std::vec::Vec;

/// Largest identity an import will reconstruct. Entry identities come
/// from the wire, and every gap below one materializes a tombstone
/// slot; without a cap a few bytes could demand gigabytes of slots.
const MAX_IMPORT_ID: u64 = 1 << 24;

/// Per-scheme GML/CRL entry payloads implement this to ride in a
/// [`Roster`].
pub trait RosterEntry: Sized {
    fn id(&self) -> u64;
    fn entry_size(&self) -> usize;
    fn write(&self, buf: &mut Vec<u8>) -> Result<(), GroupSigError>;
    fn read(reader: &mut Reader<'_>) -> Result<Self, GroupSigError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Default for Roster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Roster<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Identity the next appended entry will receive.
    pub fn next_id(&self) -> u64 {
        self.slots.len() as u64
    }

    pub fn get(&self, id: u64) -> Result<&T, GroupSigError> {
        let slot = self
            .slots
            .get(id as usize)
            .ok_or(GroupSigError::IndexOutOfBounds(id))?;
        slot.as_ref().ok_or(GroupSigError::RemovedEntry(id))
    }

    /// Tombstones the entry; its identity is never reassigned.
    pub fn remove(&mut self, id: u64) -> Result<T, GroupSigError> {
        let slot = self
            .slots
            .get_mut(id as usize)
            .ok_or(GroupSigError::IndexOutOfBounds(id))?;
        let entry = slot.take().ok_or(GroupSigError::RemovedEntry(id))?;
        self.live -= 1;
        Ok(entry)
    }

    /// Live entries in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }
}

impl<T: RosterEntry> Roster<T> {
    /// Appends an entry built for the next free identity.
    pub fn append(&mut self, entry: T) -> Result<u64, GroupSigError> {
        let id = self.next_id();
        if entry.id() != id {
            return Err(GroupSigError::InvalidArgument(
                "entry identity does not continue the roster",
            ));
        }
        self.slots.push(Some(entry));
        self.live += 1;
        Ok(id)
    }

    pub fn export_size(&self) -> usize {
        codec::UINT_SIZE + self.iter().map(T::entry_size).sum::<usize>()
    }

    pub fn export(&self) -> Result<Vec<u8>, GroupSigError> {
        let size = self.export_size();
        let mut buf = Vec::with_capacity(size);
        codec::put_uint(&mut buf, self.live as u64);
        for entry in self.iter() {
            entry.write(&mut buf)?;
        }
        codec::finish_export(buf, size)
    }

    pub fn import(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let mut reader = Reader::new(bytes);
        let count = reader.uint()?;
        let mut roster = Self::new();
        let mut last_id: Option<u64> = None;
        for _ in 0..count {
            let entry = T::read(&mut reader)?;
            let id = entry.id();
            if id > MAX_IMPORT_ID {
                return Err(GroupSigError::InvalidArgument(
                    "roster identity beyond the import cap",
                ));
            }
            if last_id.is_some_and(|prev| id <= prev) {
                return Err(GroupSigError::InvalidArgument(
                    "roster entries out of order",
                ));
            }
            last_id = Some(id);
            // gaps between recorded identities were tombstoned entries
            while roster.next_id() < id {
                roster.slots.push(None);
            }
            roster.slots.push(Some(entry));
            roster.live += 1;
        }
        reader.finish()?;
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{self, Reader};

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Entry {
        id: u64,
        trapdoor: Vec<u8>,
    }

    impl RosterEntry for Entry {
        fn id(&self) -> u64 {
            self.id
        }

        fn entry_size(&self) -> usize {
            codec::UINT_SIZE + codec::field_size(self.trapdoor.len())
        }

        fn write(&self, buf: &mut Vec<u8>) -> Result<(), GroupSigError> {
            codec::put_uint(buf, self.id);
            codec::put_field(buf, &self.trapdoor);
            Ok(())
        }

        fn read(reader: &mut Reader<'_>) -> Result<Self, GroupSigError> {
            let id = reader.uint()?;
            let trapdoor = reader.field()?.to_vec();
            Ok(Self { id, trapdoor })
        }
    }

    fn entry(id: u64) -> Entry {
        Entry {
            id,
            trapdoor: vec![id as u8; 4],
        }
    }

    #[test]
    fn identities_are_stable_across_removal() {
        let mut roster = Roster::new();
        for id in 0..4u64 {
            assert_eq!(roster.append(entry(id)).unwrap(), id);
        }
        roster.remove(1).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.get(2).unwrap().id, 2);
        assert!(matches!(roster.get(1), Err(GroupSigError::RemovedEntry(1))));
        assert!(matches!(
            roster.remove(1),
            Err(GroupSigError::RemovedEntry(1))
        ));
        assert!(matches!(
            roster.get(9),
            Err(GroupSigError::IndexOutOfBounds(9))
        ));
        // the removed identity is not reassigned
        assert_eq!(roster.append(entry(4)).unwrap(), 4);
    }

    #[test]
    fn export_import_preserves_tombstones() {
        let mut roster = Roster::new();
        for id in 0..5u64 {
            roster.append(entry(id)).unwrap();
        }
        roster.remove(0).unwrap();
        roster.remove(3).unwrap();

        let bytes = roster.export().unwrap();
        assert_eq!(bytes.len(), roster.export_size());

        let restored = Roster::<Entry>::import(&bytes).unwrap();
        assert_eq!(restored, roster);
        assert_eq!(restored.next_id(), 5);
        assert!(matches!(
            restored.get(3),
            Err(GroupSigError::RemovedEntry(3))
        ));
    }

    #[test]
    fn empty_roster_round_trips() {
        let roster: Roster<Entry> = Roster::new();
        let bytes = roster.export().unwrap();
        let restored = Roster::<Entry>::import(&bytes).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.next_id(), 0);
    }

    #[test]
    fn absurd_imported_identities_are_rejected() {
        // one entry claiming a huge identity must not materialize the
        // tombstone gap below it
        let mut bytes = Vec::new();
        codec::put_uint(&mut bytes, 1);
        entry(50_000_000).write(&mut bytes).unwrap();
        assert!(matches!(
            Roster::<Entry>::import(&bytes),
            Err(GroupSigError::InvalidArgument(_))
        ));

        let mut bytes = Vec::new();
        codec::put_uint(&mut bytes, 1);
        entry(u64::MAX).write(&mut bytes).unwrap();
        assert!(Roster::<Entry>::import(&bytes).is_err());
    }

    #[test]
    fn wrong_append_identity_is_rejected() {
        let mut roster = Roster::new();
        assert!(roster.append(entry(3)).is_err());
    }
}

use std::collections::BTreeMap;

use tracing::trace;

use crate::specs::{self, ids};
use crate::tags::{Tag, TagData};
use crate::tools;

///
/// One entry of a [`SeekTable`]: the element id and its position relative to the start of the Segment content.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SeekEntry {
    pub id: u64,
    pub position: u64,
}

///
/// The element index stored in a `SeekHead`, keyed by element name.
///
/// Names come from the element registry.  Ids that aren't in the registry are keyed by their hex form (`"0x1F43B600"`).
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize), serde(transparent))]
pub struct SeekTable {
    entries: BTreeMap<String, SeekEntry>,
}

impl SeekTable {
    ///
    /// Builds a table from a buffered `SeekHead` tag.
    ///
    /// Children that aren't complete `Seek` entries (`CRC-32`, `Void`, a `Seek` missing its id or position) are
    /// skipped.  When a name appears more than once, the first entry is kept.
    ///
    pub fn from_seek_head(seek_head: &Tag) -> Self {
        let mut entries = BTreeMap::new();

        for seek in seek_head.children().unwrap_or(&[]).iter().filter(|child| child.id == ids::Seek) {
            let id = seek.child(ids::SeekID)
                .and_then(Tag::data)
                .and_then(TagData::as_binary)
                .and_then(|bytes| tools::arr_to_u64(bytes).ok());
            let position = seek.child(ids::SeekPosition)
                .and_then(Tag::data)
                .and_then(TagData::as_unsigned_int);

            match (id, position) {
                (Some(id), Some(position)) => {
                    entries.entry(specs::display_name(id)).or_insert(SeekEntry { id, position });
                },
                _ => trace!(position = seek.absolute_start, "skipping incomplete seek entry"),
            }
        }

        SeekTable { entries }
    }

    ///
    /// Adds the entries of a further table.  Names already present are kept as they are.
    ///
    pub fn merge(&mut self, further: SeekTable) {
        for (name, entry) in further.entries {
            self.entries.entry(name).or_insert(entry);
        }
    }

    pub fn get(&self, name: &str) -> Option<&SeekEntry> {
        self.entries.get(name)
    }

    pub fn position(&self, name: &str) -> Option<u64> {
        self.get(name).map(|entry| entry.position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SeekEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seek(id: u64, position: u64) -> Tag {
        Tag::master(ids::Seek, vec![
            Tag::binary(ids::SeekID, &tools::id_to_bytes(id)),
            Tag::unsigned_int(ids::SeekPosition, position),
        ])
    }

    #[test]
    fn builds_from_seek_children() {
        let seek_head = Tag::master(ids::SeekHead, vec![
            seek(ids::Info, 100),
            Tag::binary(ids::CRC32, &[0, 0, 0, 0]),
            seek(ids::Tracks, 200),
            seek(0x1F43B600, 300),
        ]);
        let table = SeekTable::from_seek_head(&seek_head);

        assert_eq!(3, table.len());
        assert_eq!(Some(SeekEntry { id: ids::Info, position: 100 }), table.get("Info").copied());
        assert_eq!(Some(200), table.position("Tracks"));
        assert_eq!(Some(300), table.position("0x1F43B600"));
    }

    #[test]
    fn first_entry_wins_within_table() {
        let seek_head = Tag::master(ids::SeekHead, vec![seek(ids::Cluster, 10), seek(ids::Cluster, 20)]);
        assert_eq!(Some(10), SeekTable::from_seek_head(&seek_head).position("Cluster"));
    }

    #[test]
    fn incomplete_seek_is_skipped() {
        let seek_head = Tag::master(ids::SeekHead, vec![
            Tag::master(ids::Seek, vec![Tag::unsigned_int(ids::SeekPosition, 5)]),
        ]);
        assert!(SeekTable::from_seek_head(&seek_head).is_empty());
    }

    #[test]
    fn merge_keeps_nearer_entries() {
        let mut near = SeekTable::from_seek_head(&Tag::master(ids::SeekHead, vec![seek(ids::Info, 1)]));
        let far = SeekTable::from_seek_head(&Tag::master(ids::SeekHead, vec![seek(ids::Info, 2), seek(ids::Cues, 3)]));
        near.merge(far);

        assert_eq!(Some(1), near.position("Info"));
        assert_eq!(Some(3), near.position("Cues"));
    }
}

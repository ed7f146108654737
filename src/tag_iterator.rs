use std::io::{ErrorKind, Read};

use super::errors::tag_iterator::TagIteratorError;
use super::tag_decoder::TagDecoder;
use super::tags::Tag;

pub(crate) const DEFAULT_BUFFER_LEN: usize = 1024 * 64;

///
/// Provides an iterator over EBML files (read from a source implementing the [`std::io::Read`] trait).  Can be configured to read specific "Master" tags as complete objects rather than just emitting when they start and end.
///
/// The iterator outputs [`Tag`] values.  Their data is stored in a [`TagPosition`][`super::tags::TagPosition`]: "Master" tags are read as `Start` and `End` markers with their children emitted in between, while all other tags carry their complete data in the `Content` variant.  The iterator can be configured to buffer Master tags into a single `Content` tag using the `tag_ids_to_buffer` parameter.
///
/// Tag types come from the Matroska element registry.  Ids that aren't in the registry are emitted as opaque binary.
///
/// Note: The [`Self::with_capacity()`] method can be used to construct a `TagIterator` with a specified read buffer size.
///
/// ## Example
///
/// ```no_run
/// use std::fs::File;
/// use ebml_seek::TagIterator;
/// use ebml_seek::specs::ids;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("my_movie.mkv")?;
/// let my_iterator = TagIterator::new(file, &[ids::Info]);
/// for tag in my_iterator {
///   println!("{:?}", tag?);
/// }
/// # Ok(())
/// # }
/// ```
///
pub struct TagIterator<R: Read> {
    source: R,
    decoder: TagDecoder,
    read_buffer: Box<[u8]>,
    reached_eof: bool,
    failed: bool,
}

impl<R: Read> TagIterator<R> {

    ///
    /// Returns a new `TagIterator` instance.
    ///
    /// The `source` parameter must implement [`std::io::Read`].  The second argument, `tag_ids_to_buffer`, specifies which "Master" tags should be read as complete `Content` tags rather than as `Start` and `End` markers.
    ///
    pub fn new(source: R, tag_ids_to_buffer: &[u64]) -> Self {
        TagIterator::with_capacity(source, tag_ids_to_buffer, DEFAULT_BUFFER_LEN)
    }

    ///
    /// Returns a new `TagIterator` instance that reads `capacity` bytes from the source at a time.
    ///
    /// Buffered tags larger than `capacity` are still read; the internal buffer grows as needed.
    ///
    pub fn with_capacity(source: R, tag_ids_to_buffer: &[u64], capacity: usize) -> Self {
        TagIterator::build(source, TagDecoder::new(tag_ids_to_buffer), capacity)
    }

    ///
    /// Returns a new `TagIterator` for a source that has already been positioned at `offset` bytes into a resource.
    ///
    /// Emitted tags report their position relative to the start of the resource rather than the start of `source`.
    ///
    pub fn starting_at(source: R, tag_ids_to_buffer: &[u64], offset: u64) -> Self {
        TagIterator::build(source, TagDecoder::with_offset(tag_ids_to_buffer, offset), DEFAULT_BUFFER_LEN)
    }

    fn build(source: R, decoder: TagDecoder, capacity: usize) -> Self {
        TagIterator {
            source,
            decoder,
            read_buffer: vec![0; capacity.max(1)].into_boxed_slice(),
            reached_eof: false,
            failed: false,
        }
    }

    ///
    /// Absolute position of the next byte the iterator will decode.
    ///
    pub fn current_offset(&self) -> u64 {
        self.decoder.current_offset()
    }

    ///
    /// Consumes the iterator and returns the underlying source.
    ///
    pub fn into_inner(self) -> R {
        self.source
    }

    fn read_next(&mut self) -> Result<Option<Tag>, TagIteratorError> {
        loop {
            if let Some(tag) = self.decoder.next_tag()? {
                return Ok(Some(tag));
            }

            if self.reached_eof {
                return Ok(None);
            }

            match self.source.read(&mut self.read_buffer) {
                Ok(0) => self.reached_eof = true,
                Ok(len) => self.decoder.feed(&self.read_buffer[..len]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {},
                Err(source) => return Err(TagIteratorError::ReadError { source }),
            }
        }
    }
}

impl<R: Read> Iterator for TagIterator<R> {
    type Item = Result<Tag, TagIteratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = self.read_next();
        if result.is_err() {
            self.failed = true;
        }
        result.transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::specs::ids;
    use crate::tags::TagData;

    // EBML { DocType "webm" } then Segment { Info { TimecodeScale 1000000 } }
    const SAMPLE: [u8; 32] = [
        0x1a, 0x45, 0xdf, 0xa3, 0x87, 0x42, 0x82, 0x84, b'w', b'e', b'b', b'm',
        0x18, 0x53, 0x80, 0x67, 0x94,
        0x15, 0x49, 0xa9, 0x66, 0x87,
        0x2a, 0xd7, 0xb1, 0x83, 0x0f, 0x42, 0x40,
        0xec, 0x81, 0x00,
    ];

    #[test]
    fn reads_all_tags() {
        let tags: Vec<Tag> = TagIterator::new(Cursor::new(&SAMPLE[..]), &[]).collect::<Result<_, _>>().unwrap();
        let found: Vec<u64> = tags.iter().map(|t| t.id).collect();
        assert_eq!(vec![
            ids::EBML, ids::DocType, ids::EBML,
            ids::Segment, ids::Info, ids::TimecodeScale, ids::Info,
            ids::Void,
        ], found);
        assert_eq!(Some(&TagData::String(String::from("webm"))), tags[1].data());
    }

    #[test]
    fn no_end_tag_for_truncated_master() {
        // The Segment declares 20 bytes but the source ends after 15 of them.
        let tags: Vec<Tag> = TagIterator::new(Cursor::new(&SAMPLE[..]), &[]).collect::<Result<_, _>>().unwrap();
        assert!(!tags.iter().any(|t| t.id == ids::Segment && t.is_end()));
    }

    #[test]
    fn tiny_reads_match_large_reads() {
        let large: Vec<Tag> = TagIterator::new(Cursor::new(&SAMPLE[..]), &[ids::Info]).collect::<Result<_, _>>().unwrap();
        let small: Vec<Tag> = TagIterator::with_capacity(Cursor::new(&SAMPLE[..]), &[ids::Info], 1).collect::<Result<_, _>>().unwrap();
        assert_eq!(large, small);
    }

    #[test]
    fn starting_at_offsets_positions() {
        let tags: Vec<Tag> = TagIterator::starting_at(Cursor::new(&SAMPLE[17..]), &[ids::Info], 17).collect::<Result<_, _>>().unwrap();
        assert_eq!(ids::Info, tags[0].id);
        assert_eq!(17, tags[0].absolute_start);
        assert_eq!(22, tags[0].children().unwrap()[0].absolute_start);
    }

    #[test]
    fn stops_after_error() {
        let mut iter = TagIterator::new(Cursor::new(vec![0x00, 0x00, 0x00]), &[]);
        assert!(matches!(iter.next(), Some(Err(TagIteratorError::CorruptedData { .. }))));
        assert!(iter.next().is_none());
    }
}

use std::collections::HashSet;
use std::convert::TryInto;

use tracing::trace;

use super::errors::tag_iterator::TagIteratorError;
use super::specs::TagDataType;
use super::tag_factory;
use super::tags::{EbmlSize, Tag, TagPosition};
use super::tools;

#[derive(Debug, Clone, Copy)]
struct OpenTag {
    id: u64,
    absolute_start: u64,
    header_length: usize,
    size: EbmlSize,
}

impl OpenTag {
    fn end_offset(&self) -> Option<u64> {
        self.size.value().map(|size| self.absolute_start + self.header_length as u64 + size)
    }

    fn into_end_tag(self) -> Tag {
        Tag {
            id: self.id,
            data_type: TagDataType::Master,
            size: self.size,
            absolute_start: self.absolute_start,
            header_length: self.header_length,
            position: TagPosition::End,
        }
    }
}

///
/// The push-based core shared by [`TagIterator`][`super::TagIterator`] and `TagIteratorAsync`.
///
/// Bytes are handed over with [`Self::feed()`] in chunks of any size and tags are pulled out with
/// [`Self::next_tag()`].  When `next_tag` returns `Ok(None)` the decoder needs more bytes; nothing is consumed until a
/// complete header (or, for buffered tags, a complete element) is available.
///
/// Master tags whose ids were given as `tag_ids_to_buffer` are held back until complete and emitted as a single
/// `Content` tag carrying their whole subtree.  Every other master is emitted as a `Start` tag, followed by its
/// children, followed by an `End` tag once the decoder moves past its declared extent.  Masters with an unknown size
/// are never closed this way.
///
/// Memory use is bounded by the largest buffered tag plus one chunk.
///
pub struct TagDecoder {
    tag_ids_to_buffer: HashSet<u64>,
    buffer: Vec<u8>,
    buffer_position: usize,
    offset: u64,
    tag_stack: Vec<OpenTag>,
}

impl TagDecoder {
    pub fn new(tag_ids_to_buffer: &[u64]) -> Self {
        TagDecoder::with_offset(tag_ids_to_buffer, 0)
    }

    ///
    /// Returns a decoder whose first fed byte sits at absolute position `offset` of the underlying resource.
    ///
    /// Used when a read starts in the middle of a file, so that emitted tags still carry file positions.
    ///
    pub fn with_offset(tag_ids_to_buffer: &[u64], offset: u64) -> Self {
        TagDecoder {
            tag_ids_to_buffer: tag_ids_to_buffer.iter().copied().collect(),
            buffer: Vec::new(),
            buffer_position: 0,
            offset,
            tag_stack: Vec::new(),
        }
    }

    ///
    /// Appends a chunk of source bytes.
    ///
    pub fn feed(&mut self, chunk: &[u8]) {
        if self.buffer_position > 0 {
            self.buffer.drain(..self.buffer_position);
            self.buffer_position = 0;
        }
        self.buffer.extend_from_slice(chunk);
    }

    ///
    /// Absolute position of the next unconsumed byte.
    ///
    pub fn current_offset(&self) -> u64 {
        self.offset
    }

    ///
    /// Number of bytes fed but not yet consumed.
    ///
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() - self.buffer_position
    }

    ///
    /// Number of currently open (streamed) master tags.
    ///
    pub fn depth(&self) -> usize {
        self.tag_stack.len()
    }

    fn advance(&mut self, length: usize) {
        self.buffer_position += length;
        self.offset += length as u64;
    }

    fn corrupted(&self, message: String) -> TagIteratorError {
        TagIteratorError::CorruptedData { position: self.offset, message }
    }

    fn pop_finished_tag(&mut self) -> Option<Tag> {
        let finished = self.tag_stack.last()
            .and_then(OpenTag::end_offset)
            .map(|end| end <= self.offset)
            .unwrap_or(false);

        if finished {
            let open = self.tag_stack.pop()?;
            trace!(id = open.id, depth = self.tag_stack.len(), "closing tag");
            Some(open.into_end_tag())
        } else {
            None
        }
    }

    ///
    /// Returns the next decoded tag, or `Ok(None)` if more bytes are needed.
    ///
    /// # Errors
    ///
    /// Returns [`TagIteratorError::CorruptedData`] for structurally broken input (an unrepresentable vint, a child
    /// overrunning its parent, an unknown size on a tag that has to be read whole) and
    /// [`TagIteratorError::CorruptedTagData`] when content doesn't decode as its registry type.  The decoder makes no
    /// attempt to resynchronize after an error.
    ///
    pub fn next_tag(&mut self) -> Result<Option<Tag>, TagIteratorError> {
        if let Some(end_tag) = self.pop_finished_tag() {
            return Ok(Some(end_tag));
        }

        let remaining = &self.buffer[self.buffer_position..];
        let (id, id_length) = match tools::read_element_id(remaining).map_err(|e| self.corrupted(e.to_string()))? {
            Some(id) => id,
            None => return Ok(None),
        };
        let (size, size_length) = match tools::read_size_vint(&remaining[id_length..]).map_err(|e| self.corrupted(e.to_string()))? {
            Some(size) => size,
            None => return Ok(None),
        };
        let header_length = id_length + size_length;
        let data_type = tag_factory::data_type_for(id, None);
        let absolute_start = self.offset;

        if data_type == TagDataType::Master && !self.tag_ids_to_buffer.contains(&id) {
            self.advance(header_length);
            self.tag_stack.push(OpenTag { id, absolute_start, header_length, size });
            trace!(id, depth = self.tag_stack.len(), "opening tag");
            return Ok(Some(Tag {
                id,
                data_type,
                size,
                absolute_start,
                header_length,
                position: TagPosition::Start,
            }));
        }

        let content_length: usize = match size {
            EbmlSize::Known(size) => size.try_into()
                .map_err(|_| self.corrupted(format!("Tag 0x{:X} is too large to read ({} bytes).", id, size)))?,
            EbmlSize::Unknown => return Err(self.corrupted(format!("Tag 0x{:X} has an unknown size but has to be read whole.", id))),
        };
        let total_length = header_length + content_length;
        if self.buffered_len() < total_length {
            return Ok(None);
        }

        let content_start = self.buffer_position + header_length;
        let data = tag_factory::decode_content(
            id,
            data_type,
            &self.buffer[content_start..content_start + content_length],
            absolute_start,
            header_length,
        )?;
        self.advance(total_length);

        Ok(Some(Tag {
            id,
            data_type,
            size,
            absolute_start,
            header_length,
            position: TagPosition::Content(data),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::ids;
    use crate::tags::TagData;
    use crate::tools::Vint;

    fn element(id: u64, content: &[u8]) -> Vec<u8> {
        let mut bytes = tools::id_to_bytes(id);
        bytes.extend((content.len() as u64).as_vint().unwrap());
        bytes.extend_from_slice(content);
        bytes
    }

    fn drain(decoder: &mut TagDecoder) -> Vec<Tag> {
        let mut tags = Vec::new();
        while let Some(tag) = decoder.next_tag().unwrap() {
            tags.push(tag);
        }
        tags
    }

    fn seek_head() -> Vec<u8> {
        let seek = [
            element(ids::SeekID, &[0x15, 0x49, 0xa9, 0x66]),
            element(ids::SeekPosition, &[0x40]),
        ].concat();
        element(ids::SeekHead, &element(ids::Seek, &seek))
    }

    #[test]
    fn streams_nested_masters() {
        let mut decoder = TagDecoder::new(&[]);
        decoder.feed(&seek_head());
        let tags = drain(&mut decoder);

        let summary: Vec<(u64, &str)> = tags.iter().map(|t| (t.id, match t.position {
            TagPosition::Start => "start",
            TagPosition::Content(_) => "content",
            TagPosition::End => "end",
        })).collect();
        assert_eq!(vec![
            (ids::SeekHead, "start"),
            (ids::Seek, "start"),
            (ids::SeekID, "content"),
            (ids::SeekPosition, "content"),
            (ids::Seek, "end"),
            (ids::SeekHead, "end"),
        ], summary);
        assert_eq!(0, decoder.depth());
    }

    #[test]
    fn positions_are_absolute() {
        let mut decoder = TagDecoder::with_offset(&[], 1000);
        decoder.feed(&seek_head());
        let tags = drain(&mut decoder);

        assert_eq!(1000, tags[0].absolute_start);
        assert_eq!(5, tags[0].header_length);
        assert_eq!(1005, tags[1].absolute_start);
        assert_eq!(1008, tags[2].absolute_start);
        assert_eq!(1000 + seek_head().len() as u64, decoder.current_offset());
    }

    #[test]
    fn buffered_master_is_single_content() {
        let mut decoder = TagDecoder::new(&[ids::SeekHead]);
        decoder.feed(&seek_head());
        let tags = drain(&mut decoder);

        assert_eq!(1, tags.len());
        let seek = tags[0].child(ids::Seek).expect("seek child");
        assert_eq!(Some(&TagData::UnsignedInt(0x40)), seek.child(ids::SeekPosition).and_then(Tag::data));
        assert_eq!(8, seek.children().unwrap()[0].absolute_start);
    }

    #[test]
    fn split_input_gives_same_tags() {
        let bytes = seek_head();
        let mut whole = TagDecoder::new(&[]);
        whole.feed(&bytes);
        let expected = drain(&mut whole);

        for split in 0..=bytes.len() {
            let mut decoder = TagDecoder::new(&[]);
            decoder.feed(&bytes[..split]);
            let mut tags = drain(&mut decoder);
            decoder.feed(&bytes[split..]);
            tags.extend(drain(&mut decoder));
            assert_eq!(expected, tags, "split at {}", split);
        }
    }

    #[test]
    fn byte_at_a_time_buffered() {
        let bytes = seek_head();
        let mut decoder = TagDecoder::new(&[ids::SeekHead]);
        let mut tags = Vec::new();
        for byte in bytes.iter() {
            decoder.feed(&[*byte]);
            tags.extend(drain(&mut decoder));
        }
        assert_eq!(1, tags.len());
        assert_eq!(0, decoder.buffered_len());
    }

    #[test]
    fn one_advance_can_close_several_tags() {
        let inner = element(ids::Seek, &element(ids::SeekPosition, &[0x01]));
        let bytes = element(ids::SeekHead, &inner);
        let mut decoder = TagDecoder::new(&[]);
        decoder.feed(&bytes);
        let tags = drain(&mut decoder);

        assert!(tags[3].is_end() && tags[3].id == ids::Seek);
        assert!(tags[4].is_end() && tags[4].id == ids::SeekHead);
    }

    #[test]
    fn zero_size_master_opens_and_closes() {
        let mut decoder = TagDecoder::new(&[]);
        decoder.feed(&element(ids::Tags, &[]));
        let tags = drain(&mut decoder);

        assert_eq!(2, tags.len());
        assert!(tags[0].is_start());
        assert!(tags[1].is_end());
    }

    #[test]
    fn unknown_size_master_stays_open() {
        let mut bytes = tools::id_to_bytes(ids::Segment);
        bytes.push(0xff);
        bytes.extend(element(ids::Void, &[0, 0]));
        let mut decoder = TagDecoder::new(&[]);
        decoder.feed(&bytes);
        let tags = drain(&mut decoder);

        assert_eq!(EbmlSize::Unknown, tags[0].size);
        assert_eq!(2, tags.len());
        assert_eq!(1, decoder.depth());
    }

    #[test]
    fn unknown_size_on_buffered_tag_is_corrupted() {
        let mut bytes = tools::id_to_bytes(ids::Info);
        bytes.push(0xff);
        let mut decoder = TagDecoder::new(&[ids::Info]);
        decoder.feed(&bytes);
        assert!(matches!(decoder.next_tag(), Err(TagIteratorError::CorruptedData { position: 0, .. })));
    }

    #[test]
    fn zero_first_byte_is_corrupted() {
        let mut decoder = TagDecoder::with_offset(&[], 7);
        decoder.feed(&[0x00, 0x81]);
        assert!(matches!(decoder.next_tag(), Err(TagIteratorError::CorruptedData { position: 7, .. })));
    }

    #[test]
    fn incomplete_tail_is_left_buffered() {
        let bytes = element(ids::Title, b"hello");
        let mut decoder = TagDecoder::new(&[]);
        decoder.feed(&bytes[..4]);
        assert!(decoder.next_tag().unwrap().is_none());
        assert_eq!(4, decoder.buffered_len());
        assert_eq!(0, decoder.current_offset());
    }

    #[test]
    fn unknown_ids_are_binary() {
        let mut decoder = TagDecoder::new(&[]);
        decoder.feed(&element(0xF2, &[1, 2, 3]));
        let tag = decoder.next_tag().unwrap().unwrap();
        assert_eq!(Some(&TagData::Binary(vec![1, 2, 3])), tag.data());
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        #[derive(Clone, Debug)]
        enum Node {
            Number(u64),
            Void(Vec<u8>),
            Entry(Vec<Node>),
        }

        fn node() -> impl Strategy<Value = Node> {
            let leaf = prop_oneof![
                any::<u64>().prop_map(Node::Number),
                proptest::collection::vec(any::<u8>(), 0..40).prop_map(Node::Void),
            ];
            leaf.prop_recursive(4, 32, 4, |inner| proptest::collection::vec(inner, 0..4).prop_map(Node::Entry))
        }

        fn encode(node: &Node) -> Vec<u8> {
            match node {
                Node::Number(val) => element(ids::TrackNumber, &tools::u64_to_arr(*val)),
                Node::Void(bytes) => element(ids::Void, bytes),
                Node::Entry(children) => element(ids::TrackEntry, &children.iter().flat_map(encode).collect::<Vec<u8>>()),
            }
        }

        proptest! {
            #[test]
            fn any_two_chunk_split_gives_same_tags(
                tree in proptest::collection::vec(node(), 1..4),
                split in any::<prop::sample::Index>(),
                buffer_entries in any::<bool>(),
            ) {
                let bytes: Vec<u8> = tree.iter().flat_map(encode).collect();
                let buffer_ids = [ids::TrackEntry];
                let buffered = if buffer_entries { &buffer_ids[..] } else { &buffer_ids[..0] };

                let mut whole = TagDecoder::new(buffered);
                whole.feed(&bytes);
                let expected = drain(&mut whole);
                prop_assert_eq!(0, whole.depth());

                let split = split.index(bytes.len() + 1);
                let mut decoder = TagDecoder::new(buffered);
                decoder.feed(&bytes[..split]);
                let mut tags = drain(&mut decoder);
                decoder.feed(&bytes[split..]);
                tags.extend(drain(&mut decoder));

                prop_assert_eq!(expected, tags);
                prop_assert_eq!(bytes.len() as u64, decoder.current_offset());
            }
        }
    }
}

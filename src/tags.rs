//!
//! Contains types that hold tag data.
//!
//! These types are produced by the [`TagDecoder`][`super::TagDecoder`] front ends and consumed by the [`TagWriter`][`super::TagWriter`].
//!

use std::convert::TryFrom;

use super::errors::tool::ToolError;
use super::specs::TagDataType;
use super::tag_factory;
use super::tools::{self, Vint};

///
/// The declared size of an element.
///
/// EBML reserves the vint with every value bit set to mean "unknown size", which is used when a muxer streams a
/// "master" element without knowing its length up front.
///
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EbmlSize {
    Known(u64),
    Unknown,
}

impl EbmlSize {
    ///
    /// Interprets a raw size vint value of `vint_length` bytes.
    ///
    pub fn new(size: u64, vint_length: usize) -> Self {
        if (1..=8).contains(&vint_length) && size == (1 << (7 * vint_length)) - 1 {
            EbmlSize::Unknown
        } else {
            EbmlSize::Known(size)
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, EbmlSize::Known(_))
    }

    pub fn value(&self) -> Option<u64> {
        match self {
            EbmlSize::Known(size) => Some(*size),
            EbmlSize::Unknown => None,
        }
    }
}

///
/// `TagPosition` is an enumeration containing three different tag "positions" that this library works with.
///
#[derive(PartialEq, Debug, Clone)]
pub enum TagPosition {
    ///
    /// A marker for the beginning of a "master" tag that is being streamed.  Its children follow as separate tags.
    ///
    Start,

    ///
    /// A complete tag with fully decoded content.  For a buffered "master" tag this holds the whole subtree.
    ///
    Content(TagData),

    ///
    /// A marker for the end of a streamed "master" tag.
    ///
    End,
}

///
/// Contains the content of a tag.
///
#[derive(PartialEq, Debug, Clone)]
pub enum TagData {
    ///
    /// A complete master tag containing any number of child tags, in document order.
    ///
    Master(Vec<Tag>),
    UnsignedInt(u64),
    Integer(i64),
    Float(f64),

    ///
    /// Printable ASCII text.
    ///
    String(String),
    Utf8(String),
    Binary(Vec<u8>),

    ///
    /// Nanoseconds relative to 2001-01-01T00:00:00 UTC.
    ///
    Date(i64),
    Block(Block),
    SimpleBlock(SimpleBlock),
}

impl TagData {
    ///
    /// Returns the semantic type this data is encoded as.  Both block shapes are binary elements.
    ///
    pub fn data_type(&self) -> TagDataType {
        match self {
            TagData::Master(_) => TagDataType::Master,
            TagData::UnsignedInt(_) => TagDataType::UnsignedInt,
            TagData::Integer(_) => TagDataType::Integer,
            TagData::Float(_) => TagDataType::Float,
            TagData::String(_) => TagDataType::String,
            TagData::Utf8(_) => TagDataType::Utf8,
            TagData::Binary(_) | TagData::Block(_) | TagData::SimpleBlock(_) => TagDataType::Binary,
            TagData::Date(_) => TagDataType::Date,
        }
    }

    pub fn as_master(&self) -> Option<&[Tag]> {
        match self {
            TagData::Master(children) => Some(children),
            _ => None,
        }
    }

    pub fn as_unsigned_int(&self) -> Option<u64> {
        match self {
            TagData::UnsignedInt(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TagData::Integer(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            TagData::Float(val) => Some(*val),
            _ => None,
        }
    }

    ///
    /// Returns the text of either a `String` or a `Utf8` tag.
    ///
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagData::String(val) | TagData::Utf8(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            TagData::Binary(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<i64> {
        match self {
            TagData::Date(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            TagData::Block(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_simple_block(&self) -> Option<&SimpleBlock> {
        match self {
            TagData::SimpleBlock(val) => Some(val),
            _ => None,
        }
    }

    ///
    /// Converts a `Date` tag into a UTC timestamp.
    ///
    /// Returns `None` for other data or for dates outside of the range `chrono` can represent.
    ///
    #[cfg(feature = "chrono")]
    pub fn as_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        use chrono::TimeZone;

        const MILLENNIUM_UNIX_NANOS: i64 = 978_307_200 * 1_000_000_000;
        let nanos = self.as_date()?.checked_add(MILLENNIUM_UNIX_NANOS)?;
        Some(chrono::Utc.timestamp_nanos(nanos))
    }
}

///
/// A single EBML element as emitted by the decoder or accepted by the writer.
///
/// `absolute_start` and `header_length` describe where the element was found in the source (`header_length` is the
/// length of the id vint plus the length of the size vint).  Tags built in code for writing leave them at zero.
///
#[derive(PartialEq, Debug, Clone)]
pub struct Tag {
    pub id: u64,
    pub data_type: TagDataType,
    pub size: EbmlSize,
    pub absolute_start: u64,
    pub header_length: usize,
    pub position: TagPosition,
}

impl Tag {
    fn unpositioned(id: u64, data_type: TagDataType, position: TagPosition) -> Self {
        Tag {
            id,
            data_type,
            size: EbmlSize::Known(0),
            absolute_start: 0,
            header_length: 0,
            position,
        }
    }

    ///
    /// Creates a `Start` marker for a streamed master tag.
    ///
    /// # Panics
    ///
    /// Panics if `id` is a well known id that isn't a master element.
    ///
    pub fn start(id: u64) -> Self {
        Tag::unpositioned(id, tag_factory::data_type_for(id, Some(TagDataType::Master)), TagPosition::Start)
    }

    ///
    /// Creates a `Start` marker that the [`TagWriter`][`super::TagWriter`] will write with an unknown size.
    ///
    pub fn start_unknown_size(id: u64) -> Self {
        Tag { size: EbmlSize::Unknown, ..Tag::start(id) }
    }

    ///
    /// Creates an `End` marker for a streamed master tag.
    ///
    pub fn end(id: u64) -> Self {
        Tag::unpositioned(id, tag_factory::data_type_for(id, Some(TagDataType::Master)), TagPosition::End)
    }

    ///
    /// Creates a complete tag.
    ///
    /// # Panics
    ///
    /// Panics if `id` is a well known id whose data type doesn't match `data`.  This is a programming error rather
    /// than a data problem.
    ///
    pub fn content(id: u64, data: TagData) -> Self {
        let data_type = tag_factory::data_type_for(id, Some(data.data_type()));
        Tag::unpositioned(id, data_type, TagPosition::Content(data))
    }

    pub fn master(id: u64, children: Vec<Tag>) -> Self {
        Tag::content(id, TagData::Master(children))
    }

    pub fn unsigned_int(id: u64, val: u64) -> Self {
        Tag::content(id, TagData::UnsignedInt(val))
    }

    pub fn integer(id: u64, val: i64) -> Self {
        Tag::content(id, TagData::Integer(val))
    }

    pub fn float(id: u64, val: f64) -> Self {
        Tag::content(id, TagData::Float(val))
    }

    pub fn string(id: u64, val: &str) -> Self {
        Tag::content(id, TagData::String(val.to_string()))
    }

    pub fn utf8(id: u64, val: &str) -> Self {
        Tag::content(id, TagData::Utf8(val.to_string()))
    }

    pub fn binary(id: u64, val: &[u8]) -> Self {
        Tag::content(id, TagData::Binary(val.to_vec()))
    }

    ///
    /// Returns the registry name of the tag, if it is a well known element.
    ///
    pub fn name(&self) -> Option<&'static str> {
        super::specs::get_tag_name(self.id)
    }

    ///
    /// Absolute offset of the first content byte.
    ///
    pub fn content_start(&self) -> u64 {
        self.absolute_start + self.header_length as u64
    }

    ///
    /// Absolute offset just past the element, if its size is known.
    ///
    pub fn end_offset(&self) -> Option<u64> {
        self.size.value().map(|size| self.content_start() + size)
    }

    pub fn is_start(&self) -> bool {
        matches!(self.position, TagPosition::Start)
    }

    pub fn is_end(&self) -> bool {
        matches!(self.position, TagPosition::End)
    }

    pub fn data(&self) -> Option<&TagData> {
        match &self.position {
            TagPosition::Content(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<TagData> {
        match self.position {
            TagPosition::Content(data) => Some(data),
            _ => None,
        }
    }

    ///
    /// Returns the children of a buffered master tag.
    ///
    pub fn children(&self) -> Option<&[Tag]> {
        self.data().and_then(TagData::as_master)
    }

    ///
    /// Returns the first direct child with the given id.
    ///
    pub fn child(&self, id: u64) -> Option<&Tag> {
        self.children()?.iter().find(|child| child.id == id)
    }
}

///
/// Lacing mode of a block, stored in bits `0x0c` of the block flags.
///
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum BlockLacing {
    None,
    Xiph,
    Ebml,
    FixedSize,
}

impl BlockLacing {
    fn from_flags(flags: u8) -> Self {
        match flags & 0x0c {
            0x04 => BlockLacing::Xiph,
            0x08 => BlockLacing::Ebml,
            0x0c => BlockLacing::FixedSize,
            _ => BlockLacing::None,
        }
    }

    fn flags(&self) -> u8 {
        match self {
            BlockLacing::None => 0x00,
            BlockLacing::Xiph => 0x04,
            BlockLacing::Ebml => 0x08,
            BlockLacing::FixedSize => 0x0c,
        }
    }
}

///
/// The header of a `Block` element.  The payload (possibly several laced frames) is kept as opaque bytes.
///
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Block {
    pub track: u64,
    pub timecode: i16,
    pub invisible: bool,
    pub lacing: BlockLacing,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub payload: Vec<u8>,
}

impl Block {
    fn read_header(data: &[u8]) -> Result<(Block, u8), ToolError> {
        let (track, track_length) = tools::read_vint(data)?
            .ok_or_else(|| ToolError::ReadBlockHeader(data.to_vec()))?;

        if data.len() < track_length + 3 {
            return Err(ToolError::ReadBlockHeader(data.to_vec()));
        }

        let timecode = i16::from_be_bytes([data[track_length], data[track_length + 1]]);
        let flags = data[track_length + 2];
        let block = Block {
            track,
            timecode,
            invisible: flags & 0x10 != 0,
            lacing: BlockLacing::from_flags(flags),
            payload: data[(track_length + 3)..].to_vec(),
        };
        Ok((block, flags))
    }

    fn flags(&self) -> u8 {
        let mut flags = self.lacing.flags();
        if self.invisible {
            flags |= 0x10;
        }
        flags
    }

    fn encode_with_flags(&self, flags: u8) -> Result<Vec<u8>, ToolError> {
        let mut result = self.track.as_vint()?;
        result.extend_from_slice(&self.timecode.to_be_bytes());
        result.push(flags);
        result.extend_from_slice(&self.payload);
        Ok(result)
    }

    pub fn encode(&self) -> Result<Vec<u8>, ToolError> {
        self.encode_with_flags(self.flags())
    }
}

impl TryFrom<&[u8]> for Block {
    type Error = ToolError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Block::read_header(data).map(|(block, _)| block)
    }
}

///
/// The header of a `SimpleBlock` element: a [`Block`] header whose flag byte also carries the keyframe and
/// discardable bits.
///
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SimpleBlock {
    #[cfg_attr(feature = "serialize", serde(flatten))]
    pub block: Block,
    pub keyframe: bool,
    pub discardable: bool,
}

impl SimpleBlock {
    pub fn encode(&self) -> Result<Vec<u8>, ToolError> {
        let mut flags = self.block.flags();
        if self.keyframe {
            flags |= 0x80;
        }
        if self.discardable {
            flags |= 0x01;
        }
        self.block.encode_with_flags(flags)
    }
}

impl TryFrom<&[u8]> for SimpleBlock {
    type Error = ToolError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        let (block, flags) = Block::read_header(data)?;
        Ok(SimpleBlock {
            block,
            keyframe: flags & 0x80 != 0,
            discardable: flags & 0x01 != 0,
        })
    }
}

//!
//! Interprets tags by their semantic type.
//!
//! Every id is resolved through the element registry: well known ids get the data type the registry defines, the two
//! block ids get their dedicated header shapes, and anything else is opaque binary.
//!

use std::convert::{TryFrom, TryInto};

use ebml_seek_specification::ids;

use super::errors::tag_iterator::TagIteratorError;
use super::errors::tool::ToolError;
use super::specs::{self, TagDataType};
use super::tags::{Block, SimpleBlock, Tag, TagData, TagPosition};
use super::tools;

///
/// Resolves the data type of a tag id.
///
/// When `explicit` is given it must agree with the registry for well known ids.  Unknown ids take the explicit type,
/// or [`TagDataType::Binary`] when none is given.
///
/// # Panics
///
/// Panics if a well known id is given an explicit type that doesn't match the registry.  This indicates a programming
/// error in the caller, not bad input data.
///
pub fn data_type_for(id: u64, explicit: Option<TagDataType>) -> TagDataType {
    match (specs::get_tag_data_type(id), explicit) {
        (Some(known), Some(requested)) if known != requested => panic!(
            "Trying to create tag of well-known type '{}' using data type {:?} (which is incorrect).  Either pass the correct type or no type at all.",
            specs::get_tag_name(id).unwrap_or("?"),
            requested
        ),
        (Some(known), _) => known,
        (None, Some(requested)) => requested,
        (None, None) => TagDataType::Binary,
    }
}

fn corrupted(tag_id: u64, position: u64) -> impl FnOnce(ToolError) -> TagIteratorError {
    move |problem| TagIteratorError::CorruptedTagData { tag_id, position, problem }
}

///
/// Decodes the content bytes of a complete tag.
///
/// `position` is the absolute offset of the tag's first header byte and is only used to give errors (and child tags)
/// their location.
///
pub fn decode_content(id: u64, data_type: TagDataType, content: &[u8], position: u64, header_length: usize) -> Result<TagData, TagIteratorError> {
    let data = match data_type {
        TagDataType::Master => TagData::Master(decode_children(content, position + header_length as u64)?),
        TagDataType::UnsignedInt => TagData::UnsignedInt(tools::arr_to_u64(content).map_err(corrupted(id, position))?),
        TagDataType::Integer => TagData::Integer(tools::arr_to_i64(content).map_err(corrupted(id, position))?),
        TagDataType::Float => TagData::Float(tools::arr_to_f64(content).map_err(corrupted(id, position))?),
        TagDataType::String => TagData::String(tools::arr_to_string(content).map_err(corrupted(id, position))?),
        TagDataType::Utf8 => TagData::Utf8(tools::arr_to_string(content).map_err(corrupted(id, position))?),
        TagDataType::Date => TagData::Date(tools::arr_to_date(content).map_err(corrupted(id, position))?),
        TagDataType::Binary => match id {
            ids::Block => TagData::Block(Block::try_from(content).map_err(corrupted(id, position))?),
            ids::SimpleBlock => TagData::SimpleBlock(SimpleBlock::try_from(content).map_err(corrupted(id, position))?),
            _ => TagData::Binary(content.to_vec()),
        },
    };
    Ok(data)
}

///
/// Decodes the content of a buffered master tag into its children.
///
/// Children are read one after another until the content is exhausted.  `content_start` is the absolute offset of the
/// first content byte.
///
pub fn decode_children(content: &[u8], content_start: u64) -> Result<Vec<Tag>, TagIteratorError> {
    let mut children = Vec::new();
    let mut cursor = 0usize;

    while cursor < content.len() {
        let position = content_start + cursor as u64;
        let remaining = &content[cursor..];
        let truncated = || TagIteratorError::CorruptedData {
            position,
            message: String::from("Child tag header extends past the end of its parent."),
        };
        let vint_error = |e: ToolError| TagIteratorError::CorruptedData { position, message: e.to_string() };

        let (id, id_length) = tools::read_element_id(remaining).map_err(vint_error)?.ok_or_else(truncated)?;
        let (size, size_length) = tools::read_size_vint(&remaining[id_length..]).map_err(vint_error)?.ok_or_else(truncated)?;
        let header_length = id_length + size_length;

        let size = size.value().ok_or_else(|| TagIteratorError::CorruptedData {
            position,
            message: format!("Tag 0x{:X} inside a buffered tag has an unknown size.", id),
        })?;
        let end = size.try_into().ok()
            .and_then(|size: usize| size.checked_add(header_length))
            .filter(|end| *end <= remaining.len())
            .ok_or_else(|| TagIteratorError::CorruptedData {
                position,
                message: format!("Tag 0x{:X} of size {} is larger than its parent.", id, size),
            })?;

        let data_type = data_type_for(id, None);
        let data = decode_content(id, data_type, &remaining[header_length..end], position, header_length)?;
        children.push(Tag {
            id,
            data_type,
            size: crate::tags::EbmlSize::Known(size),
            absolute_start: position,
            header_length,
            position: TagPosition::Content(data),
        });
        cursor += end;
    }

    Ok(children)
}

///
/// Encodes the content of a complete non-master tag.
///
/// Master tags are assembled by the [`TagWriter`][`super::TagWriter`] since their content is the encoding of their children.
///
pub fn encode_content(data: &TagData) -> Result<Option<Vec<u8>>, ToolError> {
    let bytes = match data {
        TagData::Master(_) => return Ok(None),
        TagData::UnsignedInt(val) => tools::u64_to_arr(*val),
        TagData::Integer(val) => tools::i64_to_arr(*val),
        TagData::Float(val) => tools::f64_to_arr(*val),
        TagData::String(val) | TagData::Utf8(val) => val.as_bytes().to_vec(),
        TagData::Binary(val) => val.clone(),
        TagData::Date(val) => val.to_be_bytes().to_vec(),
        TagData::Block(block) => block.encode()?,
        TagData::SimpleBlock(block) => block.encode()?,
    };
    Ok(Some(bytes))
}

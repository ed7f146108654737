//! This crate provides the element registry used by the ebml-seek crate.
//!
//! The registry is a closed table of the well-known Matroska/WebM elements.  Every entry maps a numeric element id to
//! exactly one name and one [`TagDataType`].  Ids that aren't in the table are treated as opaque binary by consumers.
//!

use std::collections::HashMap;
use std::sync::OnceLock;

mod matroska;

pub use matroska::ids;

///
/// Different data types defined in the EBML specification.
///
/// # Notes
///
/// `String` holds printable ASCII, `Utf8` holds Unicode text.  Both are decoded into a Rust [`String`], but they're
/// kept distinct so that consumers can tell which encoding the specification asked for.
///
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum TagDataType {
    Master,
    UnsignedInt,
    Integer,
    Float,
    String,
    Utf8,
    Binary,
    Date,
}

///
/// A single entry in the element registry.
///
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ElementDef {
    ///
    /// The element id, including the vint marker bit (e.g. `0x18538067` for Segment).
    ///
    pub id: u64,

    ///
    /// The element name as it appears in the Matroska specification.
    ///
    pub name: &'static str,

    ///
    /// The data type the specification defines for this element.
    ///
    pub data_type: TagDataType,
}

///
/// Returns the raw registry table.
///
pub fn registry() -> &'static [ElementDef] {
    matroska::REGISTRY
}

struct RegistryIndex {
    by_id: HashMap<u64, &'static ElementDef>,
    by_name: HashMap<&'static str, &'static ElementDef>,
}

fn index() -> &'static RegistryIndex {
    static INDEX: OnceLock<RegistryIndex> = OnceLock::new();
    INDEX.get_or_init(|| {
        if let Err(problem) = validate(matroska::REGISTRY) {
            panic!("Bad registry implementation: {}", problem);
        }

        RegistryIndex {
            by_id: matroska::REGISTRY.iter().map(|def| (def.id, def)).collect(),
            by_name: matroska::REGISTRY.iter().map(|def| (def.name, def)).collect(),
        }
    })
}

///
/// Checks a registry table for internal consistency.
///
/// A consistent table has no duplicated ids, no duplicated names, and only contains ids that are well formed EBML
/// element ids (1 to 4 bytes long, with the vint marker matching the byte length).
///
/// # Errors
///
/// Returns a description of the first problem found.
///
pub fn validate(defs: &[ElementDef]) -> Result<(), String> {
    let mut ids: HashMap<u64, &str> = HashMap::with_capacity(defs.len());
    let mut names: HashMap<&str, u64> = HashMap::with_capacity(defs.len());

    for def in defs {
        if !is_well_formed_id(def.id) {
            return Err(format!("element '{}' has malformed id 0x{:X}", def.name, def.id));
        }
        if let Some(existing) = ids.insert(def.id, def.name) {
            return Err(format!("id 0x{:X} is registered for both '{}' and '{}'", def.id, existing, def.name));
        }
        if let Some(existing) = names.insert(def.name, def.id) {
            return Err(format!("name '{}' is registered for both 0x{:X} and 0x{:X}", def.name, existing, def.id));
        }
    }

    Ok(())
}

fn is_well_formed_id(id: u64) -> bool {
    if id == 0 {
        return false;
    }

    let byte_length = (64 - id.leading_zeros() as usize + 7) / 8;
    if byte_length > 4 {
        return false;
    }

    let first_byte = (id >> ((byte_length - 1) * 8)) as u8;
    first_byte.leading_zeros() as usize + 1 == byte_length
}

///
/// Looks up the registry entry for an element id.
///
pub fn get_element(id: u64) -> Option<&'static ElementDef> {
    index().by_id.get(&id).copied()
}

///
/// Looks up the registry entry for an element name.
///
pub fn get_element_by_name(name: &str) -> Option<&'static ElementDef> {
    index().by_name.get(name).copied()
}

///
/// Pulls the data type for a tag from the registry, based on the tag id.
///
/// Returns [`None`] if the id isn't in the registry.
///
pub fn get_tag_data_type(id: u64) -> Option<TagDataType> {
    get_element(id).map(|def| def.data_type)
}

///
/// Gets the name of a tag from the registry, based on the tag id.
///
pub fn get_tag_name(id: u64) -> Option<&'static str> {
    get_element(id).map(|def| def.name)
}

///
/// Gets the id of a tag from the registry, based on the tag name.
///
pub fn get_tag_id(name: &str) -> Option<u64> {
    get_element_by_name(name).map(|def| def.id)
}

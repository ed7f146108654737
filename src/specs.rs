//!
//! Provides the Matroska element registry.
//!
//! Lookups go through a validated index that is built on first use.  An inconsistent registry (duplicate ids or
//! names, malformed ids) panics at that point since it can only be a programming error.
//!

pub use ebml_seek_specification::{ElementDef, TagDataType, ids, registry, validate};
pub use ebml_seek_specification::{get_element, get_element_by_name, get_tag_data_type, get_tag_id, get_tag_name};

///
/// Returns the display name for an element id: the registry name when known, otherwise the id in `"0x1F43B675"` form.
///
pub fn display_name(id: u64) -> String {
    match get_tag_name(id) {
        Some(name) => name.to_string(),
        None => format!("0x{}", super::tools::id_to_hex(id)),
    }
}

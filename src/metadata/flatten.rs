//!
//! Turns buffered tags into name keyed values.
//!
//! Repeated names are never collapsed: an [`ElementMap`] keeps every child in document order and
//! [`ElementMap::get_all`] reaches all of them.
//!

use crate::specs;
use crate::tags::{Block, SimpleBlock, Tag, TagData};

///
/// The value of a single flattened element.
///
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    UnsignedInt(u64),
    Integer(i64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),

    ///
    /// Nanoseconds since 2001-01-01T00:00:00 UTC.
    ///
    Date(i64),
    Block(Block),
    SimpleBlock(SimpleBlock),
    Master(ElementMap),
}

impl FieldValue {
    pub fn as_unsigned_int(&self) -> Option<u64> {
        match self {
            FieldValue::UnsignedInt(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Binary(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ElementMap> {
        match self {
            FieldValue::Master(map) => Some(map),
            _ => None,
        }
    }
}

///
/// A flattened element: its id, display name and value.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub id: u64,
    pub name: String,
    pub value: FieldValue,
}

///
/// The flattened children of a master element, in document order.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementMap {
    fields: Vec<Field>,
}

impl ElementMap {
    ///
    /// Returns the first value stored under `name`.
    ///
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|field| field.name == name).map(|field| &field.value)
    }

    ///
    /// Returns every value stored under `name`.
    ///
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.fields.iter().filter(move |field| field.name == name).map(|field| &field.value)
    }

    pub fn get_by_id(&self, id: u64) -> Option<&FieldValue> {
        self.fields.iter().find(|field| field.id == id).map(|field| &field.value)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

///
/// The result of resolving a seeked element.
///
#[derive(Clone, Debug, PartialEq)]
pub enum SeekedElement {
    ///
    /// The seek table has no entry for the element.
    ///
    Absent,

    ///
    /// A single-occurrence element (like `Info`) as one mapping.
    ///
    Single(ElementMap),

    ///
    /// The children of the element as a sequence, one per child (e.g. one per `TrackEntry`).
    ///
    Multiple(Vec<Field>),
}

impl SeekedElement {
    pub(crate) fn empty(multiple: bool) -> Self {
        if multiple {
            SeekedElement::Multiple(Vec::new())
        } else {
            SeekedElement::Absent
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SeekedElement::Absent => true,
            SeekedElement::Single(map) => map.is_empty(),
            SeekedElement::Multiple(fields) => fields.is_empty(),
        }
    }

    pub fn as_single(&self) -> Option<&ElementMap> {
        match self {
            SeekedElement::Single(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&[Field]> {
        match self {
            SeekedElement::Multiple(fields) => Some(fields),
            _ => None,
        }
    }
}

fn field_value(data: &TagData) -> FieldValue {
    match data {
        TagData::Master(children) => FieldValue::Master(flatten_children(children)),
        TagData::UnsignedInt(val) => FieldValue::UnsignedInt(*val),
        TagData::Integer(val) => FieldValue::Integer(*val),
        TagData::Float(val) => FieldValue::Float(*val),
        TagData::String(val) | TagData::Utf8(val) => FieldValue::String(val.clone()),
        TagData::Binary(val) => FieldValue::Binary(val.clone()),
        TagData::Date(val) => FieldValue::Date(*val),
        TagData::Block(block) => FieldValue::Block(block.clone()),
        TagData::SimpleBlock(block) => FieldValue::SimpleBlock(block.clone()),
    }
}

fn to_field(tag: &Tag) -> Option<Field> {
    tag.data().map(|data| Field {
        id: tag.id,
        name: specs::display_name(tag.id),
        value: field_value(data),
    })
}

///
/// Flattens a list of complete tags.  `Start`/`End` markers have no value and are left out.
///
pub fn flatten_children(children: &[Tag]) -> ElementMap {
    ElementMap { fields: children.iter().filter_map(to_field).collect() }
}

///
/// Flattens a buffered tag.
///
/// With `multiple` the children are returned as a sequence, otherwise as one mapping.  A tag that isn't a master is
/// treated as the only child of itself.
///
pub fn flatten(tag: &Tag, multiple: bool) -> SeekedElement {
    let map = match tag.children() {
        Some(children) => flatten_children(children),
        None => ElementMap { fields: to_field(tag).into_iter().collect() },
    };

    if multiple {
        SeekedElement::Multiple(map.into_fields())
    } else {
        SeekedElement::Single(map)
    }
}

#[cfg(feature = "serialize")]
mod serialize {
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Serialize, Serializer};

    use super::{ElementMap, Field, FieldValue, SeekedElement};
    use crate::tools;

    impl Serialize for FieldValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                FieldValue::UnsignedInt(val) => serializer.serialize_u64(*val),
                FieldValue::Integer(val) | FieldValue::Date(val) => serializer.serialize_i64(*val),
                FieldValue::Float(val) => serializer.serialize_f64(*val),
                FieldValue::String(val) => serializer.serialize_str(val),
                FieldValue::Binary(val) => serializer.serialize_str(&tools::to_hex_string(val)),
                FieldValue::Block(block) => block.serialize(serializer),
                FieldValue::SimpleBlock(block) => block.serialize(serializer),
                FieldValue::Master(map) => map.serialize(serializer),
            }
        }
    }

    struct Repeated<'a>(Vec<&'a FieldValue>);

    impl Serialize for Repeated<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if let [single] = self.0.as_slice() {
                return single.serialize(serializer);
            }
            let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
            for value in &self.0 {
                seq.serialize_element(value)?;
            }
            seq.end()
        }
    }

    // Repeated names become one key holding an array, in order of first appearance.
    impl Serialize for ElementMap {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut groups: Vec<(&str, Repeated)> = Vec::new();
            for field in &self.fields {
                match groups.iter_mut().find(|(name, _)| *name == field.name) {
                    Some((_, repeated)) => repeated.0.push(&field.value),
                    None => groups.push((field.name.as_str(), Repeated(vec![&field.value]))),
                }
            }

            let mut map = serializer.serialize_map(Some(groups.len()))?;
            for (name, repeated) in &groups {
                map.serialize_entry(name, repeated)?;
            }
            map.end()
        }
    }

    impl Serialize for Field {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(&self.name, &self.value)?;
            map.end()
        }
    }

    impl Serialize for SeekedElement {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                SeekedElement::Absent => serializer.serialize_none(),
                SeekedElement::Single(map) => map.serialize(serializer),
                SeekedElement::Multiple(fields) => fields.serialize(serializer),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::specs::ids;

    fn tracks() -> Tag {
        Tag::master(ids::Tracks, vec![
            Tag::master(ids::TrackEntry, vec![
                Tag::unsigned_int(ids::TrackNumber, 1),
                Tag::string(ids::CodecID, "V_VP9"),
            ]),
            Tag::master(ids::TrackEntry, vec![
                Tag::unsigned_int(ids::TrackNumber, 2),
                Tag::string(ids::CodecID, "A_OPUS"),
            ]),
        ])
    }

    #[test]
    fn multiple_keeps_every_child() {
        let flattened = flatten(&tracks(), true);
        let fields = flattened.as_multiple().expect("sequence");

        assert_eq!(2, fields.len());
        assert_eq!("TrackEntry", fields[1].name);
        let second = fields[1].value.as_map().unwrap();
        assert_eq!(Some(&FieldValue::String(String::from("A_OPUS"))), second.get("CodecID"));
    }

    #[test]
    fn single_never_overwrites_repeats() {
        let flattened = flatten(&tracks(), false);
        let map = flattened.as_single().expect("mapping");

        assert_eq!(2, map.get_all("TrackEntry").count());
        let first = map.get("TrackEntry").and_then(FieldValue::as_map).unwrap();
        assert_eq!(Some(1), first.get("TrackNumber").and_then(FieldValue::as_unsigned_int));
    }

    #[test]
    fn lookup_name_can_be_short_lived() {
        let flattened = flatten(&tracks(), false);
        let map = flattened.as_single().unwrap();

        let first = {
            let name = String::from("TrackEntry");
            map.get(&name)
        };
        assert!(first.and_then(FieldValue::as_map).is_some());
    }

    #[test]
    fn unknown_ids_use_hex_names() {
        let info = Tag::master(ids::Info, vec![Tag::binary(0x1F43B600, &[0xab])]);
        let flattened = flatten(&info, false);
        let map = flattened.as_single().unwrap();

        assert_eq!(Some(&FieldValue::Binary(vec![0xab])), map.get("0x1F43B600"));
        assert_eq!(Some(&FieldValue::Binary(vec![0xab])), map.get_by_id(0x1F43B600));
    }

    #[test]
    fn empty_results() {
        assert_eq!(SeekedElement::Absent, SeekedElement::empty(false));
        assert!(SeekedElement::empty(true).is_empty());
        assert_eq!(Some(&[][..]), SeekedElement::empty(true).as_multiple());
    }
}

#![allow(dead_code)]

use ebml_seek::specs::ids;
use ebml_seek::tags::Tag;
use ebml_seek::TagWriter;

///
/// Bytes reserved at the start of the Segment for the first SeekHead (padded with a Void).
///
pub const SEEK_HEAD_SPACE: u64 = 200;

pub struct Fixture {
    pub bytes: Vec<u8>,
    pub segment_start: u64,
}

pub fn encode(tags: &[Tag]) -> Vec<u8> {
    let mut dest = Vec::new();
    let mut writer = TagWriter::new(&mut dest);
    for tag in tags {
        writer.write(tag).expect("Fixture tags should encode");
    }
    drop(writer);
    dest
}

pub fn ebml_header() -> Tag {
    Tag::master(ids::EBML, vec![
        Tag::unsigned_int(ids::EBMLVersion, 1),
        Tag::string(ids::DocType, "webm"),
    ])
}

pub fn seek(id: u64, position: u64) -> Tag {
    Tag::master(ids::Seek, vec![
        Tag::binary(ids::SeekID, &ebml_seek::tools::id_to_bytes(id)),
        Tag::unsigned_int(ids::SeekPosition, position),
    ])
}

pub fn seek_head(seeks: &[(u64, u64)]) -> Tag {
    Tag::master(ids::SeekHead, seeks.iter().map(|(id, position)| seek(*id, *position)).collect())
}

///
/// Segment relative positions of `elements` when laid out after the reserved SeekHead space.
///
pub fn positions(elements: &[Tag]) -> Vec<(u64, u64)> {
    let mut position = SEEK_HEAD_SPACE;
    elements.iter().map(|element| {
        let entry = (element.id, position);
        position += encode(std::slice::from_ref(element)).len() as u64;
        entry
    }).collect()
}

fn padding(length: usize) -> Tag {
    (0..length)
        .rev()
        .map(|content_length| Tag::binary(ids::Void, &vec![0; content_length]))
        .find(|void| encode(std::slice::from_ref(void)).len() == length)
        .expect("SeekHead doesn't fit in the reserved space")
}

///
/// Builds a file: EBML header, then a Segment whose first SeekHead holds exactly `seeks`, followed by `elements`.
///
pub fn build(elements: &[Tag], seeks: &[(u64, u64)]) -> Fixture {
    let head = seek_head(seeks);
    let head_length = encode(std::slice::from_ref(&head)).len();
    let mut children = vec![head, padding(SEEK_HEAD_SPACE as usize - head_length)];
    children.extend(elements.iter().cloned());

    let header = encode(&[ebml_header()]);
    let segment_start = header.len() as u64 + 12;
    let bytes = [header, encode(&[Tag::master(ids::Segment, children)])].concat();

    Fixture { bytes, segment_start }
}

///
/// Builds a file whose SeekHead indexes every element.
///
pub fn indexed(elements: &[Tag]) -> Fixture {
    build(elements, &positions(elements))
}

pub fn info() -> Tag {
    Tag::master(ids::Info, vec![
        Tag::unsigned_int(ids::TimecodeScale, 1000000),
        Tag::utf8(ids::MuxingApp, "ebml-seek tests"),
        Tag::float(ids::Duration, 1234.0),
    ])
}

pub fn tracks() -> Tag {
    Tag::master(ids::Tracks, vec![
        Tag::master(ids::TrackEntry, vec![
            Tag::unsigned_int(ids::TrackNumber, 1),
            Tag::unsigned_int(ids::TrackType, 1),
            Tag::string(ids::CodecID, "V_VP9"),
            Tag::master(ids::Video, vec![
                Tag::unsigned_int(ids::PixelWidth, 640),
                Tag::unsigned_int(ids::PixelHeight, 360),
            ]),
        ]),
        Tag::master(ids::TrackEntry, vec![
            Tag::unsigned_int(ids::TrackNumber, 2),
            Tag::unsigned_int(ids::TrackType, 2),
            Tag::string(ids::CodecID, "A_OPUS"),
            Tag::string(ids::Language, "eng"),
        ]),
    ])
}

pub fn cluster() -> Tag {
    Tag::master(ids::Cluster, vec![
        Tag::unsigned_int(ids::Timecode, 0),
        Tag::binary(ids::SimpleBlock, &[0x81, 0x00, 0x00, 0x80, 0xde, 0xad]),
    ])
}

pub fn cues() -> Tag {
    Tag::master(ids::Cues, vec![
        Tag::master(ids::CuePoint, vec![
            Tag::unsigned_int(ids::CueTime, 0),
            Tag::master(ids::CueTrackPositions, vec![
                Tag::unsigned_int(ids::CueTrack, 1),
                Tag::unsigned_int(ids::CueClusterPosition, 400),
            ]),
        ]),
    ])
}

pub fn sample_elements() -> Vec<Tag> {
    vec![info(), tracks(), cluster()]
}

pub fn sample() -> Fixture {
    indexed(&sample_elements())
}

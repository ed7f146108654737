use std::io::Write;

use super::errors::tag_writer::TagWriterError;
use super::specs::ids;
use super::tag_factory;
use super::tags::{EbmlSize, Tag, TagData, TagPosition};
use super::tools::{self, Vint};

///
/// Provides a tool to write EBML files based on Tags.  Writes to a destination that implements [`std::io::Write`].
///
/// The writer accepts the same [`Tag`] values the [`TagIterator`][`super::TagIterator`] emits, so a decoded stream can be written back out unchanged.  Streamed masters (`Start` ... `End`) are assembled in memory until they close, since their size has to be written before their content.  Once no sized master is open the assembled bytes are written to the destination.
///
/// A `Start` tag with [`EbmlSize::Unknown`] is written with the unknown-size marker and its content is passed straight through.  `Segment` and `Cluster` sizes are always written as 8 byte vints.
///
/// ## Example
///
/// ```no_run
/// use std::fs::File;
/// use ebml_seek::TagWriter;
/// use ebml_seek::tags::Tag;
/// use ebml_seek::specs::ids;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut file = File::create("my_ebml_file.ebml")?;
/// let mut my_writer = TagWriter::new(&mut file);
/// my_writer.write(&Tag::master(ids::EBML, vec![Tag::string(ids::DocType, "webm")]))?;
/// # Ok(())
/// # }
/// ```
///
pub struct TagWriter<W: Write>
{
    dest: W,
    open_tags: Vec<(u64, Option<usize>)>,
    working_buffer: Vec<u8>,
}

impl<W: Write> TagWriter<W>
{
    pub fn new(dest: W) -> Self {
        TagWriter {
            dest,
            open_tags: Vec::new(),
            working_buffer: Vec::new(),
        }
    }

    ///
    /// Consumes the writer and returns the destination.
    ///
    /// Anything belonging to a sized master that was never closed is discarded.
    ///
    pub fn into_inner(self) -> W {
        self.dest
    }

    fn start_tag(&mut self, id: u64, size: EbmlSize) {
        match size {
            EbmlSize::Known(_) => self.open_tags.push((id, Some(self.working_buffer.len()))),
            EbmlSize::Unknown => {
                self.working_buffer.extend(tools::id_to_bytes(id));
                self.working_buffer.extend_from_slice(&tools::unknown_size_vint());
                self.open_tags.push((id, None));
            }
        }
    }

    fn end_tag(&mut self, id: u64) -> Result<(), TagWriterError> {
        match self.open_tags.pop() {
            Some((open_id, start)) => {
                if open_id == id {
                    if let Some(start) = start {
                        let size = (self.working_buffer.len() - start) as u64;
                        self.insert_header(id, size, start)?;
                    }
                    Ok(())
                } else {
                    Err(TagWriterError::UnexpectedClosingTag { tag_id: id, expected_id: Some(open_id) })
                }
            },
            None => Err(TagWriterError::UnexpectedClosingTag { tag_id: id, expected_id: None })
        }
    }

    fn size_vint(id: u64, size: u64) -> Result<Vec<u8>, TagWriterError> {
        let vint = match id {
            ids::Segment | ids::Cluster => size.as_vint_with_length(8)?,
            _ => size.as_vint()?,
        };
        Ok(vint)
    }

    fn insert_header(&mut self, id: u64, size: u64, index: usize) -> Result<(), TagWriterError> {
        let size_vint = Self::size_vint(id, size)?;
        self.working_buffer.splice(index..index, tools::id_to_bytes(id).into_iter().chain(size_vint));
        Ok(())
    }

    fn write_data_tag(&mut self, id: u64, data: &[u8]) -> Result<(), TagWriterError> {
        self.working_buffer.extend(tools::id_to_bytes(id));
        self.working_buffer.extend(Self::size_vint(id, data.len() as u64)?);
        self.working_buffer.extend_from_slice(data);
        Ok(())
    }

    fn write_content(&mut self, id: u64, data: &TagData) -> Result<(), TagWriterError> {
        match data {
            TagData::Master(children) => {
                self.start_tag(id, EbmlSize::Known(0));
                for child in children {
                    self.write_tag(child)?;
                }
                self.end_tag(id)
            },
            other => {
                let bytes = tag_factory::encode_content(other)?.ok_or(TagWriterError::MissingContent(id))?;
                self.write_data_tag(id, &bytes)
            }
        }
    }

    fn write_tag(&mut self, tag: &Tag) -> Result<(), TagWriterError> {
        match &tag.position {
            TagPosition::Start => {
                self.start_tag(tag.id, tag.size);
                Ok(())
            },
            TagPosition::End => self.end_tag(tag.id),
            TagPosition::Content(data) => self.write_content(tag.id, data),
        }
    }

    fn flush_if_complete(&mut self) -> Result<(), TagWriterError> {
        if self.open_tags.iter().all(|(_, start)| start.is_none()) && !self.working_buffer.is_empty() {
            self.dest.write_all(&self.working_buffer)?;
            self.dest.flush()?;
            self.working_buffer.clear();
        }
        Ok(())
    }

    ///
    /// Writes a tag.
    ///
    /// # Errors
    ///
    /// Returns [`TagWriterError::UnexpectedClosingTag`] if an `End` tag doesn't match the innermost open master, and
    /// [`TagWriterError::TagSizeError`] if a size can't be represented as a vint.
    ///
    pub fn write(&mut self, tag: &Tag) -> Result<(), TagWriterError> {
        self.write_tag(tag)?;
        self.flush_if_complete()
    }

    ///
    /// Writes `data` as the content of tag `tag_id` without interpreting it.
    ///
    pub fn write_raw(&mut self, tag_id: u64, data: &[u8]) -> Result<(), TagWriterError> {
        self.write_data_tag(tag_id, data)?;
        self.flush_if_complete()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::super::tools::Vint;
    use super::*;

    fn written(tags: &[Tag]) -> Vec<u8> {
        let mut dest = Cursor::new(Vec::new());
        let mut writer = TagWriter::new(&mut dest);
        for tag in tags {
            writer.write(tag).expect("Error writing tag");
        }
        dest.into_inner()
    }

    #[test]
    fn write_ebml_tag() {
        let mut dest = Cursor::new(Vec::new());
        let mut writer = TagWriter::new(&mut dest);
        writer.write_raw(0x1a45dfa3, &[]).expect("Error writing tag");

        let zero_size = 0u64.as_vint().expect("Error converting [0] to vint")[0];
        assert_eq!(vec![0x1a, 0x45, 0xdf, 0xa3, zero_size], dest.get_ref().to_vec());
    }

    #[test]
    fn start_end_matches_full_master() {
        let streamed = written(&[
            Tag::start(ids::Info),
            Tag::unsigned_int(ids::TimecodeScale, 1000000),
            Tag::end(ids::Info),
        ]);
        let full = written(&[Tag::master(ids::Info, vec![Tag::unsigned_int(ids::TimecodeScale, 1000000)])]);

        assert_eq!(full, streamed);
        assert_eq!(vec![0x15, 0x49, 0xa9, 0x66, 0x87, 0x2a, 0xd7, 0xb1, 0x83, 0x0f, 0x42, 0x40], full);
    }

    #[test]
    fn segment_size_is_eight_bytes() {
        let bytes = written(&[Tag::start(ids::Segment), Tag::end(ids::Segment)]);
        assert_eq!(vec![0x18, 0x53, 0x80, 0x67, 0x01, 0, 0, 0, 0, 0, 0, 0], bytes);
    }

    #[test]
    fn unknown_size_start_streams_through() {
        let mut dest = Cursor::new(Vec::new());
        let mut writer = TagWriter::new(&mut dest);
        writer.write(&Tag::start_unknown_size(ids::Segment)).unwrap();
        writer.write(&Tag::binary(ids::Void, &[0])).unwrap();
        assert_eq!(
            vec![0x18, 0x53, 0x80, 0x67, 0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xec, 0x81, 0x00],
            dest.get_ref().to_vec()
        );
    }

    #[test]
    fn nothing_written_while_master_open() {
        let mut dest = Cursor::new(Vec::new());
        let mut writer = TagWriter::new(&mut dest);
        writer.write(&Tag::start(ids::Tracks)).unwrap();
        writer.write(&Tag::unsigned_int(ids::TrackNumber, 1)).unwrap();
        assert!(dest.get_ref().is_empty());
    }

    #[test]
    fn mismatched_end_is_error() {
        let mut writer = TagWriter::new(Vec::new());
        writer.write(&Tag::start(ids::Tracks)).unwrap();
        let result = writer.write(&Tag::end(ids::Info));
        assert!(matches!(result, Err(TagWriterError::UnexpectedClosingTag { tag_id: ids::Info, expected_id: Some(ids::Tracks) })));
    }

    #[test]
    fn end_without_start_is_error() {
        let mut writer = TagWriter::new(Vec::new());
        let result = writer.write(&Tag::end(ids::Info));
        assert!(matches!(result, Err(TagWriterError::UnexpectedClosingTag { expected_id: None, .. })));
    }
}

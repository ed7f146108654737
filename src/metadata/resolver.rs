use std::collections::{HashMap, HashSet};

use futures::AsyncReadExt;
use tracing::{debug, trace};

use super::flatten::{flatten, SeekedElement};
use super::seek_table::SeekTable;
use super::MetadataConfig;
use crate::errors::metadata::MetadataError;
use crate::source::ByteRangeSource;
use crate::specs::ids;
use crate::tags::Tag;
use crate::TagIteratorAsync;

///
/// Reads Matroska metadata by jumping straight to the elements listed in the `SeekHead`.
///
/// A `Metadata` session is bound to one [`ByteRangeSource`].  Calls must follow the order the index requires:
/// [`Self::get_segment()`], then [`Self::get_seek_head()`], then any number of [`Self::read_seeked_tag()`] calls (or
/// the `get_*` shortcuts).  Each step is memoized, and every seeked element is read from the source at most once per
/// session.
///
/// All resolving methods take `&mut self`, so a session resolves one thing at a time.  Share it behind a lock if
/// several tasks need it.
///
/// ## Example
///
/// ```no_run
/// use ebml_seek::metadata::Metadata;
/// use ebml_seek::source::FileSource;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// futures::executor::block_on(async {
///     let mut metadata = Metadata::new(FileSource::new("my_movie.mkv"));
///     metadata.get_segment().await?;
///     metadata.get_seek_head().await?;
///     let tracks = metadata.get_tracks().await?;
///     println!("{:?}", tracks);
///     Ok::<(), Box<dyn std::error::Error>>(())
/// })
/// # }
/// ```
///
pub struct Metadata<S: ByteRangeSource> {
    source: S,
    config: MetadataConfig,
    segment: Option<Tag>,
    seek_table: Option<SeekTable>,
    cache: HashMap<String, Tag>,
}

fn absolute(segment_start: u64, name: &str, position: u64) -> Result<u64, MetadataError> {
    segment_start.checked_add(position).ok_or_else(|| MetadataError::SeekPositionOutOfRange { name: name.to_string(), position })
}

impl<S: ByteRangeSource> Metadata<S> {
    pub fn new(source: S) -> Self {
        Metadata::with_config(source, MetadataConfig::default())
    }

    pub fn with_config(source: S, config: MetadataConfig) -> Self {
        Metadata {
            source,
            config,
            segment: None,
            seek_table: None,
            cache: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    ///
    /// Absolute position of the first byte of Segment content, once the Segment has been read.
    ///
    pub fn segment_start(&self) -> Option<u64> {
        self.segment.as_ref().map(Tag::content_start)
    }

    ///
    /// Returns the decoded tag stored for `name`, if it has been resolved.
    ///
    pub fn cached_tag(&self, name: &str) -> Option<&Tag> {
        self.cache.get(name)
    }

    ///
    /// Reads from `start` until a tag with `id` is found.
    ///
    /// When `buffer` is set, masters with `id` are read whole.  Returns `Ok(None)` if the source ends first.  With
    /// `max_scan_bytes` set, the source is cut off that many bytes after `start`, so a tag extending past the cap is
    /// never buffered.
    ///
    async fn read_until_tag(&self, start: u64, id: u64, buffer: bool) -> Result<Option<Tag>, MetadataError> {
        let reader = self.source.open_read_stream(start).map_err(|source| MetadataError::Io { offset: start, source })?;
        let reader = reader.take(self.config.max_scan_bytes.unwrap_or(u64::MAX));
        let buffered = [id];
        let tag_ids_to_buffer = if buffer { &buffered[..] } else { &buffered[..0] };
        let mut tags = TagIteratorAsync::starting_at(reader, tag_ids_to_buffer, start, self.config.read_buffer_len);

        while let Some(tag) = tags.next().await {
            let tag = tag?;
            if tag.id == id && !tag.is_end() {
                return Ok(Some(tag));
            }
        }

        if self.config.max_scan_bytes.is_some() {
            debug!(start, id, scanned = tags.current_offset() - start, "scan ended without a match");
        }
        Ok(None)
    }

    async fn find_segment(&self) -> Result<Tag, MetadataError> {
        let segment = self.read_until_tag(0, ids::Segment, false).await?.ok_or(MetadataError::SegmentNotFound)?;
        debug!(position = segment.absolute_start, content_start = segment.content_start(), "found segment");
        Ok(segment)
    }

    ///
    /// Locates the first `Segment` in the source.
    ///
    /// The returned tag is a `Start` marker; its [`Tag::content_start()`] is the base every seek position is relative to.
    ///
    /// # Errors
    ///
    /// [`MetadataError::SegmentNotFound`] if the source ends before a Segment starts.
    ///
    pub async fn get_segment(&mut self) -> Result<&Tag, MetadataError> {
        let segment = match self.segment.take() {
            Some(segment) => segment,
            None => self.find_segment().await?,
        };
        Ok(self.segment.insert(segment))
    }

    async fn resolve_seek_table(&self, segment_start: u64) -> Result<SeekTable, MetadataError> {
        let mut visited = HashSet::new();
        let mut table = SeekTable::default();
        let mut offset = segment_start;

        loop {
            let seek_head = match self.read_until_tag(offset, ids::SeekHead, true).await? {
                Some(seek_head) => seek_head,
                None if visited.is_empty() => return Err(MetadataError::SeekHeadNotFound { segment_start }),
                None => return Err(MetadataError::ElementNotFound { name: String::from("SeekHead"), offset }),
            };
            if !visited.insert(seek_head.absolute_start) {
                return Err(MetadataError::SeekHeadCycle { offset: seek_head.absolute_start });
            }

            let found = SeekTable::from_seek_head(&seek_head);
            debug!(position = seek_head.absolute_start, entries = found.len(), "read seek head");
            let next = found.position("SeekHead").map(|position| absolute(segment_start, "SeekHead", position)).transpose()?;
            table.merge(found);

            match next {
                Some(next) if visited.contains(&next) => return Err(MetadataError::SeekHeadCycle { offset: next }),
                Some(next) => {
                    debug!(position = next, "following chained seek head");
                    offset = next;
                },
                None => return Ok(table),
            }
        }
    }

    ///
    /// Reads the `SeekHead` at the start of the Segment and builds the seek table.
    ///
    /// A `SeekHead` entry pointing at a further `SeekHead` is followed and the tables are merged, with entries from the
    /// nearer table winning.
    ///
    /// # Errors
    ///
    /// * [`MetadataError::SegmentNotRead`] if [`Self::get_segment()`] hasn't succeeded yet.
    /// * [`MetadataError::SeekHeadNotFound`] if there's no `SeekHead`.
    /// * [`MetadataError::SeekHeadCycle`] if `SeekHead` entries lead back to a `SeekHead` already read.
    ///
    pub async fn get_seek_head(&mut self) -> Result<&SeekTable, MetadataError> {
        let segment_start = self.segment_start().ok_or(MetadataError::SegmentNotRead)?;
        let table = match self.seek_table.take() {
            Some(table) => table,
            None => self.resolve_seek_table(segment_start).await?,
        };
        Ok(self.seek_table.insert(table))
    }

    ///
    /// Resolves a top-level element by its seek table name (e.g. `"Info"`, `"Tracks"`, `"Cluster"`).
    ///
    /// Returns [`SeekedElement::Multiple`] holding one entry per child when `multiple` is set, otherwise
    /// [`SeekedElement::Single`].  A name missing from the seek table resolves to an empty result without touching the
    /// source.  The element is read once; later calls are answered from the session cache.
    ///
    /// # Errors
    ///
    /// * [`MetadataError::SeekHeadNotRead`] if [`Self::get_seek_head()`] hasn't succeeded yet.
    /// * [`MetadataError::ElementNotFound`] if the source ends before the element is found at its seek position.
    ///
    pub async fn read_seeked_tag(&mut self, name: &str, multiple: bool) -> Result<SeekedElement, MetadataError> {
        let table = self.seek_table.as_ref().ok_or(MetadataError::SeekHeadNotRead)?;
        let segment_start = self.segment_start().ok_or(MetadataError::SegmentNotRead)?;

        if let Some(tag) = self.cache.get(name) {
            trace!(name, "seeked tag cache hit");
            return Ok(flatten(tag, multiple));
        }

        let entry = match table.get(name) {
            Some(entry) => *entry,
            None => {
                trace!(name, "no seek entry");
                return Ok(SeekedElement::empty(multiple));
            }
        };

        let offset = absolute(segment_start, name, entry.position)?;
        let tag = self.read_until_tag(offset, entry.id, true).await?
            .ok_or_else(|| MetadataError::ElementNotFound { name: name.to_string(), offset })?;
        debug!(name, position = tag.absolute_start, "read seeked tag");

        let tag = self.cache.entry(name.to_string()).or_insert(tag);
        Ok(flatten(tag, multiple))
    }

    pub async fn get_info(&mut self) -> Result<SeekedElement, MetadataError> {
        self.read_seeked_tag("Info", false).await
    }

    pub async fn get_tracks(&mut self) -> Result<SeekedElement, MetadataError> {
        self.read_seeked_tag("Tracks", true).await
    }

    pub async fn get_chapters(&mut self) -> Result<SeekedElement, MetadataError> {
        self.read_seeked_tag("Chapters", true).await
    }

    ///
    /// Resolves the `Cluster` the seek table points at (usually the first one).
    ///
    pub async fn get_clusters(&mut self) -> Result<SeekedElement, MetadataError> {
        self.read_seeked_tag("Cluster", true).await
    }

    pub async fn get_cues(&mut self) -> Result<SeekedElement, MetadataError> {
        self.read_seeked_tag("Cues", true).await
    }

    pub async fn get_attachments(&mut self) -> Result<SeekedElement, MetadataError> {
        self.read_seeked_tag("Attachments", true).await
    }

    pub async fn get_tags(&mut self) -> Result<SeekedElement, MetadataError> {
        self.read_seeked_tag("Tags", true).await
    }
}

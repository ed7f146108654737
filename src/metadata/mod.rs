//!
//! SeekHead driven access to Matroska metadata.
//!
//! [`Metadata`] locates the Segment, reads its `SeekHead` index into a [`SeekTable`], and then fetches individual
//! top-level elements (Info, Tracks, Chapters, ...) by reading directly at their indexed positions.  Resolved elements
//! are handed out as [`SeekedElement`] values built from [`ElementMap`]s.
//!

mod flatten;
#[cfg(feature = "futures")]
mod resolver;
mod seek_table;

pub use flatten::{flatten, flatten_children, ElementMap, Field, FieldValue, SeekedElement};
#[cfg(feature = "futures")]
pub use resolver::Metadata;
pub use seek_table::{SeekEntry, SeekTable};

///
/// Tuning for a [`Metadata`] session.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataConfig {
    ///
    /// Number of bytes requested from the source per read.  Defaults to 64KiB.
    ///
    pub read_buffer_len: usize,

    ///
    /// How many bytes a single scan (for the Segment, a SeekHead or a seeked element) may read from the source.  The
    /// source is cut off at this point, so an element is only found if it ends within the cap, and no tag larger than
    /// the cap is ever buffered.  Unlimited by default.
    ///
    pub max_scan_bytes: Option<u64>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig {
            read_buffer_len: 1024 * 64,
            max_scan_bytes: None,
        }
    }
}

impl MetadataConfig {
    pub fn with_read_buffer_len(self, read_buffer_len: usize) -> Self {
        MetadataConfig { read_buffer_len, ..self }
    }

    pub fn with_max_scan_bytes(self, max_scan_bytes: u64) -> Self {
        MetadataConfig { max_scan_bytes: Some(max_scan_bytes), ..self }
    }
}

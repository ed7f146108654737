//! This crate reads [EBML][EBML] streams and resolves Matroska/WebM metadata without loading whole files.
//!
//! [EBML][EBML] stands for Extensible Binary Meta-Language and is somewhat of a
//! binary version of XML. It's used for container formats like [WebM][webm] or
//! [MKV][mkv].
//!
//! # Decoding
//! [`TagIterator`] (over [`std::io::Read`]) and `TagIteratorAsync` (over [`futures::AsyncRead`], with the default
//! `futures` feature) emit [`tags::Tag`] values.  Master elements are streamed as `Start` and `End` markers unless
//! their ids are listed for buffering, in which case they arrive whole.  Both are thin wrappers around
//! [`TagDecoder`], which accepts bytes in chunks of any size.  Element types come from the built-in Matroska registry
//! in [`specs`]; unknown ids pass through as binary.
//!
//! # Metadata
//! With the `futures` feature, `metadata::Metadata` uses the Segment's `SeekHead` index to read the Info, Tracks,
//! Chapters, Cues, Attachments and Tags elements directly from their positions in a [`source::ByteRangeSource`].
//!
//! # Features
//! * `futures` (default): async iterator, byte-range sources and the metadata resolver.
//! * `serialize`: `serde::Serialize` for flattened metadata and block headers.
//! * `chrono`: conversion of `Date` elements to `chrono::DateTime`.
//! * `cli`: the `ebml-seek` command line tool.
//!
//! [EBML]: http://ebml.sourceforge.net/
//! [webm]: https://www.webmproject.org/
//! [mkv]: http://www.matroska.org/technical/specs/index.html
//!

mod errors;
mod tag_decoder;
mod tag_factory;
mod tag_iterator;
#[cfg(feature = "futures")]
mod tag_iterator_async;
mod tag_writer;
pub mod metadata;
#[cfg(feature = "futures")]
pub mod source;
pub mod specs;
pub mod tags;
pub mod tools;

pub use self::tag_decoder::TagDecoder;
pub use self::tag_iterator::TagIterator;
#[cfg(feature = "futures")]
pub use self::tag_iterator_async::TagIteratorAsync;
pub use self::tag_writer::TagWriter;

pub mod error {
    //!
    //! Errors returned by this crate.
    //!
    pub use super::errors::metadata::MetadataError;
    pub use super::errors::tag_iterator::TagIteratorError;
    pub use super::errors::tag_writer::TagWriterError;
    pub use super::errors::tool::ToolError;
}

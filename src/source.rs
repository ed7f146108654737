//!
//! Byte-range sources the [`Metadata`][`crate::metadata::Metadata`] resolver reads from.
//!
//! A source hands out independent readers starting at an absolute offset.  Readers are plain owned values, so dropping
//! one (on success, error or early return) releases whatever it holds.
//!

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use blocking::Unblock;
use futures::AsyncRead;

///
/// A resource that can be read from any absolute byte offset.
///
pub trait ByteRangeSource {
    type Reader: AsyncRead + Unpin;

    ///
    /// Opens a reader positioned at `start`.  The reader yields every byte from `start` to the end of the resource.
    ///
    fn open_read_stream(&self, start: u64) -> io::Result<Self::Reader>;
}

impl<S: ByteRangeSource + ?Sized> ByteRangeSource for &S {
    type Reader = S::Reader;

    fn open_read_stream(&self, start: u64) -> io::Result<Self::Reader> {
        (**self).open_read_stream(start)
    }
}

impl<S: ByteRangeSource + ?Sized> ByteRangeSource for Arc<S> {
    type Reader = S::Reader;

    fn open_read_stream(&self, start: u64) -> io::Result<Self::Reader> {
        (**self).open_read_stream(start)
    }
}

///
/// An in-memory resource.
///
/// `chunk_size` limits how many bytes a single read returns, which is handy for exercising chunk boundaries.
///
#[derive(Clone, Debug)]
pub struct MemorySource {
    data: Arc<[u8]>,
    chunk_size: Option<usize>,
}

impl MemorySource {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        MemorySource { data: data.into(), chunk_size: None }
    }

    pub fn with_chunk_size(self, chunk_size: usize) -> Self {
        MemorySource { chunk_size: Some(chunk_size.max(1)), ..self }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteRangeSource for MemorySource {
    type Reader = MemoryReader;

    fn open_read_stream(&self, start: u64) -> io::Result<MemoryReader> {
        let position = usize::try_from(start).unwrap_or(usize::MAX).min(self.data.len());
        Ok(MemoryReader {
            data: Arc::clone(&self.data),
            position,
            chunk_size: self.chunk_size,
        })
    }
}

///
/// Reader returned by [`MemorySource`].
///
#[derive(Debug)]
pub struct MemoryReader {
    data: Arc<[u8]>,
    position: usize,
    chunk_size: Option<usize>,
}

impl AsyncRead for MemoryReader {
    fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut [u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let remaining = &this.data[this.position..];
        let mut len = remaining.len().min(buf.len());
        if let Some(chunk_size) = this.chunk_size {
            len = len.min(chunk_size);
        }
        buf[..len].copy_from_slice(&remaining[..len]);
        this.position += len;
        Poll::Ready(Ok(len))
    }
}

///
/// A file on disk.  Every read opens its own handle.
///
/// Reads run on the `blocking` thread pool, so polling a reader never blocks the executor.  Opening the file and
/// seeking to `start` happen inside [`ByteRangeSource::open_read_stream`].
///
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileSource { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteRangeSource for FileSource {
    type Reader = Unblock<File>;

    fn open_read_stream(&self, start: u64) -> io::Result<Self::Reader> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(start))?;
        Ok(Unblock::new(file))
    }
}

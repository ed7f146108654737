use std::io::ErrorKind;

use futures::{AsyncRead, AsyncReadExt, Stream};

use super::errors::tag_iterator::TagIteratorError;
use super::tag_decoder::TagDecoder;
use super::tag_iterator::DEFAULT_BUFFER_LEN;
use super::tags::Tag;

///
/// The asynchronous counterpart of [`TagIterator`][`super::TagIterator`].
///
/// This can be transformed into a [`Stream`] using [`into_stream`][TagIteratorAsync::into_stream], or consumed directly by calling [`.next().await`] in a loop.
///
/// The struct can be created with the [`new()`][TagIteratorAsync::new] function on any source that implements the [`futures::AsyncRead`] trait.  It only suspends while waiting on the source, and dropping it (or the stream) at any point abandons the read.
///
pub struct TagIteratorAsync<R: AsyncRead + Unpin> {
    source: R,
    decoder: TagDecoder,
    read_buffer: Box<[u8]>,
    reached_eof: bool,
    failed: bool,
}

impl<R: AsyncRead + Unpin> TagIteratorAsync<R> {

    pub fn new(source: R, tag_ids_to_buffer: &[u64]) -> Self {
        TagIteratorAsync::with_capacity(source, tag_ids_to_buffer, DEFAULT_BUFFER_LEN)
    }

    pub fn with_capacity(source: R, tag_ids_to_buffer: &[u64], capacity: usize) -> Self {
        TagIteratorAsync::build(source, TagDecoder::new(tag_ids_to_buffer), capacity)
    }

    ///
    /// Returns a new iterator for a source that has already been positioned at `offset` bytes into a resource.
    ///
    pub fn starting_at(source: R, tag_ids_to_buffer: &[u64], offset: u64, capacity: usize) -> Self {
        TagIteratorAsync::build(source, TagDecoder::with_offset(tag_ids_to_buffer, offset), capacity)
    }

    fn build(source: R, decoder: TagDecoder, capacity: usize) -> Self {
        TagIteratorAsync {
            source,
            decoder,
            read_buffer: vec![0; capacity.max(1)].into_boxed_slice(),
            reached_eof: false,
            failed: false,
        }
    }

    pub fn current_offset(&self) -> u64 {
        self.decoder.current_offset()
    }

    async fn read_next(&mut self) -> Result<Option<Tag>, TagIteratorError> {
        loop {
            if let Some(tag) = self.decoder.next_tag()? {
                return Ok(Some(tag));
            }

            if self.reached_eof {
                return Ok(None);
            }

            match self.source.read(&mut self.read_buffer).await {
                Ok(0) => self.reached_eof = true,
                Ok(len) => self.decoder.feed(&self.read_buffer[..len]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {},
                Err(source) => return Err(TagIteratorError::ReadError { source }),
            }
        }
    }

    pub async fn next(&mut self) -> Option<Result<Tag, TagIteratorError>> {
        if self.failed {
            return None;
        }

        let result = self.read_next().await;
        if result.is_err() {
            self.failed = true;
        }
        result.transpose()
    }

    pub fn into_stream(self) -> impl Stream<Item=Result<Tag, TagIteratorError>> {
        futures::stream::unfold(self, |mut read| async move {
            let next = read.next().await;
            next.map(move |it| (it, read))
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use futures::io::Cursor;
    use futures::StreamExt;

    use super::*;
    use crate::specs::ids;
    use crate::TagIterator;

    const SAMPLE: [u8; 20] = [
        0x15, 0x49, 0xa9, 0x66, 0x8f,
        0x2a, 0xd7, 0xb1, 0x83, 0x0f, 0x42, 0x40,
        0x7b, 0xa9, 0x85, b'h', b'e', b'l', b'l', b'o',
    ];

    #[test]
    fn matches_blocking_iterator() {
        let blocking: Vec<Tag> = TagIterator::new(std::io::Cursor::new(&SAMPLE[..]), &[]).collect::<Result<_, _>>().unwrap();
        let streamed: Vec<Tag> = block_on(async {
            TagIteratorAsync::with_capacity(Cursor::new(&SAMPLE[..]), &[], 3)
                .into_stream()
                .map(|tag| tag.unwrap())
                .collect()
                .await
        });
        assert_eq!(blocking, streamed);
    }

    #[test]
    fn next_returns_none_at_end() {
        block_on(async {
            let mut iter = TagIteratorAsync::new(Cursor::new(&SAMPLE[..]), &[ids::Info]);
            let info = iter.next().await.unwrap().unwrap();
            assert_eq!(2, info.children().unwrap().len());
            assert!(iter.next().await.is_none());
            assert_eq!(20, iter.current_offset());
        });
    }
}

pub mod tool {
    use std::string::FromUtf8Error;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum ToolError {
        #[error("Unrepresentable Vint size encountered.")]
        ReadVintOverflow,
        #[error("Value too large to be written as a vint: {0}")]
        WriteVintOverflow(u64),
        #[error("Could not read unsigned int from array: {0:?}")]
        ReadU64Overflow(Vec<u8>),
        #[error("Could not read int from array: {0:?}")]
        ReadI64Overflow(Vec<u8>),
        #[error("Could not read float from array: {0:?}")]
        ReadF64Mismatch(Vec<u8>),
        #[error("Could not read date from array: {0:?}")]
        ReadDateMismatch(Vec<u8>),
        #[error("Could not read block header from array: {0:?}")]
        ReadBlockHeader(Vec<u8>),
        #[error("Could not read utf8 data: {0:?}")]
        FromUtf8Error(Vec<u8>, #[source] FromUtf8Error),
    }
}

pub mod tag_iterator {
    use super::tool::ToolError;
    use std::io;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TagIteratorError {
        ///
        /// The stream is structurally broken at `position` (an unrepresentable vint, a child overrunning its parent, or
        /// an unknown size on an element that has to be buffered).
        ///
        #[error("Encountered corrupted data at position {position}.  Message: {message}")]
        CorruptedData {
            position: u64,
            message: String,
        },

        ///
        /// The element header was fine, but its content couldn't be decoded as the type the registry defines for it.
        ///
        #[error("Tag id 0x{tag_id:X} at position {position} does not match its data type. {problem}")]
        CorruptedTagData {
            tag_id: u64,
            position: u64,
            #[source]
            problem: ToolError,
        },

        #[error("Error reading from source.")]
        ReadError {
            #[from]
            source: io::Error,
        },
    }
}

pub mod tag_writer {
    use super::tool::ToolError;
    use std::io;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TagWriterError {
        #[error("Problem writing data tag. {0}")]
        TagSizeError(#[from] ToolError),

        #[error("Unexpected closing tag '0x{tag_id:X}'{}", expected_suffix(.expected_id))]
        UnexpectedClosingTag {
            tag_id: u64,
            expected_id: Option<u64>,
        },

        #[error("Tag '0x{0:X}' has no content to write.")]
        MissingContent(u64),

        #[error("Error writing to destination.")]
        WriteError {
            #[from]
            source: io::Error,
        },
    }

    fn expected_suffix(expected_id: &Option<u64>) -> String {
        match expected_id {
            Some(expected) => format!(". Expected '0x{:X}'", expected),
            None => String::new(),
        }
    }
}

pub mod metadata {
    use super::tag_iterator::TagIteratorError;
    use std::io;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum MetadataError {
        #[error("Segment must be read before SeekHead")]
        SegmentNotRead,

        #[error("SeekHead must be read before seeked tags")]
        SeekHeadNotRead,

        #[error("Couldn't find a Segment in the source")]
        SegmentNotFound,

        #[error("Couldn't find a SeekHead after segment start {segment_start}")]
        SeekHeadNotFound {
            segment_start: u64,
        },

        #[error("SeekHead at position {offset} was already resolved; refusing to follow a cyclic SeekHead reference")]
        SeekHeadCycle {
            offset: u64,
        },

        #[error("Seek table points '{name}' at position {offset}, but the element wasn't found there")]
        ElementNotFound {
            name: String,
            offset: u64,
        },

        #[error("Seek table position {position} for '{name}' lies past the addressable range")]
        SeekPositionOutOfRange {
            name: String,
            position: u64,
        },

        #[error("Couldn't decode source data.")]
        Decode(#[from] TagIteratorError),

        #[error("Couldn't open a read at position {offset}.")]
        Io {
            offset: u64,
            #[source]
            source: io::Error,
        },
    }
}

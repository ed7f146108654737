use super::{ElementDef, TagDataType};

macro_rules! matroska_registry {
    ($($name:ident : $data_type:ident = $id:literal),* $(,)?) => {
        ///
        /// Ids of every element in the registry, named as in the Matroska specification.
        ///
        #[allow(non_upper_case_globals)]
        pub mod ids {
            $(pub const $name: u64 = $id;)*
        }

        pub(crate) static REGISTRY: &[ElementDef] = &[
            $(ElementDef { id: $id, name: stringify!($name), data_type: TagDataType::$data_type },)*
        ];
    };
}

matroska_registry! {
    // EBML header
    EBML                        : Master      = 0x1A45DFA3,
    EBMLVersion                 : UnsignedInt = 0x4286,
    EBMLReadVersion             : UnsignedInt = 0x42F7,
    EBMLMaxIDLength             : UnsignedInt = 0x42F2,
    EBMLMaxSizeLength           : UnsignedInt = 0x42F3,
    DocType                     : String      = 0x4282,
    DocTypeVersion              : UnsignedInt = 0x4287,
    DocTypeReadVersion          : UnsignedInt = 0x4285,

    // Global elements
    Void                        : Binary      = 0xEC,
    CRC32                       : Binary      = 0xBF,
    SignatureSlot               : Master      = 0x1B538667,
    SignatureAlgo               : UnsignedInt = 0x7E8A,
    SignatureHash               : UnsignedInt = 0x7E9A,
    SignaturePublicKey          : Binary      = 0x7EA5,
    Signature                   : Binary      = 0x7EB5,
    SignatureElements           : Master      = 0x7E5B,
    SignatureElementList        : Master      = 0x7E7B,
    SignedElement               : Binary      = 0x6532,

    Segment                     : Master      = 0x18538067,

    // Meta seek
    SeekHead                    : Master      = 0x114D9B74,
    Seek                        : Master      = 0x4DBB,
    SeekID                      : Binary      = 0x53AB,
    SeekPosition                : UnsignedInt = 0x53AC,

    // Segment information
    Info                        : Master      = 0x1549A966,
    SegmentUID                  : Binary      = 0x73A4,
    SegmentFilename             : Utf8        = 0x7384,
    PrevUID                     : Binary      = 0x3CB923,
    PrevFilename                : Utf8        = 0x3C83AB,
    NextUID                     : Binary      = 0x3EB923,
    NextFilename                : Utf8        = 0x3E83BB,
    SegmentFamily               : Binary      = 0x4444,
    ChapterTranslate            : Master      = 0x6924,
    ChapterTranslateEditionUID  : UnsignedInt = 0x69FC,
    ChapterTranslateCodec       : UnsignedInt = 0x69BF,
    ChapterTranslateID          : Binary      = 0x69A5,
    TimecodeScale               : UnsignedInt = 0x2AD7B1,
    TimecodeScaleDenominator    : UnsignedInt = 0x2AD7B2,
    Duration                    : Float       = 0x4489,
    DateUTC                     : Date        = 0x4461,
    Title                       : Utf8        = 0x7BA9,
    MuxingApp                   : Utf8        = 0x4D80,
    WritingApp                  : Utf8        = 0x5741,

    // Cluster
    Cluster                     : Master      = 0x1F43B675,
    Timecode                    : UnsignedInt = 0xE7,
    SilentTracks                : Master      = 0x5854,
    SilentTrackNumber           : UnsignedInt = 0x58D7,
    Position                    : UnsignedInt = 0xA7,
    PrevSize                    : UnsignedInt = 0xAB,
    SimpleBlock                 : Binary      = 0xA3,
    BlockGroup                  : Master      = 0xA0,
    Block                       : Binary      = 0xA1,
    BlockVirtual                : Binary      = 0xA2,
    BlockAdditions              : Master      = 0x75A1,
    BlockMore                   : Master      = 0xA6,
    BlockAddID                  : UnsignedInt = 0xEE,
    BlockAdditional             : Binary      = 0xA5,
    BlockDuration               : UnsignedInt = 0x9B,
    ReferencePriority           : UnsignedInt = 0xFA,
    ReferenceBlock              : Integer     = 0xFB,
    ReferenceVirtual            : Integer     = 0xFD,
    CodecState                  : Binary      = 0xA4,
    DiscardPadding              : Integer     = 0x75A2,
    Slices                      : Master      = 0x8E,
    TimeSlice                   : Master      = 0xE8,
    LaceNumber                  : UnsignedInt = 0xCC,
    FrameNumber                 : UnsignedInt = 0xCD,
    BlockAdditionID             : UnsignedInt = 0xCB,
    Delay                       : UnsignedInt = 0xCE,
    SliceDuration               : UnsignedInt = 0xCF,
    ReferenceFrame              : Master      = 0xC8,
    ReferenceOffset             : UnsignedInt = 0xC9,
    ReferenceTimeCode           : UnsignedInt = 0xCA,
    EncryptedBlock              : Binary      = 0xAF,

    // Tracks
    Tracks                      : Master      = 0x1654AE6B,
    TrackEntry                  : Master      = 0xAE,
    TrackNumber                 : UnsignedInt = 0xD7,
    TrackUID                    : UnsignedInt = 0x73C5,
    TrackType                   : UnsignedInt = 0x83,
    FlagEnabled                 : UnsignedInt = 0xB9,
    FlagDefault                 : UnsignedInt = 0x88,
    FlagForced                  : UnsignedInt = 0x55AA,
    FlagLacing                  : UnsignedInt = 0x9C,
    MinCache                    : UnsignedInt = 0x6DE7,
    MaxCache                    : UnsignedInt = 0x6DF8,
    DefaultDuration             : UnsignedInt = 0x23E383,
    DefaultDecodedFieldDuration : UnsignedInt = 0x234E7A,
    TrackTimecodeScale          : Float       = 0x23314F,
    TrackOffset                 : Integer     = 0x537F,
    MaxBlockAdditionID          : UnsignedInt = 0x55EE,
    Name                        : Utf8        = 0x536E,
    Language                    : String      = 0x22B59C,
    CodecID                     : String      = 0x86,
    CodecPrivate                : Binary      = 0x63A2,
    CodecName                   : Utf8        = 0x258688,
    AttachmentLink              : UnsignedInt = 0x7446,
    CodecSettings               : Utf8        = 0x3A9697,
    CodecInfoURL                : String      = 0x3B4040,
    CodecDownloadURL            : String      = 0x26B240,
    CodecDecodeAll              : UnsignedInt = 0xAA,
    TrackOverlay                : UnsignedInt = 0x6FAB,
    CodecDelay                  : UnsignedInt = 0x56AA,
    SeekPreRoll                 : UnsignedInt = 0x56BB,
    TrackTranslate              : Master      = 0x6624,
    TrackTranslateEditionUID    : UnsignedInt = 0x66FC,
    TrackTranslateCodec         : UnsignedInt = 0x66BF,
    TrackTranslateTrackID       : Binary      = 0x66A5,

    Video                       : Master      = 0xE0,
    FlagInterlaced              : UnsignedInt = 0x9A,
    StereoMode                  : UnsignedInt = 0x53B8,
    AlphaMode                   : UnsignedInt = 0x53C0,
    OldStereoMode               : UnsignedInt = 0x53B9,
    PixelWidth                  : UnsignedInt = 0xB0,
    PixelHeight                 : UnsignedInt = 0xBA,
    PixelCropBottom             : UnsignedInt = 0x54AA,
    PixelCropTop                : UnsignedInt = 0x54BB,
    PixelCropLeft               : UnsignedInt = 0x54CC,
    PixelCropRight              : UnsignedInt = 0x54DD,
    DisplayWidth                : UnsignedInt = 0x54B0,
    DisplayHeight               : UnsignedInt = 0x54BA,
    DisplayUnit                 : UnsignedInt = 0x54B2,
    AspectRatioType             : UnsignedInt = 0x54B3,
    ColourSpace                 : Binary      = 0x2EB524,
    GammaValue                  : Float       = 0x2FB523,
    FrameRate                   : Float       = 0x2383E3,

    Audio                       : Master      = 0xE1,
    SamplingFrequency           : Float       = 0xB5,
    OutputSamplingFrequency     : Float       = 0x78B5,
    Channels                    : UnsignedInt = 0x9F,
    ChannelPositions            : Binary      = 0x7D7B,
    BitDepth                    : UnsignedInt = 0x6264,

    TrackOperation              : Master      = 0xE2,
    TrackCombinePlanes          : Master      = 0xE3,
    TrackPlane                  : Master      = 0xE4,
    TrackPlaneUID               : UnsignedInt = 0xE5,
    TrackPlaneType              : UnsignedInt = 0xE6,
    TrackJoinBlocks             : Master      = 0xE9,
    TrackJoinUID                : UnsignedInt = 0xED,

    TrickTrackUID               : UnsignedInt = 0xC0,
    TrickTrackSegmentUID        : Binary      = 0xC1,
    TrickTrackFlag              : UnsignedInt = 0xC6,
    TrickMasterTrackUID         : UnsignedInt = 0xC7,
    TrickMasterTrackSegmentUID  : Binary      = 0xC4,

    ContentEncodings            : Master      = 0x6D80,
    ContentEncoding             : Master      = 0x6240,
    ContentEncodingOrder        : UnsignedInt = 0x5031,
    ContentEncodingScope        : UnsignedInt = 0x5032,
    ContentEncodingType         : UnsignedInt = 0x5033,
    ContentCompression          : Master      = 0x5034,
    ContentCompAlgo             : UnsignedInt = 0x4254,
    ContentCompSettings         : Binary      = 0x4255,
    ContentEncryption           : Master      = 0x5035,
    ContentEncAlgo              : UnsignedInt = 0x47E1,
    ContentEncKeyID             : Binary      = 0x47E2,
    ContentEncAESSettings       : Master      = 0x47E7,
    AESSettingsCipherMode       : UnsignedInt = 0x47E8,
    ContentSignature            : Binary      = 0x47E3,
    ContentSigKeyID             : Binary      = 0x47E4,
    ContentSigAlgo              : UnsignedInt = 0x47E5,
    ContentSigHashAlgo          : UnsignedInt = 0x47E6,

    // Cueing data
    Cues                        : Master      = 0x1C53BB6B,
    CuePoint                    : Master      = 0xBB,
    CueTime                     : UnsignedInt = 0xB3,
    CueTrackPositions           : Master      = 0xB7,
    CueTrack                    : UnsignedInt = 0xF7,
    CueClusterPosition          : UnsignedInt = 0xF1,
    CueRelativePosition         : UnsignedInt = 0xF0,
    CueDuration                 : UnsignedInt = 0xB2,
    CueBlockNumber              : UnsignedInt = 0x5378,
    CueCodecState               : UnsignedInt = 0xEA,
    CueReference                : Master      = 0xDB,
    CueRefTime                  : UnsignedInt = 0x96,
    CueRefCluster               : UnsignedInt = 0x97,
    CueRefNumber                : UnsignedInt = 0x535F,
    CueRefCodecState            : UnsignedInt = 0xEB,

    // Attachments
    Attachments                 : Master      = 0x1941A469,
    AttachedFile                : Master      = 0x61A7,
    FileDescription             : Utf8        = 0x467E,
    FileName                    : Utf8        = 0x466E,
    FileMimeType                : String      = 0x4660,
    FileData                    : Binary      = 0x465C,
    FileUID                     : UnsignedInt = 0x46AE,
    FileReferral                : Binary      = 0x4675,
    FileUsedStartTime           : UnsignedInt = 0x4661,
    FileUsedEndTime             : UnsignedInt = 0x4662,

    // Chapters
    Chapters                    : Master      = 0x1043A770,
    EditionEntry                : Master      = 0x45B9,
    EditionUID                  : UnsignedInt = 0x45BC,
    EditionFlagHidden           : UnsignedInt = 0x45BD,
    EditionFlagDefault          : UnsignedInt = 0x45DB,
    EditionFlagOrdered          : UnsignedInt = 0x45DD,
    ChapterAtom                 : Master      = 0xB6,
    ChapterUID                  : UnsignedInt = 0x73C4,
    ChapterStringUID            : Utf8        = 0x5654,
    ChapterTimeStart            : UnsignedInt = 0x91,
    ChapterTimeEnd              : UnsignedInt = 0x92,
    ChapterFlagHidden           : UnsignedInt = 0x98,
    ChapterFlagEnabled          : UnsignedInt = 0x4598,
    ChapterSegmentUID           : Binary      = 0x6E67,
    ChapterSegmentEditionUID    : UnsignedInt = 0x6EBC,
    ChapterPhysicalEquiv        : UnsignedInt = 0x63C3,
    ChapterTrack                : Master      = 0x8F,
    ChapterTrackNumber          : UnsignedInt = 0x89,
    ChapterDisplay              : Master      = 0x80,
    ChapString                  : Utf8        = 0x85,
    ChapLanguage                : String      = 0x437C,
    ChapCountry                 : String      = 0x437E,
    ChapProcess                 : Master      = 0x6944,
    ChapProcessCodecID          : UnsignedInt = 0x6955,
    ChapProcessPrivate          : Binary      = 0x450D,
    ChapProcessCommand          : Master      = 0x6911,
    ChapProcessTime             : UnsignedInt = 0x6922,
    ChapProcessData             : Binary      = 0x6933,

    // Tagging
    Tags                        : Master      = 0x1254C367,
    Tag                         : Master      = 0x7373,
    Targets                     : Master      = 0x63C0,
    TargetTypeValue             : UnsignedInt = 0x68CA,
    TargetType                  : String      = 0x63CA,
    TagTrackUID                 : UnsignedInt = 0x63C5,
    TagEditionUID               : UnsignedInt = 0x63C9,
    TagChapterUID               : UnsignedInt = 0x63C4,
    TagAttachmentUID            : UnsignedInt = 0x63C6,
    SimpleTag                   : Master      = 0x67C8,
    TagName                     : Utf8        = 0x45A3,
    TagLanguage                 : String      = 0x447A,
    TagDefault                  : UnsignedInt = 0x4484,
    TagString                   : Utf8        = 0x4487,
    TagBinary                   : Binary      = 0x4485,
}

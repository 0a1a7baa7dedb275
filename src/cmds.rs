//! Command table of the GLK module.
//!
//! Every command the host can issue is a variant of [`Command`]. Most map to a single
//! opcode byte; the filesystem wipe and the lock level commands use a fixed three byte
//! guard sequence so that line noise cannot trigger them.

/// Byte that prefixes every command frame in serial mode.
pub const GLK_CMD_INIT: u8 = 0xFE;

/// Line feed, accepted inside plain text output.
pub const GLK_LINE_FEED: u8 = 0x0A;

/// Sent by the module, with flow control on, when its input buffer is almost full.
pub const GLK_FLOW_CONTROL_ALMOST_FULL: u8 = 0xFE;

/// Sent by the module, with flow control on, when its input buffer is almost empty.
pub const GLK_FLOW_CONTROL_ALMOST_EMPTY: u8 = 0xFF;

/// A command understood by the module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // Communication
    /// Enables flow control. The module then sends `GLK_FLOW_CONTROL_ALMOST_FULL` and
    /// `GLK_FLOW_CONTROL_ALMOST_EMPTY` unprompted, so they can show up between replies.
    FlowControlOn,
    FlowControlOff,
    I2cSlaveAddress,
    BaudRate,
    NonStandardBaudRate,

    // Fonts
    UploadFont,
    UseFont,
    FontMetrics,
    BoxSpaceMode,

    // Text
    CursorHome,
    CursorPosition,
    CursorCoordinate,
    AutoScrollOn,
    AutoScrollOff,

    // Bitmaps
    UploadBitmap,
    DrawMemoryBitmap,
    DrawBitmap,

    // Bar graphs and drawing
    DrawingColor,
    DrawPixel,
    DrawLine,
    ContinueLine,
    DrawRectangle,
    DrawSolidRectangle,
    InitializeBarGraph,
    DrawBarGraph,
    InitializeStripChart,
    ShiftStripChart,

    // GPO
    GpoOff,
    GpoOn,
    StartupGpoState,

    // Keypad
    AutoTransmitKeyOn,
    AutoTransmitKeyOff,
    PollKey,
    ClearKeyBuffer,
    DebounceTime,
    AutoRepeatMode,
    AutoRepeatOff,
    CustomKeypadCodes,

    // Display
    ClearScreen,
    DisplayOn,
    DisplayOff,
    Brightness,
    DefaultBrightness,
    Contrast,
    DefaultContrast,

    // Filesystem
    WipeFilesystem,
    DeleteFile,
    FreeSpace,
    Directory,
    UploadFilesystem,
    DownloadFile,
    MoveFile,
    DumpFilesystem,

    // Security
    Remember,
    LockLevel,
    DefaultLockLevel,
    WriteCustomerData,
    ReadCustomerData,

    // Misc
    VersionNumber,
    ModuleType,
}

/// How the module answers a command, as far as the reply decoder is concerned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReplyShape {
    /// The command has no reply.
    None,
    /// Exactly this many bytes follow.
    Fixed(usize),
    /// A 4 byte little-endian length, then that many bytes.
    SizePrefixed,
    /// A 1 byte entry count, then that many 4 byte entries.
    Directory,
    /// One byte per buffered key; bit 7 set means another byte follows.
    KeyBuffer,
}

/// Size of the free space reply.
pub const GLK_FREE_SPACE_REPLY_SIZE: usize = 4;

/// Size of the customer data area, for both read and write.
pub const GLK_CUSTOMER_DATA_SIZE: usize = 16;

/// Size of one directory entry.
pub const GLK_DIRECTORY_ENTRY_SIZE: usize = 4;

/// Size of the length field in front of file and filesystem dumps.
pub const GLK_FILE_SIZE_FIELD_SIZE: usize = 4;

impl Command {
    /// Opcode bytes sent after the INIT byte.
    pub fn opcode(self) -> &'static [u8] {
        use Command::*;
        match self {
            FlowControlOn => &[0x3A],
            FlowControlOff => &[0x3B],
            I2cSlaveAddress => &[0x33],
            BaudRate => &[0x39],
            NonStandardBaudRate => &[0xA4],

            UploadFont => &[0x24],
            UseFont => &[0x31],
            FontMetrics => &[0x32],
            BoxSpaceMode => &[0xAC],

            CursorHome => &[0x48],
            CursorPosition => &[0x47],
            CursorCoordinate => &[0x79],
            AutoScrollOn => &[0x51],
            AutoScrollOff => &[0x52],

            UploadBitmap => &[0x5E],
            DrawMemoryBitmap => &[0x62],
            DrawBitmap => &[0x64],

            DrawingColor => &[0x63],
            DrawPixel => &[0x70],
            DrawLine => &[0x6C],
            ContinueLine => &[0x65],
            DrawRectangle => &[0x72],
            DrawSolidRectangle => &[0x78],
            InitializeBarGraph => &[0x67],
            DrawBarGraph => &[0x69],
            InitializeStripChart => &[0x6A],
            ShiftStripChart => &[0x6B],

            GpoOff => &[0x56],
            GpoOn => &[0x57],
            StartupGpoState => &[0xC3],

            AutoTransmitKeyOn => &[0x41],
            AutoTransmitKeyOff => &[0x4F],
            PollKey => &[0x26],
            ClearKeyBuffer => &[0x45],
            DebounceTime => &[0x55],
            AutoRepeatMode => &[0x7E],
            AutoRepeatOff => &[0x60],
            CustomKeypadCodes => &[0xD5],

            ClearScreen => &[0x58],
            DisplayOn => &[0x42],
            DisplayOff => &[0x46],
            Brightness => &[0x99],
            DefaultBrightness => &[0x98],
            Contrast => &[0x50],
            DefaultContrast => &[0x91],

            WipeFilesystem => &[0x21, 0x59, 0x21],
            DeleteFile => &[0xAD],
            FreeSpace => &[0xAF],
            Directory => &[0xB3],
            UploadFilesystem => &[0xB0],
            DownloadFile => &[0xB2],
            MoveFile => &[0xB4],
            DumpFilesystem => &[0x30],

            Remember => &[0x93],
            LockLevel => &[0xCA, 0xF5, 0xA0],
            DefaultLockLevel => &[0xCB, 0xF5, 0xA0],
            WriteCustomerData => &[0x34],
            ReadCustomerData => &[0x35],

            VersionNumber => &[0x36],
            ModuleType => &[0x37],
        }
    }

    /// The reply the module sends back for this command.
    pub fn reply_shape(self) -> ReplyShape {
        match self {
            Command::VersionNumber | Command::ModuleType => ReplyShape::Fixed(1),
            Command::FreeSpace => ReplyShape::Fixed(GLK_FREE_SPACE_REPLY_SIZE),
            Command::ReadCustomerData => ReplyShape::Fixed(GLK_CUSTOMER_DATA_SIZE),
            Command::Directory => ReplyShape::Directory,
            Command::DownloadFile | Command::DumpFilesystem => ReplyShape::SizePrefixed,
            Command::PollKey => ReplyShape::KeyBuffer,
            _ => ReplyShape::None,
        }
    }
}

use crate::base::{Error, Result};
use std::fmt;

/// Framing used on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// RS-232 / USB serial. Every frame starts with the INIT byte.
    #[default]
    Serial,
    /// I2C: START, address (0x50 write / 0x51 read), payload, STOP. No INIT byte.
    I2c,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Serial => write!(f, "serial"),
            TransportMode::I2c => write!(f, "i2c"),
        }
    }
}

/// Pixel size of the attached panel, used to validate coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub width: u8,
    pub height: u8,
}

impl DisplayGeometry {
    /// Geometry of the GLK19264-7T-1U.
    pub const GLK19264: DisplayGeometry = DisplayGeometry {
        width: 192,
        height: 64,
    };

    /// Geometry of the GLK24064 family.
    pub const GLK24064: DisplayGeometry = DisplayGeometry {
        width: 240,
        height: 64,
    };

    /// Geometry of the GLK12232 family.
    pub const GLK12232: DisplayGeometry = DisplayGeometry {
        width: 122,
        height: 32,
    };

    /// Largest legal x coordinate.
    #[inline]
    pub fn max_x(&self) -> u8 {
        self.width.saturating_sub(1)
    }

    /// Largest legal y coordinate.
    #[inline]
    pub fn max_y(&self) -> u8 {
        self.height.saturating_sub(1)
    }
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        DisplayGeometry::GLK19264
    }
}

/// One of the eight standard baud rates the module can be switched to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BaudRate {
    B9600,
    B14400,
    B19200,
    B28800,
    B38400,
    B57600,
    B76800,
    B115200,
}

impl BaudRate {
    const ALL: [BaudRate; 8] = [
        BaudRate::B9600,
        BaudRate::B14400,
        BaudRate::B19200,
        BaudRate::B28800,
        BaudRate::B38400,
        BaudRate::B57600,
        BaudRate::B76800,
        BaudRate::B115200,
    ];

    /// Wire code sent with the baud rate command.
    pub fn code(self) -> u8 {
        match self {
            BaudRate::B9600 => 0xCF,
            BaudRate::B14400 => 0x8A,
            BaudRate::B19200 => 0x67,
            BaudRate::B28800 => 0x44,
            BaudRate::B38400 => 0x33,
            BaudRate::B57600 => 0x22,
            BaudRate::B76800 => 0x19,
            BaudRate::B115200 => 0x10,
        }
    }

    /// Bits per second.
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::B9600 => 9600,
            BaudRate::B14400 => 14400,
            BaudRate::B19200 => 19200,
            BaudRate::B28800 => 28800,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B76800 => 76800,
            BaudRate::B115200 => 115200,
        }
    }

    /// Looks up a standard rate by its wire code.
    pub fn from_code(code: u8) -> Result<BaudRate> {
        BaudRate::ALL
            .into_iter()
            .find(|rate| rate.code() == code)
            .ok_or_else(|| Error::InvalidParameter {
                name: "speed",
                description: format!("{:#04X} is not a standard baud rate code", code),
            })
    }

    /// Looks up a standard rate by its speed in bits per second.
    pub fn from_bps(bps: u32) -> Result<BaudRate> {
        BaudRate::ALL
            .into_iter()
            .find(|rate| rate.bps() == bps)
            .ok_or_else(|| Error::InvalidParameter {
                name: "speed",
                description: format!("{} is not a standard baud rate", bps),
            })
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        BaudRate::B19200
    }
}

/// Drawing colour. The module treats any non-zero value as black.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl From<u8> for Color {
    fn from(value: u8) -> Self {
        if value == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
}

/// Fill direction of a bar graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BarGraphDirection {
    VerticalFromBottom,
    HorizontalFromLeft,
    VerticalFromTop,
    HorizontalFromRight,
}

impl BarGraphDirection {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            BarGraphDirection::VerticalFromBottom => 0,
            BarGraphDirection::HorizontalFromLeft => 1,
            BarGraphDirection::VerticalFromTop => 2,
            BarGraphDirection::HorizontalFromRight => 3,
        }
    }
}

/// Direction a strip chart scrolls when shifted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StripChartDirection {
    Left,
    Right,
}

/// Placement of text rendered with the current font, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct FontMetrics {
    pub left_margin: u8,
    pub top_margin: u8,
    pub char_spacing: u8,
    pub line_spacing: u8,
    /// Y location of the last text row; text scrolls past it.
    pub scroll_row: u8,
}

impl FontMetrics {
    pub(crate) fn to_bytes(self) -> [u8; 5] {
        [
            self.left_margin,
            self.top_margin,
            self.char_spacing,
            self.line_spacing,
            self.scroll_row,
        ]
    }
}

/// Colour of one of the three tricolour LEDs wired to the GPO pairs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LedColor {
    Off,
    Red,
    /// Shown as yellow on some module revisions.
    Orange,
    Green,
}

impl LedColor {
    /// States of GPO (2n - 1) and GPO (2n) for LED n, `true` meaning on.
    pub fn gpo_states(self) -> (bool, bool) {
        match self {
            LedColor::Off => (true, true),
            LedColor::Red => (false, true),
            LedColor::Orange => (false, false),
            LedColor::Green => (true, false),
        }
    }
}

/// What a repeated key does while held down.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AutoRepeatMode {
    /// The key code is sent again and again.
    ResendKey,
    /// A key down code, then a key up code on release.
    KeyUpDown,
}

impl AutoRepeatMode {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            AutoRepeatMode::ResendKey => 0,
            AutoRepeatMode::KeyUpDown => 1,
        }
    }
}

/// Kind of file stored on the module.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileType {
    Font,
    Bitmap,
}

impl FileType {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            FileType::Font => 0,
            FileType::Bitmap => 1,
        }
    }
}

/// Lock bits protecting parts of the module against changes.
///
/// Bits 0 to 2 are reserved and must stay clear.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub struct LockLevel(u8);

impl LockLevel {
    pub const NONE: LockLevel = LockLevel(0);
    pub const COMMUNICATION_SPEED: LockLevel = LockLevel(1 << 3);
    pub const SETTINGS: LockLevel = LockLevel(1 << 4);
    pub const FILESYSTEM: LockLevel = LockLevel(1 << 5);
    pub const COMMAND: LockLevel = LockLevel(1 << 6);
    pub const DISPLAY: LockLevel = LockLevel(1 << 7);

    const RESERVED_MASK: u8 = 0b0000_0111;

    /// Builds a lock level from raw bits, rejecting reserved bits.
    pub fn from_bits(bits: u8) -> Result<LockLevel> {
        if bits & LockLevel::RESERVED_MASK != 0 {
            return Err(Error::InvalidParameter {
                name: "level",
                description: format!("{:#010b} sets reserved bits 0-2", bits),
            });
        }
        Ok(LockLevel(bits))
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, other: LockLevel) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for LockLevel {
    type Output = LockLevel;

    fn bitor(self, rhs: LockLevel) -> LockLevel {
        LockLevel(self.0 | rhs.0)
    }
}

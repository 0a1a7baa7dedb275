//! Replies sent back by the module and their decoders.
//!
//! Every decoder takes the complete reply as collected by the channel, prefix
//! included, and checks it against the length it announces.

use crate::base::{Error, Result};
use crate::cmds::{
    GLK_CUSTOMER_DATA_SIZE, GLK_DIRECTORY_ENTRY_SIZE, GLK_FILE_SIZE_FIELD_SIZE,
    GLK_FREE_SPACE_REPLY_SIZE,
};
use crate::types::FileType;
use byteorder::{ByteOrder, LittleEndian};
use log::{trace, warn};
use std::fmt;

/// Returned by a key poll when the buffer is empty.
pub const GLK_KEY_NONE: u8 = 0x00;

/// Key code bits of a polled key byte; bit 7 is the "more keys" flag.
pub const GLK_KEY_CODE_MASK: u8 = 0x7F;

/// Offset between a key press code and its release code.
pub const GLK_KEY_RELEASE_OFFSET: u8 = 0x20;

/// Directory entry flag of an unused slot.
pub const GLK_DIRECTORY_FLAG_UNUSED: u8 = 0x00;

/// Bit 7 of the directory id/type byte selects the file type.
const GLK_DIRECTORY_TYPE_BIT: u8 = 0x80;

fn ensure_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(Error::TruncatedReply {
            expected,
            received: data.len(),
        });
    }
    Ok(())
}

/// Decodes the free space reply: 4 bytes, LSB first.
pub fn parse_free_space(data: &[u8]) -> Result<u32> {
    ensure_len(data, GLK_FREE_SPACE_REPLY_SIZE)?;
    let free = LittleEndian::read_u32(&data[..GLK_FREE_SPACE_REPLY_SIZE]);
    trace!("Free space: {} bytes", free);
    Ok(free)
}

/// One slot of the filesystem directory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// `0x00` when the slot is unused.
    pub flag: u8,
    pub file_type: FileType,
    /// File id, 0 to 127.
    pub id: u8,
    /// File size in bytes.
    pub size: u16,
}

impl DirectoryEntry {
    fn parse(raw: &[u8]) -> DirectoryEntry {
        let id_type = raw[1];
        DirectoryEntry {
            flag: raw[0],
            file_type: if id_type & GLK_DIRECTORY_TYPE_BIT == 0 {
                FileType::Font
            } else {
                FileType::Bitmap
            },
            id: id_type & !GLK_DIRECTORY_TYPE_BIT,
            size: LittleEndian::read_u16(&raw[2..4]),
        }
    }

    #[inline]
    pub fn in_use(&self) -> bool {
        self.flag != GLK_DIRECTORY_FLAG_UNUSED
    }
}

/// Decodes the directory reply: an entry count, then 4 bytes per entry.
pub fn parse_directory(data: &[u8]) -> Result<Vec<DirectoryEntry>> {
    ensure_len(data, 1)?;
    let count = data[0] as usize;
    let body = &data[1..];
    let expected = count * GLK_DIRECTORY_ENTRY_SIZE;
    if body.len() < expected {
        return Err(Error::TruncatedReply {
            expected,
            received: body.len(),
        });
    }
    let entries: Vec<DirectoryEntry> = body[..expected]
        .chunks_exact(GLK_DIRECTORY_ENTRY_SIZE)
        .map(DirectoryEntry::parse)
        .collect();
    trace!("Directory lists {} entries", entries.len());
    Ok(entries)
}

/// Decodes a file download or filesystem dump: a 4 byte size, LSB first, then the data.
pub fn parse_file(data: &[u8]) -> Result<Vec<u8>> {
    ensure_len(data, GLK_FILE_SIZE_FIELD_SIZE)?;
    let size = LittleEndian::read_u32(&data[..GLK_FILE_SIZE_FIELD_SIZE]) as usize;
    let body = &data[GLK_FILE_SIZE_FIELD_SIZE..];
    if body.len() < size {
        return Err(Error::TruncatedReply {
            expected: size,
            received: body.len(),
        });
    }
    Ok(body[..size].to_vec())
}

/// Decodes the 16 byte customer data area.
pub fn parse_customer_data(data: &[u8]) -> Result<[u8; GLK_CUSTOMER_DATA_SIZE]> {
    ensure_len(data, GLK_CUSTOMER_DATA_SIZE)?;
    let mut out = [0u8; GLK_CUSTOMER_DATA_SIZE];
    out.copy_from_slice(&data[..GLK_CUSTOMER_DATA_SIZE]);
    Ok(out)
}

/// Firmware version, one nibble each for major and minor: `0x57` is 5.7.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FirmwareVersion(pub u8);

impl FirmwareVersion {
    #[inline]
    pub fn major(self) -> u8 {
        self.0 >> 4
    }

    #[inline]
    pub fn minor(self) -> u8 {
        self.0 & 0x0F
    }

    /// The raw reply byte.
    #[inline]
    pub fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

/// Decodes the version reply.
pub fn parse_version(data: &[u8]) -> Result<FirmwareVersion> {
    ensure_len(data, 1)?;
    Ok(FirmwareVersion(data[0]))
}

macro_rules! module_types {
    ($($variant:ident = $code:literal, $name:literal;)*) => {
        /// Model reported by the module type query.
        #[allow(non_camel_case_types)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum ModuleType {
            $($variant,)*
            /// A code missing from the model table.
            Unknown(u8),
        }

        impl ModuleType {
            /// Looks up a module type reply code.
            pub fn from_code(code: u8) -> ModuleType {
                match code {
                    $($code => ModuleType::$variant,)*
                    other => ModuleType::Unknown(other),
                }
            }

            /// The reply code of this model.
            pub fn code(self) -> u8 {
                match self {
                    $(ModuleType::$variant => $code,)*
                    ModuleType::Unknown(code) => code,
                }
            }

            /// Marketing name, e.g. `GLK19264-7T-1U`.
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(ModuleType::$variant => Some($name),)*
                    ModuleType::Unknown(_) => None,
                }
            }
        }
    };
}

module_types! {
    Lcd0821 = 0x01, "LCD0821";
    Lcd2021 = 0x02, "LCD2021";
    Lcd2041 = 0x05, "LCD2041";
    Lcd4021 = 0x06, "LCD4021";
    Lcd4041 = 0x07, "LCD4041";
    Lk202_25 = 0x08, "LK202-25";
    Lk204_25 = 0x09, "LK204-25";
    Lk404_55 = 0x0A, "LK404-55";
    Vfd2021 = 0x0B, "VFD2021";
    Vfd2041 = 0x0C, "VFD2041";
    Vfd4021 = 0x0D, "VFD4021";
    Vk202_25 = 0x0E, "VK202-25";
    Vk204_25 = 0x0F, "VK204-25";
    Glc12232 = 0x10, "GLC12232";
    Glc24064 = 0x13, "GLC24064";
    Glk24064_25 = 0x15, "GLK24064-25";
    Glk12232_25 = 0x22, "GLK12232-25";
    Glk12232_25_Sm = 0x24, "GLK12232-25-SM";
    Glk24064_16_1U_Usb = 0x25, "GLK24064-16-1U-USB";
    Glk24064_16_1U = 0x26, "GLK24064-16-1U";
    Glk19264_7T_1U_Usb = 0x27, "GLK19264-7T-1U-USB";
    Glk12236_16 = 0x28, "GLK12236-16";
    Glk12232_16_Sm = 0x29, "GLK12232-16-SM";
    Glk19264_7T_1U = 0x2A, "GLK19264-7T-1U";
    Lk204_7T_1U = 0x2B, "LK204-7T-1U";
    Lk204_7T_1U_Usb = 0x2C, "LK204-7T-1U-USB";
    Lk404_At = 0x31, "LK404-AT";
    MosAv162A = 0x32, "MOS-AV-162A";
    Lk402_12 = 0x33, "LK402-12";
    Lk162_12 = 0x34, "LK162-12";
    Lk204_25Pc = 0x35, "LK204-25PC";
    Lk202_24_Usb = 0x36, "LK202-24-USB";
    Vk202_24_Usb = 0x37, "VK202-24-USB";
    Lk204_24_Usb = 0x38, "LK204-24-USB";
    Vk204_24_Usb = 0x39, "VK204-24-USB";
    Pk162_12 = 0x3A, "PK162-12";
    Vk162_12 = 0x3B, "VK162-12";
    MosAp162A = 0x3C, "MOS-AP-162A";
    Pk202_25 = 0x3D, "PK202-25";
    MosAl162A = 0x3E, "MOS-AL-162A";
    MosAl202A = 0x3F, "MOS-AL-202A";
    MosAv202A = 0x40, "MOS-AV-202A";
    MosAp202A = 0x41, "MOS-AP-202A";
    Pk202_24_Usb = 0x42, "PK202-24-USB";
    MosAl082 = 0x43, "MOS-AL-082";
    MosAl204 = 0x44, "MOS-AL-204";
    MosAv204 = 0x45, "MOS-AV-204";
    MosAl402 = 0x46, "MOS-AL-402";
    MosAv402 = 0x47, "MOS-AV-402";
    Lk082_12 = 0x48, "LK082-12";
    Vk402_12 = 0x49, "VK402-12";
    Vk404_55 = 0x4A, "VK404-55";
    Lk402_25 = 0x4B, "LK402-25";
    Vk402_25 = 0x4C, "VK402-25";
    Pk204_25 = 0x4D, "PK204-25";
    Mos = 0x4F, "MOS";
    Moi = 0x50, "MOI";
    XBoardS = 0x51, "XBoard-S";
    XBoardI = 0x52, "XBoard-I";
    Mou = 0x53, "MOU";
    XBoardU = 0x54, "XBoard-U";
    Lk202_25_Usb = 0x55, "LK202-25-USB";
    Vk202_25_Usb = 0x56, "VK202-25-USB";
    Lk204_25_Usb = 0x57, "LK204-25-USB";
    Vk204_25_Usb = 0x58, "VK204-25-USB";
    Lk162_12_Tc = 0x5B, "LK162-12-TC";
    Glk240128_25 = 0x72, "GLK240128-25";
    Lk404_25 = 0x73, "LK404-25";
    Vk404_25 = 0x74, "VK404-25";
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown module {:#04X}", self.code()),
        }
    }
}

/// Decodes the module type reply.
pub fn parse_module_type(data: &[u8]) -> Result<ModuleType> {
    ensure_len(data, 1)?;
    let module = ModuleType::from_code(data[0]);
    if let ModuleType::Unknown(code) = module {
        warn!("Module type {:#04X} is not in the model table", code);
    }
    Ok(module)
}

/// A button of the default keypad layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Top,
    Up,
    Right,
    Left,
    Center,
    Bottom,
    Down,
}

impl Key {
    /// Code sent when the key is pressed.
    pub fn press_code(self) -> u8 {
        match self {
            Key::Top => 0x41,
            Key::Up => 0x42,
            Key::Right => 0x43,
            Key::Left => 0x44,
            Key::Center => 0x45,
            Key::Bottom => 0x47,
            Key::Down => 0x48,
        }
    }

    /// Code sent when the key is released, in key up/down repeat mode.
    pub fn release_code(self) -> u8 {
        self.press_code() + GLK_KEY_RELEASE_OFFSET
    }
}

/// A key code read from the module's key buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key code with the "more keys" flag stripped.
    pub code: u8,
}

impl KeyEvent {
    const KEYS: [Key; 7] = [
        Key::Top,
        Key::Up,
        Key::Right,
        Key::Left,
        Key::Center,
        Key::Bottom,
        Key::Down,
    ];

    /// The default layout key this code stands for, if any.
    pub fn key(&self) -> Option<Key> {
        KeyEvent::KEYS
            .into_iter()
            .find(|k| k.press_code() == self.code || k.release_code() == self.code)
    }

    /// `true` for key up codes.
    pub fn is_release(&self) -> bool {
        KeyEvent::KEYS.iter().any(|k| k.release_code() == self.code)
    }
}

/// Decodes a key poll reply into key events, dropping "no key" bytes.
pub fn parse_keys(data: &[u8]) -> Vec<KeyEvent> {
    data.iter()
        .map(|b| b & GLK_KEY_CODE_MASK)
        .filter(|&code| code != GLK_KEY_NONE)
        .map(|code| KeyEvent { code })
        .collect()
}

use crate::base::{Error, Message, ProtocolDecoder, ProtocolEncoder, Result};
use crate::cmds::{
    Command, ReplyShape, GLK_CMD_INIT, GLK_DIRECTORY_ENTRY_SIZE, GLK_FILE_SIZE_FIELD_SIZE,
    GLK_LINE_FEED,
};
use crate::internals::{GLK_KEY_BUFFER_DEPTH, GLK_MAX_FILE_SIZE};
use crate::types::TransportMode;
use byteorder::{ByteOrder, LittleEndian};
use log::{error, trace, warn};
use std::cmp::min;

/// Bit 7 of a polled key byte: another key press is waiting in the buffer.
const GLK_KEY_MORE_FLAG: u8 = 0x80;

#[derive(Debug, Clone, PartialEq)]
enum DecodeStatus {
    /// No reply is expected; stray bytes are dropped.
    Idle,
    /// Collecting a reply whose total length is known.
    ReceiveFixed(usize),
    /// Collecting a length or count prefix of this many bytes.
    WaitPrefix(usize),
    /// Collecting the body announced by the prefix; holds the total reply length.
    ReceiveBody(usize),
    /// Collecting polled key bytes.
    ReceiveKeys,
}

/// The implementation of the GLK host communication protocol.
///
/// Encoding turns a `Message` into a serial frame: the INIT byte, the opcode bytes of
/// the command, then its parameters. Decoding is driven by the command the reply
/// belongs to (see `ProtocolDecoder::expect_reply`), because the module's replies carry
/// no header of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct GlkHostProtocol {
    mode: TransportMode,
    status: DecodeStatus,
    shape: ReplyShape,
    decoding_msg: Message,
}

impl GlkHostProtocol {
    /// Creates a new `GlkHostProtocol` in serial mode.
    pub fn new() -> GlkHostProtocol {
        GlkHostProtocol::with_mode(TransportMode::Serial)
    }

    /// Creates a new `GlkHostProtocol` using the given framing.
    pub fn with_mode(mode: TransportMode) -> GlkHostProtocol {
        trace!("Creating new GlkHostProtocol ({} mode)", mode);
        GlkHostProtocol {
            mode,
            status: DecodeStatus::Idle,
            shape: ReplyShape::None,
            decoding_msg: Message::new(Command::ClearScreen),
        }
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransportMode) {
        trace!("Switching transport mode {} -> {}", self.mode, mode);
        self.mode = mode;
    }

    fn ensure_serial(&self) -> Result<()> {
        match self.mode {
            TransportMode::Serial => Ok(()),
            // I2C framing needs START/STOP control of the bus, which a byte stream cannot express.
            TransportMode::I2c => {
                error!("Cannot frame command in {} mode", self.mode);
                Err(Error::UnsupportedInMode { mode: self.mode })
            }
        }
    }

    fn start_reply(&mut self, cmd: Command) {
        self.shape = cmd.reply_shape();
        self.decoding_msg = Message::new(cmd);
        self.status = match self.shape {
            ReplyShape::None => DecodeStatus::Idle,
            ReplyShape::Fixed(size) => DecodeStatus::ReceiveFixed(size),
            ReplyShape::SizePrefixed => DecodeStatus::WaitPrefix(GLK_FILE_SIZE_FIELD_SIZE),
            ReplyShape::Directory => DecodeStatus::WaitPrefix(1),
            ReplyShape::KeyBuffer => DecodeStatus::ReceiveKeys,
        };
        trace!(
            "Decoder state -> {:?} for {:?} ({:?})",
            self.status,
            cmd,
            self.shape
        );
    }

    /// Appends up to `total - len` bytes and reports how many were taken.
    fn fill_to(&mut self, total: usize, buf: &[u8]) -> usize {
        let wanted = total - self.decoding_msg.data.len();
        let taken = min(wanted, buf.len());
        self.decoding_msg.data.extend_from_slice(&buf[..taken]);
        taken
    }

    fn finish(&mut self) -> Option<Message> {
        let cmd = self.decoding_msg.cmd;
        let msg = std::mem::replace(&mut self.decoding_msg, Message::new(cmd));
        trace!("Reply complete: {:?}, {} bytes", msg.cmd, msg.data.len());
        self.reset_decoder();
        Some(msg)
    }

    /// Total reply length once the prefix is known.
    fn body_total(&self, prefix_size: usize) -> Result<usize> {
        let prefix = &self.decoding_msg.data[..prefix_size];
        match self.shape {
            ReplyShape::SizePrefixed => {
                let size = LittleEndian::read_u32(prefix) as usize;
                if size > GLK_MAX_FILE_SIZE {
                    error!("Declared file size {} exceeds {}", size, GLK_MAX_FILE_SIZE);
                    return Err(Error::ProtocolError {
                        description: format!(
                            "declared file size {} exceeds the {} byte filesystem",
                            size, GLK_MAX_FILE_SIZE
                        ),
                    });
                }
                Ok(prefix_size + size)
            }
            ReplyShape::Directory => {
                Ok(prefix_size + prefix[0] as usize * GLK_DIRECTORY_ENTRY_SIZE)
            }
            _ => Err(Error::ProtocolError {
                description: format!("{:?} replies have no length prefix", self.shape),
            }),
        }
    }

    fn decode_keys(&mut self, buf: &[u8]) -> (usize, Option<Message>) {
        for (i, &byte) in buf.iter().enumerate() {
            self.decoding_msg.data.push(byte);
            trace!("Key byte {:02X} ({} buffered)", byte, self.decoding_msg.data.len());
            if byte & GLK_KEY_MORE_FLAG == 0 {
                return (i + 1, self.finish());
            }
            if self.decoding_msg.data.len() == GLK_KEY_BUFFER_DEPTH {
                warn!(
                    "Key buffer still flags more keys after {} bytes, stopping",
                    GLK_KEY_BUFFER_DEPTH
                );
                return (i + 1, self.finish());
            }
        }
        (buf.len(), None)
    }
}

impl Default for GlkHostProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolDecoder for GlkHostProtocol {
    fn expect_reply(&mut self, cmd: Command) {
        self.start_reply(cmd);
    }

    /// Decodes reply bytes for the command armed with `expect_reply`.
    ///
    /// Returns the number of bytes consumed and the reply once it is complete. Bytes
    /// after the end of the reply are left unconsumed.
    fn decode(&mut self, buf: &[u8]) -> Result<(usize, Option<Message>)> {
        trace!(
            "decode called with {} bytes, current state: {:?}",
            buf.len(),
            self.status
        );
        let mut i = 0;
        while i < buf.len() {
            match self.status {
                DecodeStatus::Idle => {
                    warn!("Dropping {} unexpected bytes: {:02X?}", buf.len() - i, &buf[i..]);
                    return Ok((buf.len(), None));
                }
                DecodeStatus::ReceiveFixed(total) | DecodeStatus::ReceiveBody(total) => {
                    i += self.fill_to(total, &buf[i..]);
                    if self.decoding_msg.data.len() == total {
                        return Ok((i, self.finish()));
                    }
                }
                DecodeStatus::WaitPrefix(prefix_size) => {
                    i += self.fill_to(prefix_size, &buf[i..]);
                    if self.decoding_msg.data.len() == prefix_size {
                        let total = match self.body_total(prefix_size) {
                            Ok(total) => total,
                            Err(e) => {
                                self.reset_decoder();
                                return Err(e);
                            }
                        };
                        trace!("Prefix complete, reply is {} bytes in total", total);
                        if total == prefix_size {
                            return Ok((i, self.finish()));
                        }
                        self.status = DecodeStatus::ReceiveBody(total);
                    }
                }
                DecodeStatus::ReceiveKeys => {
                    let (consumed, msg) = self.decode_keys(&buf[i..]);
                    return Ok((i + consumed, msg));
                }
            }
        }
        Ok((i, None))
    }

    fn pending_body(&self) -> Option<(usize, usize)> {
        match self.status {
            DecodeStatus::ReceiveBody(total) => {
                let prefix_size = match self.shape {
                    ReplyShape::SizePrefixed => GLK_FILE_SIZE_FIELD_SIZE,
                    _ => 1,
                };
                Some((
                    total - prefix_size,
                    self.decoding_msg.data.len() - prefix_size,
                ))
            }
            _ => None,
        }
    }

    fn reset_decoder(&mut self) {
        trace!("Resetting decoder state");
        self.status = DecodeStatus::Idle;
        self.shape = ReplyShape::None;
        self.decoding_msg.data.clear();
    }
}

impl ProtocolEncoder for GlkHostProtocol {
    /// Encodes a command `Message` into the provided byte buffer.
    fn encode(&mut self, msg: &Message, bytes: &mut [u8]) -> Result<usize> {
        trace!("Encoding message: cmd={:?}, data={:02X?}", msg.cmd, msg.data);
        let estimated_encoded_size = self.estimate_encoded_size(msg)?;
        if estimated_encoded_size > bytes.len() {
            error!(
                "Buffer too small: required {}, available {}",
                estimated_encoded_size,
                bytes.len()
            );
            return Err(Error::BufferTooSmall);
        }

        let opcode = msg.cmd.opcode();
        bytes[0] = GLK_CMD_INIT;
        bytes[1..1 + opcode.len()].copy_from_slice(opcode);
        bytes[1 + opcode.len()..estimated_encoded_size].copy_from_slice(&msg.data);
        trace!("Encoded frame: {:02X?}", &bytes[..estimated_encoded_size]);
        Ok(estimated_encoded_size)
    }

    fn estimate_encoded_size(&mut self, msg: &Message) -> Result<usize> {
        self.ensure_serial()?;
        Ok(1 + msg.cmd.opcode().len() + msg.data.len())
    }

    /// Text goes out as raw ASCII without the INIT byte.
    fn encode_text(&mut self, text: &[u8]) -> Result<Vec<u8>> {
        self.ensure_serial()?;
        if let Some(pos) = text
            .iter()
            .position(|&c| c != GLK_LINE_FEED && !(0x20..0x7F).contains(&c))
        {
            return Err(Error::InvalidParameter {
                name: "text",
                description: format!(
                    "byte {:#04X} at offset {} is not printable ASCII or a line feed",
                    text[pos], pos
                ),
            });
        }
        Ok(text.to_vec())
    }
}

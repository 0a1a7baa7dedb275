use crate::base::error::Result;
use crate::base::message::Message;
use crate::cmds::Command;

/// Defines the behavior for decoding reply bytes into `Message` objects.
pub trait ProtocolDecoder {
    /// Prepares the decoder for the reply to `cmd`.
    ///
    /// Must be called before the command is written, so that no reply byte can be
    /// decoded against the wrong shape.
    fn expect_reply(&mut self, cmd: Command);

    /// Attempts to decode a `Message` from the provided buffer.
    ///
    /// Returns a `Result` containing a tuple:
    /// * The number of bytes consumed from the buffer.
    /// * An `Option<Message>` which is `Some` if a complete reply was decoded, or `None` otherwise.
    ///
    /// # Arguments
    ///
    /// * `buf` - The byte slice containing the data to decode.
    fn decode(&mut self, buf: &[u8]) -> Result<(usize, Option<Message>)>;

    /// Declared and received body length of a length-prefixed reply in progress.
    ///
    /// Returns `None` unless the prefix has been read and the body is incomplete.
    fn pending_body(&self) -> Option<(usize, usize)>;

    /// Resets the internal state of the decoder.
    /// This is typically called after a communication error or when starting a new session.
    fn reset_decoder(&mut self);
}

/// Defines the behavior for encoding `Message` objects into byte streams.
pub trait ProtocolEncoder {
    /// Encodes a `Message` into the provided byte buffer.
    ///
    /// Returns the number of bytes written to the buffer upon successful encoding.
    ///
    /// # Arguments
    ///
    /// * `msg` - The `Message` to encode.
    /// * `bytes` - The mutable byte slice to write the encoded message into.
    fn encode(&mut self, msg: &Message, bytes: &mut [u8]) -> Result<usize>;

    /// Returns the exact size in bytes required to encode the given `Message`.
    ///
    /// # Arguments
    ///
    /// * `msg` - The `Message` for which to estimate the encoded size.
    fn estimate_encoded_size(&mut self, msg: &Message) -> Result<usize>;

    /// Frames plain text for display at the current cursor position.
    fn encode_text(&mut self, text: &[u8]) -> Result<Vec<u8>>;
}

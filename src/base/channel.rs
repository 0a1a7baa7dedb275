use crate::base::error::{Error, Result};
use crate::base::message::Message;
use crate::base::ring_byte_buffer::RingByteBuffer;
use crate::base::traits::{ProtocolDecoder, ProtocolEncoder};
use log::{error, trace, warn};
use std::fmt;
use std::io;
use std::time::{Duration, Instant};

const DEFAULT_CHANNEL_READ_BUFFER_SIZE: usize = 1024;

/// Direction of bytes reported to a trace hook.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TraceDirection {
    /// Bytes written to the stream.
    Sent,
    /// Bytes read from the stream and consumed by the decoder.
    Received,
}

/// Callback receiving every byte sequence that crosses the channel.
pub type TraceHook = Box<dyn FnMut(TraceDirection, &[u8]) + Send>;

/// Channel encode and decode message with protocol, and send and receive bytes via stream
///
/// The channel owns the stream for the whole session. The GLK protocol is strictly
/// half duplex, so every operation takes `&mut self`: share a channel between callers
/// by wrapping its owner in a `Mutex`.
///
/// # Examples
/// ```ignore
/// let mut channel = Channel::new(
///     GlkHostProtocol::new(),
///     serial_port
/// );
///
/// channel.write(&Message::new(Command::ClearScreen)).unwrap();
/// ```
pub struct Channel<P, T: ?Sized> {
    protocol: P,
    stream: Box<T>,
    read_buffer: RingByteBuffer,
    trace_hook: Option<TraceHook>,
}

impl<P: fmt::Debug, T: ?Sized> fmt::Debug for Channel<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("protocol", &self.protocol)
            .field("read_buffer", &self.read_buffer)
            .field("trace_hook", &self.trace_hook.is_some())
            .finish()
    }
}

impl<P, T: ?Sized> Channel<P, T>
where
    P: ProtocolDecoder + ProtocolEncoder,
    T: io::Read + io::Write,
{
    /// Create a new `Channel` to read and write messages
    ///
    /// # Example
    /// ```ignore
    /// let channel = Channel::new(
    ///     GlkHostProtocol::new(),
    ///     serial_port
    /// );
    /// ```
    pub fn new(protocol: P, stream: Box<T>) -> Channel<P, T> {
        trace!(
            "Creating new Channel with default buffer size {}",
            DEFAULT_CHANNEL_READ_BUFFER_SIZE
        );
        Channel::with_read_buffer_size(protocol, stream, DEFAULT_CHANNEL_READ_BUFFER_SIZE)
    }

    /// Create a new `Channel` with non-default ring buffer capacity
    pub fn with_read_buffer_size(
        protocol: P,
        stream: Box<T>,
        read_buffer_size: usize,
    ) -> Channel<P, T> {
        trace!("Creating new Channel with buffer size {}", read_buffer_size);
        let mut chn = Channel {
            protocol,
            stream,
            read_buffer: RingByteBuffer::with_capacity(read_buffer_size),
            trace_hook: None,
        };

        chn.reset();
        chn
    }

    /// Installs a callback that sees the exact bytes sent and received.
    ///
    /// # Example
    /// ```ignore
    /// channel.set_trace_hook(Box::new(|direction, bytes| {
    ///     eprintln!("{:?} {:02X?}", direction, bytes);
    /// }));
    /// ```
    pub fn set_trace_hook(&mut self, hook: TraceHook) {
        self.trace_hook = Some(hook);
    }

    /// Removes the trace callback, if any.
    pub fn clear_trace_hook(&mut self) {
        self.trace_hook = None;
    }

    /// The protocol used to frame messages.
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Mutable access to the protocol, e.g. to switch transport mode.
    pub fn protocol_mut(&mut self) -> &mut P {
        &mut self.protocol
    }

    /// The underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.stream
    }

    /// Mutable access to the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.stream
    }

    /// Reset the channel status
    ///
    /// Drops buffered bytes and returns the decoder to its idle state. Used after a
    /// communication error so that a half-read reply cannot leak into the next one.
    pub fn reset(&mut self) {
        trace!("Resetting Channel decoder and read buffer");
        self.protocol.reset_decoder();
        self.read_buffer.clear();
    }

    /// Read a reply until it is complete or `timeout` elapses
    ///
    /// Fails with `TruncatedReply` when the deadline passes after a length prefix was
    /// read but before its body completed, and with `OperationTimeout` otherwise.
    pub fn read_until(&mut self, timeout: Duration) -> Result<Message> {
        trace!("Channel read_until called with timeout {:?}", timeout);
        let start = Instant::now();

        loop {
            let buffer_slice = self.read_buffer.current_read_slice();
            if !buffer_slice.is_empty() {
                trace!(
                    "Attempting to decode existing buffer data ({} bytes)",
                    buffer_slice.len()
                );
                let decoded_bytes = match self.protocol.decode(buffer_slice) {
                    Ok((decoded_bytes, msg_option)) => {
                        if decoded_bytes > 0 {
                            if let Some(hook) = self.trace_hook.as_mut() {
                                hook(TraceDirection::Received, &buffer_slice[..decoded_bytes]);
                            }
                            self.read_buffer.skip_bytes(decoded_bytes);
                            trace!(
                                "Skipped {} bytes from buffer (new len: {})",
                                decoded_bytes,
                                self.read_buffer.len()
                            );
                        }
                        if let Some(msg) = msg_option {
                            trace!(
                                "Decoded reply: cmd={:?}, data_len={}",
                                msg.cmd,
                                msg.data.len()
                            );
                            return Ok(msg);
                        }
                        decoded_bytes
                    }
                    Err(e) => {
                        error!("Protocol decode error: {:?}", e);
                        self.reset();
                        return Err(e);
                    }
                };
                // A wrapped ring buffer exposes its tail on the next pass.
                if decoded_bytes > 0 && !self.read_buffer.is_empty() {
                    continue;
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                trace!("Overall timeout reached ({:?})", elapsed);
                let err = match self.protocol.pending_body() {
                    Some((expected, received)) => {
                        warn!(
                            "Reply truncated: declared {} bytes, received {}",
                            expected, received
                        );
                        Error::TruncatedReply { expected, received }
                    }
                    None => Error::OperationTimeout,
                };
                self.reset();
                return Err(err);
            }

            match self.read_buffer.read_from(&mut self.stream) {
                Ok(0) => {
                    trace!("Stream read returned 0 bytes (likely timeout or no data)");
                }
                Ok(bytes_read) => {
                    trace!(
                        "Read {} bytes from stream (new buffer len: {})",
                        bytes_read,
                        self.read_buffer.len()
                    );
                }
                Err(e) => {
                    error!("IO error reading from stream: {}", e);
                    self.reset();
                    return Err(e.into());
                }
            }
        }
    }

    /// Write message to channel
    ///
    /// The whole frame is encoded before anything is written, then handed to the
    /// stream in a single `write_all`.
    ///
    /// # Example
    /// ```ignore
    /// channel.write(&Message::new(Command::ClearScreen)).unwrap();
    /// ```
    pub fn write(&mut self, msg: &Message) -> Result<usize> {
        trace!(
            "Channel write called: cmd={:?}, data_len={}",
            msg.cmd,
            msg.data.len()
        );
        let estimated_encoded_size = self.protocol.estimate_encoded_size(msg)?;
        let mut buf = vec![0; estimated_encoded_size];
        let encoded_size = self.protocol.encode(msg, &mut buf)?;
        buf.truncate(encoded_size);
        self.send(&buf)
    }

    /// Write plain text to the display at the current cursor position
    pub fn write_text(&mut self, text: &[u8]) -> Result<usize> {
        trace!("Channel write_text called: len={}", text.len());
        let buf = self.protocol.encode_text(text)?;
        self.send(&buf)
    }

    /// Send a request to channel and wait for response
    ///
    /// # Example
    /// ```ignore
    /// let resp = channel.invoke(&Message::new(Command::VersionNumber), Duration::from_secs(1));
    /// ```
    pub fn invoke(&mut self, request: &Message, timeout: Duration) -> Result<Message> {
        trace!(
            "Channel invoke called: cmd={:?}, data_len={}, timeout={:?}",
            request.cmd,
            request.data.len(),
            timeout
        );
        // Replies carry no header, so leftovers would be taken for this reply.
        if !self.read_buffer.is_empty() {
            warn!(
                "Invoke: dropping {} stale bytes before {:?}",
                self.read_buffer.len(),
                request.cmd
            );
            self.read_buffer.clear();
        }
        self.protocol.expect_reply(request.cmd);
        if let Err(e) = self.write(request) {
            error!("Invoke: failed to write request: {:?}", e);
            self.protocol.reset_decoder();
            return Err(e);
        }
        trace!("Invoke: waiting for response...");
        let result = self.read_until(timeout);
        match &result {
            Ok(resp) => trace!(
                "Invoke: received response: cmd={:?}, data_len={}",
                resp.cmd,
                resp.data.len()
            ),
            Err(e) => warn!("Invoke: no response for {:?}: {}", request.cmd, e),
        }
        result
    }

    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        trace!("Writing {} bytes to stream: {:02X?}", buf.len(), buf);
        if let Some(hook) = self.trace_hook.as_mut() {
            hook(TraceDirection::Sent, buf);
        }
        if let Err(err) = self.stream.write_all(buf) {
            error!("IO error during write_all: {}", err);
            return Err(err.into());
        }
        self.stream.flush()?;
        trace!("Stream flushed");
        Ok(buf.len())
    }
}

//! Transport plumbing shared by every command: frames, errors, the receive buffer
//! and the channel that owns the stream.

mod channel;
mod error;
mod message;
mod ring_byte_buffer;
mod traits;

pub use self::channel::{Channel, TraceDirection, TraceHook};
pub use self::error::{Error, Result};
pub use self::message::Message;
pub use self::ring_byte_buffer::RingByteBuffer;
pub use self::traits::{ProtocolDecoder, ProtocolEncoder};

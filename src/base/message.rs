use crate::cmds::Command;

/// A command sent to, or a reply received from, the GLK module.
///
/// For requests `data` holds the parameter bytes in wire order, without the INIT byte
/// and opcode. For replies `data` holds every byte the module sent back, including any
/// count or length prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// The command this message belongs to.
    pub cmd: Command,

    /// Parameter or reply bytes.
    pub data: Vec<u8>,
}

impl Message {
    /// Creates a new message with a command and no parameters.
    ///
    /// # Arguments
    ///
    /// * `cmd` - The command for the message.
    pub fn new(cmd: Command) -> Message {
        Message::with_data(cmd, &[])
    }

    /// Creates a new message with a command and parameter bytes.
    ///
    /// # Arguments
    ///
    /// * `cmd` - The command for the message.
    /// * `data` - A slice containing the parameter bytes.
    #[inline]
    pub fn with_data(cmd: Command, data: &[u8]) -> Message {
        Message {
            cmd,
            data: data.to_vec(),
        }
    }
}

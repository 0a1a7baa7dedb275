use std::time::Duration;

/// Default timeout duration for waiting for replies from the module.
pub const GLK_DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// The module resets its key buffer after this many presses.
pub const GLK_KEY_BUFFER_DEPTH: usize = 10;

/// Size of the onboard filesystem; no file or dump can be larger.
pub const GLK_MAX_FILE_SIZE: usize = 16 * 1024;

/// Crystal frequency used by the non-standard baud rate divisor.
pub const GLK_CRYSTAL_HZ: u32 = 16_000_000;

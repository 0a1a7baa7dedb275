use crate::base::Result;
use crate::GlkDevice;
use log::{error, trace};
use serialport::SerialPort;
use std::io;
use std::time::Duration;

/// How long a single port read blocks; the reply deadline is enforced by the channel.
const SERIAL_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Where and how to open the module's serial port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub path: String,
    /// Must match the speed the module is configured for (19200 out of the box).
    pub baud_rate: u32,
    /// Reply timeout of the opened device.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            path: String::from("/dev/ttyUSB0"),
            baud_rate: 19200,
            timeout: Duration::from_secs(5),
        }
    }
}

impl SerialConfig {
    pub fn new(path: impl Into<String>) -> SerialConfig {
        SerialConfig {
            path: path.into(),
            ..SerialConfig::default()
        }
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> SerialConfig {
        self.baud_rate = baud_rate;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> SerialConfig {
        self.timeout = timeout;
        self
    }

    /// Opens the port (8N1, no flow control) and wraps it in a `GlkDevice`.
    pub fn open(&self) -> Result<GlkDevice<dyn SerialPort>> {
        trace!("Opening {} at {} bps", self.path, self.baud_rate);
        let port = serialport::new(&self.path, self.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(SERIAL_POLL_INTERVAL)
            .open()
            .map_err(|e| {
                error!("Failed to open {}: {}", self.path, e);
                io::Error::from(e)
            })?;
        let mut device = GlkDevice::with_stream(port);
        device.set_timeout(self.timeout);
        Ok(device)
    }
}

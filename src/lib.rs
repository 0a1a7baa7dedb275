//! # GLK Driver
//!
//! `glk` is a driver for Matrix Orbital GLK series graphic LCD modules. It encodes
//! display operations (text, drawing, bar graphs, GPO/LEDs, keypad, onboard
//! filesystem, security settings) into the exact command frames the module expects,
//! and decodes the module's replies.
//!
//! The transport is any `Read + Write` stream, typically a serial port. Enable the
//! `serial` feature to open one from a [`SerialConfig`].

extern crate byteorder;
extern crate log;

pub mod answers;
pub mod base;
pub mod cmds;
mod internals;
mod protocol;
#[cfg(feature = "serial")]
mod serial;
pub mod types;
pub mod utils;

pub use crate::answers::{DirectoryEntry, FirmwareVersion, Key, KeyEvent, ModuleType};
pub use crate::base::{Channel, Error, Message, Result, TraceDirection, TraceHook};
pub use crate::cmds::Command;
pub use crate::internals::GLK_DEFAULT_TIMEOUT;
pub use crate::protocol::GlkHostProtocol;
#[cfg(feature = "serial")]
pub use crate::serial::SerialConfig;

use crate::answers::*;
use crate::cmds::GLK_CUSTOMER_DATA_SIZE;
use crate::internals::GLK_MAX_FILE_SIZE;
use crate::types::{
    AutoRepeatMode, BarGraphDirection, BaudRate, Color, DisplayGeometry, FileType, FontMetrics,
    LedColor, LockLevel, StripChartDirection, TransportMode,
};
use crate::utils::{check_point, check_range, check_rect, GLK_NON_STANDARD_BAUD_DIVISOR};
use log::{error, trace};
use std::fmt;
use std::io::{Read, Write};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Flow control thresholds accepted by the module.
const FLOW_CONTROL_THRESHOLD: RangeInclusive<u8> = 0..=128;
/// Auto-off delay of the display, in minutes. 0 keeps it on.
const DISPLAY_ON_MINUTES: RangeInclusive<u8> = 0..=90;
const BAR_GRAPH_ID: RangeInclusive<u8> = 0..=15;
const STRIP_CHART_ID: RangeInclusive<u8> = 0..=6;
const GPO_NUMBER: RangeInclusive<u8> = 1..=6;
const LED_NUMBER: RangeInclusive<u8> = 1..=3;
/// File ids share a byte with the file type bit in directory listings.
const FILE_ID: RangeInclusive<u8> = 0..=127;
/// Strip chart x bounds must fall on byte boundaries.
const STRIP_CHART_X_ALIGN: u8 = 8;

/// Default flow control thresholds: almost full at 0 bytes left, almost empty at 128.
const DEFAULT_FLOW_CONTROL_FULL: u8 = 0;
const DEFAULT_FLOW_CONTROL_EMPTY: u8 = 128;

/// A connection to, and control interface for, a GLK module.
///
/// Holds the `Channel` for the whole session; dropping the device drops the stream,
/// which closes the port. Every method either writes one complete frame or, when a
/// parameter is out of range, writes nothing at all.
pub struct GlkDevice<T: ?Sized> {
    channel: Channel<GlkHostProtocol, T>,
    geometry: DisplayGeometry,
    timeout: Duration,
}

impl<T: ?Sized> fmt::Debug for GlkDevice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlkDevice")
            .field("channel", &self.channel)
            .field("geometry", &self.geometry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<T: ?Sized> GlkDevice<T>
where
    T: Read + Write,
{
    /// Constructs a new `GlkDevice` using an existing `Channel`.
    ///
    /// # Example
    /// ```ignore
    /// # use glk::{GlkDevice, GlkHostProtocol, Channel};
    /// let port = serialport::new("/dev/ttyUSB0", 19200).open()?;
    /// let channel = Channel::new(GlkHostProtocol::new(), port);
    /// let mut lcd = GlkDevice::new(channel);
    /// lcd.clear_screen()?;
    /// ```
    pub fn new(channel: Channel<GlkHostProtocol, T>) -> GlkDevice<T> {
        trace!("Creating new GlkDevice");
        GlkDevice {
            channel,
            geometry: DisplayGeometry::default(),
            timeout: GLK_DEFAULT_TIMEOUT,
        }
    }

    /// Constructs a new `GlkDevice` directly from a communication stream, in serial mode.
    pub fn with_stream(stream: Box<T>) -> GlkDevice<T> {
        trace!("Creating new GlkDevice with stream");
        GlkDevice::new(Channel::new(GlkHostProtocol::new(), stream))
    }

    /// Sets the panel size used to validate coordinates.
    pub fn with_geometry(mut self, geometry: DisplayGeometry) -> GlkDevice<T> {
        trace!("Using geometry {}x{}", geometry.width, geometry.height);
        self.geometry = geometry;
        self
    }

    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    /// Sets how long reply-bearing operations wait for the module.
    pub fn set_timeout(&mut self, timeout: Duration) {
        trace!("Reply timeout set to {:?}", timeout);
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Switches between serial and I2C framing.
    pub fn set_transport_mode(&mut self, mode: TransportMode) {
        self.channel.protocol_mut().set_mode(mode);
    }

    pub fn transport_mode(&self) -> TransportMode {
        self.channel.protocol().mode()
    }

    /// The channel this device talks through, e.g. to install a trace hook.
    pub fn channel(&self) -> &Channel<GlkHostProtocol, T> {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut Channel<GlkHostProtocol, T> {
        &mut self.channel
    }

    fn send(&mut self, cmd: Command, data: &[u8]) -> Result<()> {
        trace!("Sending {:?} with parameters {:02X?}", cmd, data);
        self.channel.write(&Message::with_data(cmd, data))?;
        Ok(())
    }

    fn query(&mut self, cmd: Command, data: &[u8], timeout: Duration) -> Result<Message> {
        trace!("Querying {:?} with timeout {:?}", cmd, timeout);
        let reply = self
            .channel
            .invoke(&Message::with_data(cmd, data), timeout)
            .inspect_err(|e| error!("Query {:?} failed: {}", cmd, e))?;
        Ok(reply)
    }

    fn check_point(&self, x: u8, y: u8) -> Result<()> {
        check_point(&self.geometry, ("x", x), ("y", y))
    }

    // Communication

    /// Enables hardware flow control.
    ///
    /// # Arguments
    ///
    /// * `full` - Bytes left in the module's buffer when it signals "almost full" (0-128).
    /// * `empty` - Bytes left when it signals "almost empty" (0-128).
    pub fn set_flow_control_on(&mut self, full: u8, empty: u8) -> Result<()> {
        check_range("full", full, FLOW_CONTROL_THRESHOLD)?;
        check_range("empty", empty, FLOW_CONTROL_THRESHOLD)?;
        self.send(Command::FlowControlOn, &[full, empty])
    }

    /// Disables hardware flow control.
    pub fn set_flow_control_off(&mut self) -> Result<()> {
        self.send(Command::FlowControlOff, &[])
    }

    /// Enables flow control with the default thresholds, or disables it.
    pub fn set_flow_control(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.set_flow_control_on(DEFAULT_FLOW_CONTROL_FULL, DEFAULT_FLOW_CONTROL_EMPTY)
        } else {
            self.set_flow_control_off()
        }
    }

    /// Changes the module's I2C write address (the read address is one higher).
    pub fn set_i2c_slave_address(&mut self, address: u8) -> Result<()> {
        self.send(Command::I2cSlaveAddress, &[address])
    }

    /// Switches the module to a standard baud rate. The host port must follow.
    pub fn set_baud_rate(&mut self, speed: BaudRate) -> Result<()> {
        trace!("Switching module to {} bps", speed.bps());
        self.send(Command::BaudRate, &[speed.code()])
    }

    /// Switches the module to a non-standard baud rate divisor.
    ///
    /// See [`utils::non_standard_baud_divisor`] for the divisor formula. The divisor is
    /// range checked, but the command itself is not sent: a wrong divisor can make the
    /// module unreachable, so the encoding is left unimplemented.
    pub fn set_non_standard_baud_rate(&mut self, speed: u16) -> Result<()> {
        check_range("speed", speed, GLK_NON_STANDARD_BAUD_DIVISOR)?;
        Err(Error::NotImplemented {
            operation: "non-standard baud rate",
        })
    }

    // Fonts

    /// Uploads a font file. Needs the file transfer handshake, which is not implemented.
    pub fn upload_font(&mut self, id: u8, font: &[u8]) -> Result<()> {
        check_range("id", id, FILE_ID)?;
        check_range("font", font.len(), 1..=GLK_MAX_FILE_SIZE)?;
        Err(Error::NotImplemented {
            operation: "font upload",
        })
    }

    /// Selects a font from the filesystem for subsequent text.
    pub fn set_font(&mut self, id: u8) -> Result<()> {
        check_range("id", id, FILE_ID)?;
        self.send(Command::UseFont, &[id])
    }

    /// Sets margins and spacing of the current font.
    pub fn set_font_metrics(&mut self, metrics: FontMetrics) -> Result<()> {
        self.send(Command::FontMetrics, &metrics.to_bytes())
    }

    /// Box space mode clears each character cell before drawing into it.
    pub fn set_box_space_mode(&mut self, enabled: bool) -> Result<()> {
        self.send(Command::BoxSpaceMode, &[enabled as u8])
    }

    // Text

    /// Writes text at the cursor with the current font. Printable ASCII and `\n` only.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        trace!("Writing text {:?}", text);
        self.channel.write_text(text.as_bytes())?;
        Ok(())
    }

    /// Moves the text cursor to the top left corner.
    pub fn cursor_home(&mut self) -> Result<()> {
        self.send(Command::CursorHome, &[])
    }

    /// Moves the text cursor to a column and row of the current font.
    pub fn set_cursor_position(&mut self, col: u8, row: u8) -> Result<()> {
        self.send(Command::CursorPosition, &[col, row])
    }

    /// Moves the text cursor to an absolute pixel coordinate.
    pub fn set_cursor_coordinate(&mut self, x: u8, y: u8) -> Result<()> {
        self.check_point(x, y)?;
        self.send(Command::CursorCoordinate, &[x, y])
    }

    pub fn set_autoscroll_on(&mut self) -> Result<()> {
        self.send(Command::AutoScrollOn, &[])
    }

    pub fn set_autoscroll_off(&mut self) -> Result<()> {
        self.send(Command::AutoScrollOff, &[])
    }

    pub fn set_autoscroll(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.set_autoscroll_on()
        } else {
            self.set_autoscroll_off()
        }
    }

    // Bitmaps

    /// Uploads a bitmap file. Needs the file transfer handshake, which is not implemented.
    pub fn upload_bitmap(&mut self, id: u8, bitmap: &[u8]) -> Result<()> {
        check_range("id", id, FILE_ID)?;
        check_range("bitmap", bitmap.len(), 1..=GLK_MAX_FILE_SIZE)?;
        Err(Error::NotImplemented {
            operation: "bitmap upload",
        })
    }

    /// Draws a bitmap stored in the filesystem with its top left corner at `(x, y)`.
    pub fn draw_memory_bitmap(&mut self, id: u8, x: u8, y: u8) -> Result<()> {
        check_range("id", id, FILE_ID)?;
        self.check_point(x, y)?;
        self.send(Command::DrawMemoryBitmap, &[id, x, y])
    }

    /// Draws a bitmap sent inline. The data layout is not implemented.
    pub fn draw_bitmap(&mut self, x: u8, y: u8, width: u8, height: u8, data: &[u8]) -> Result<()> {
        self.check_point(x, y)?;
        check_range("width", width, 1..=self.geometry.width)?;
        check_range("height", height, 1..=self.geometry.height)?;
        let expected = (width as usize * height as usize).div_ceil(8);
        check_range("data", data.len(), expected..=expected)?;
        Err(Error::NotImplemented {
            operation: "bitmap draw",
        })
    }

    // Drawing

    /// Sets the colour used by pixel and line drawing.
    pub fn set_drawing_color(&mut self, color: Color) -> Result<()> {
        self.send(Command::DrawingColor, &[color.code()])
    }

    pub fn draw_pixel(&mut self, x: u8, y: u8) -> Result<()> {
        self.check_point(x, y)?;
        self.send(Command::DrawPixel, &[x, y])
    }

    /// Draws a line. Lines may interpolate differently left to right and right to left.
    pub fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<()> {
        check_point(&self.geometry, ("x1", x1), ("y1", y1))?;
        check_point(&self.geometry, ("x2", x2), ("y2", y2))?;
        self.send(Command::DrawLine, &[x1, y1, x2, y2])
    }

    /// Draws a line from the end of the previous one to `(x, y)`.
    pub fn continue_line(&mut self, x: u8, y: u8) -> Result<()> {
        self.check_point(x, y)?;
        self.send(Command::ContinueLine, &[x, y])
    }

    pub fn draw_rectangle(&mut self, color: Color, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<()> {
        check_rect(&self.geometry, x1, y1, x2, y2)?;
        self.send(Command::DrawRectangle, &[color.code(), x1, y1, x2, y2])
    }

    pub fn draw_solid_rectangle(
        &mut self,
        color: Color,
        x1: u8,
        y1: u8,
        x2: u8,
        y2: u8,
    ) -> Result<()> {
        check_rect(&self.geometry, x1, y1, x2, y2)?;
        self.send(Command::DrawSolidRectangle, &[color.code(), x1, y1, x2, y2])
    }

    /// Defines bar graph `id` (0-15) over the given area. Overlapping graphs are allowed.
    pub fn init_bar_graph(
        &mut self,
        id: u8,
        direction: BarGraphDirection,
        x1: u8,
        y1: u8,
        x2: u8,
        y2: u8,
    ) -> Result<()> {
        check_range("id", id, BAR_GRAPH_ID)?;
        check_rect(&self.geometry, x1, y1, x2, y2)?;
        self.send(
            Command::InitializeBarGraph,
            &[id, direction.code(), x1, y1, x2, y2],
        )
    }

    /// Fills bar graph `id` to `value` pixels.
    pub fn draw_bar_graph(&mut self, id: u8, value: u8) -> Result<()> {
        check_range("id", id, BAR_GRAPH_ID)?;
        self.send(Command::DrawBarGraph, &[id, value])
    }

    /// Defines strip chart `id` (0-6). `x1` and `x2` must be multiples of 8.
    pub fn init_strip_chart(&mut self, id: u8, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<()> {
        check_range("id", id, STRIP_CHART_ID)?;
        check_rect(&self.geometry, x1, y1, x2, y2)?;
        for (name, x) in [("x1", x1), ("x2", x2)] {
            if x % STRIP_CHART_X_ALIGN != 0 {
                return Err(Error::InvalidParameter {
                    name,
                    description: format!("{} is not a multiple of {}", x, STRIP_CHART_X_ALIGN),
                });
            }
        }
        self.send(Command::InitializeStripChart, &[id, x1, y1, x2, y2])
    }

    /// Shifts a strip chart. The reference byte layout is not implemented.
    pub fn shift_strip_chart(&mut self, id: u8, direction: StripChartDirection) -> Result<()> {
        check_range("id", id, STRIP_CHART_ID)?;
        trace!("Strip chart {} shift {:?} requested", id, direction);
        Err(Error::NotImplemented {
            operation: "strip chart shift",
        })
    }

    // GPO

    pub fn gpo_off(&mut self, num: u8) -> Result<()> {
        check_range("num", num, GPO_NUMBER)?;
        self.send(Command::GpoOff, &[num])
    }

    pub fn gpo_on(&mut self, num: u8) -> Result<()> {
        check_range("num", num, GPO_NUMBER)?;
        self.send(Command::GpoOn, &[num])
    }

    /// Sets the state GPO `num` takes at power up. The current state is unchanged.
    pub fn set_startup_gpo_state(&mut self, num: u8, on: bool) -> Result<()> {
        check_range("num", num, GPO_NUMBER)?;
        self.send(Command::StartupGpoState, &[num, on as u8])
    }

    /// Switches GPO `num`, and with `store` also makes it the power up state.
    pub fn set_gpo(&mut self, num: u8, on: bool, store: bool) -> Result<()> {
        check_range("num", num, GPO_NUMBER)?;
        if on {
            self.gpo_on(num)?;
        } else {
            self.gpo_off(num)?;
        }
        if store {
            self.set_startup_gpo_state(num, on)?;
        }
        Ok(())
    }

    /// Sets tricolour LED `num` (1 top, 3 bottom), driven by GPO 2n-1 and 2n.
    pub fn set_led(&mut self, num: u8, color: LedColor, store: bool) -> Result<()> {
        check_range("num", num, LED_NUMBER)?;
        let (first, second) = color.gpo_states();
        trace!("LED {} -> {:?}", num, color);
        self.set_gpo(num * 2 - 1, first, store)?;
        self.set_gpo(num * 2, second, store)
    }

    // Keypad

    /// Key presses are sent to the host as they happen.
    pub fn set_key_autotransmit_on(&mut self) -> Result<()> {
        self.send(Command::AutoTransmitKeyOn, &[])
    }

    /// Key presses are buffered until polled.
    pub fn set_key_autotransmit_off(&mut self) -> Result<()> {
        self.send(Command::AutoTransmitKeyOff, &[])
    }

    /// Reads the key buffer. Returns an empty list when no key was pressed.
    ///
    /// The module keeps at most ten presses; older ones are lost.
    pub fn poll_keys(&mut self) -> Result<Vec<KeyEvent>> {
        let timeout = self.timeout;
        self.poll_keys_with_timeout(timeout)
    }

    pub fn poll_keys_with_timeout(&mut self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let reply = self.query(Command::PollKey, &[], timeout)?;
        let keys = parse_keys(&reply.data);
        trace!("Polled {} keys: {:?}", keys.len(), keys);
        Ok(keys)
    }

    pub fn clear_key_buffer(&mut self) -> Result<()> {
        self.send(Command::ClearKeyBuffer, &[])
    }

    /// Sets key debounce time in 6.554 ms steps (default 8).
    pub fn set_debounce_time(&mut self, time: u8) -> Result<()> {
        self.send(Command::DebounceTime, &[time])
    }

    pub fn set_auto_repeat_mode(&mut self, mode: AutoRepeatMode) -> Result<()> {
        self.send(Command::AutoRepeatMode, &[mode.code()])
    }

    pub fn set_auto_repeat_off(&mut self) -> Result<()> {
        self.send(Command::AutoRepeatOff, &[])
    }

    /// Assigns custom key down and key up codes. Not implemented.
    pub fn assign_keypad_codes(&mut self, key_down: &[u8; 9], key_up: &[u8; 9]) -> Result<()> {
        trace!("Keypad codes requested: {:02X?} / {:02X?}", key_down, key_up);
        Err(Error::NotImplemented {
            operation: "custom keypad codes",
        })
    }

    // Display

    pub fn clear_screen(&mut self) -> Result<()> {
        self.send(Command::ClearScreen, &[])
    }

    /// Turns the backlight on, off again after `minutes` (0-90, 0 keeps it on).
    pub fn display_on(&mut self, minutes: u8) -> Result<()> {
        check_range("minutes", minutes, DISPLAY_ON_MINUTES)?;
        self.send(Command::DisplayOn, &[minutes])
    }

    pub fn display_off(&mut self) -> Result<()> {
        self.send(Command::DisplayOff, &[])
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<()> {
        if on {
            self.display_on(0)
        } else {
            self.display_off()
        }
    }

    pub fn set_brightness(&mut self, brightness: u8) -> Result<()> {
        self.send(Command::Brightness, &[brightness])
    }

    /// Sets and saves the power up brightness (default 255).
    pub fn set_default_brightness(&mut self, brightness: u8) -> Result<()> {
        self.send(Command::DefaultBrightness, &[brightness])
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<()> {
        self.send(Command::Contrast, &[contrast])
    }

    /// Sets and saves the power up contrast (default 128).
    pub fn set_default_contrast(&mut self, contrast: u8) -> Result<()> {
        self.send(Command::DefaultContrast, &[contrast])
    }

    // Filesystem

    /// Erases every font and bitmap. Restart the module afterwards.
    pub fn wipe_filesystem(&mut self) -> Result<()> {
        self.send(Command::WipeFilesystem, &[])
    }

    /// Deletes one file. Restart the module afterwards.
    pub fn delete_file(&mut self, file_type: FileType, id: u8) -> Result<()> {
        check_range("id", id, FILE_ID)?;
        self.send(Command::DeleteFile, &[file_type.code(), id])
    }

    /// Free filesystem space in bytes.
    pub fn get_free_space(&mut self) -> Result<u32> {
        let timeout = self.timeout;
        self.get_free_space_with_timeout(timeout)
    }

    pub fn get_free_space_with_timeout(&mut self, timeout: Duration) -> Result<u32> {
        let reply = self.query(Command::FreeSpace, &[], timeout)?;
        parse_free_space(&reply.data)
    }

    /// Lists the filesystem directory, unused slots included.
    pub fn get_directory(&mut self) -> Result<Vec<DirectoryEntry>> {
        let timeout = self.timeout;
        self.get_directory_with_timeout(timeout)
    }

    pub fn get_directory_with_timeout(&mut self, timeout: Duration) -> Result<Vec<DirectoryEntry>> {
        let reply = self.query(Command::Directory, &[], timeout)?;
        parse_directory(&reply.data)
    }

    /// Replaces the whole filesystem with a 16 KiB image. Needs the file transfer
    /// handshake, which is not implemented.
    pub fn upload_filesystem(&mut self, image: &[u8]) -> Result<()> {
        check_range("image", image.len(), GLK_MAX_FILE_SIZE..=GLK_MAX_FILE_SIZE)?;
        Err(Error::NotImplemented {
            operation: "filesystem upload",
        })
    }

    /// Downloads one file.
    pub fn download_file(&mut self, file_type: FileType, id: u8) -> Result<Vec<u8>> {
        let timeout = self.timeout;
        self.download_file_with_timeout(file_type, id, timeout)
    }

    pub fn download_file_with_timeout(
        &mut self,
        file_type: FileType,
        id: u8,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        check_range("id", id, FILE_ID)?;
        let reply = self.query(Command::DownloadFile, &[file_type.code(), id], timeout)?;
        let file = parse_file(&reply.data)?;
        trace!("Downloaded {:?} {}: {} bytes", file_type, id, file.len());
        Ok(file)
    }

    /// Renames a file, possibly changing its type.
    pub fn move_file(
        &mut self,
        old_type: FileType,
        old_id: u8,
        new_type: FileType,
        new_id: u8,
    ) -> Result<()> {
        check_range("old_id", old_id, FILE_ID)?;
        check_range("new_id", new_id, FILE_ID)?;
        self.send(
            Command::MoveFile,
            &[old_type.code(), old_id, new_type.code(), new_id],
        )
    }

    /// Downloads the raw filesystem image.
    pub fn dump_filesystem(&mut self) -> Result<Vec<u8>> {
        let timeout = self.timeout;
        self.dump_filesystem_with_timeout(timeout)
    }

    pub fn dump_filesystem_with_timeout(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        let reply = self.query(Command::DumpFilesystem, &[], timeout)?;
        parse_file(&reply.data)
    }

    // Security

    /// Whether setting changes are saved to non-volatile memory.
    pub fn set_remember(&mut self, remember: bool) -> Result<()> {
        self.send(Command::Remember, &[remember as u8])
    }

    pub fn set_lock_level(&mut self, level: LockLevel) -> Result<()> {
        self.send(Command::LockLevel, &[level.bits()])
    }

    /// Sets the lock level applied at power up.
    pub fn set_default_lock_level(&mut self, level: LockLevel) -> Result<()> {
        self.send(Command::DefaultLockLevel, &[level.bits()])
    }

    /// Stores up to 16 bytes of user data; shorter data is padded with zeros.
    pub fn write_customer_data(&mut self, data: &[u8]) -> Result<()> {
        check_range("data", data.len(), 0..=GLK_CUSTOMER_DATA_SIZE)?;
        let mut payload = [0u8; GLK_CUSTOMER_DATA_SIZE];
        payload[..data.len()].copy_from_slice(data);
        self.send(Command::WriteCustomerData, &payload)
    }

    pub fn read_customer_data(&mut self) -> Result<[u8; GLK_CUSTOMER_DATA_SIZE]> {
        let timeout = self.timeout;
        self.read_customer_data_with_timeout(timeout)
    }

    pub fn read_customer_data_with_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<[u8; GLK_CUSTOMER_DATA_SIZE]> {
        let reply = self.query(Command::ReadCustomerData, &[], timeout)?;
        parse_customer_data(&reply.data)
    }

    // Identification

    /// Gets the firmware version.
    pub fn get_version(&mut self) -> Result<FirmwareVersion> {
        let timeout = self.timeout;
        self.get_version_with_timeout(timeout)
    }

    pub fn get_version_with_timeout(&mut self, timeout: Duration) -> Result<FirmwareVersion> {
        let reply = self.query(Command::VersionNumber, &[], timeout)?;
        let version = parse_version(&reply.data)?;
        trace!("Firmware version {}", version);
        Ok(version)
    }

    /// Gets the module model.
    pub fn get_module_type(&mut self) -> Result<ModuleType> {
        let timeout = self.timeout;
        self.get_module_type_with_timeout(timeout)
    }

    pub fn get_module_type_with_timeout(&mut self, timeout: Duration) -> Result<ModuleType> {
        let reply = self.query(Command::ModuleType, &[], timeout)?;
        let module = parse_module_type(&reply.data)?;
        trace!("Module type {}", module);
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Records writes and replays canned reply bytes, timing out once they run dry.
    #[derive(Debug, Default)]
    struct MockPort {
        written: Vec<u8>,
        write_calls: usize,
        replies: VecDeque<u8>,
        /// Released into `replies` one chunk per write, like a module answering.
        answers: VecDeque<Vec<u8>>,
    }

    impl Read for MockPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.replies.is_empty() {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "no data"));
            }
            let n = buf.len().min(self.replies.len());
            for (dst, src) in buf.iter_mut().zip(self.replies.drain(..n)) {
                *dst = src;
            }
            Ok(n)
        }
    }

    impl Write for MockPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.write_calls += 1;
            self.written.extend_from_slice(buf);
            if let Some(answer) = self.answers.pop_front() {
                self.replies.extend(answer);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn device(replies: &[u8]) -> GlkDevice<MockPort> {
        let port = MockPort {
            replies: replies.iter().copied().collect(),
            ..MockPort::default()
        };
        let mut lcd = GlkDevice::with_stream(Box::new(port));
        lcd.set_timeout(Duration::from_millis(30));
        lcd
    }

    fn answering_device(answers: &[&[u8]]) -> GlkDevice<MockPort> {
        let port = MockPort {
            answers: answers.iter().map(|a| a.to_vec()).collect(),
            ..MockPort::default()
        };
        let mut lcd = GlkDevice::with_stream(Box::new(port));
        lcd.set_timeout(Duration::from_millis(30));
        lcd
    }

    fn written(lcd: &GlkDevice<MockPort>) -> &[u8] {
        &lcd.channel().get_ref().written
    }

    fn write_calls(lcd: &GlkDevice<MockPort>) -> usize {
        lcd.channel().get_ref().write_calls
    }

    #[test]
    fn cursor_coordinate_frame() {
        let mut lcd = device(&[]);
        lcd.set_cursor_coordinate(10, 20).unwrap();
        assert_eq!(written(&lcd), &[0xFE, 0x79, 0x0A, 0x14]);
        assert_eq!(write_calls(&lcd), 1);
    }

    #[test]
    fn rectangle_frame() {
        let mut lcd = device(&[]);
        lcd.draw_rectangle(Color::Black, 0, 0, 50, 30).unwrap();
        assert_eq!(written(&lcd), &[0xFE, 0x72, 0x01, 0x00, 0x00, 0x32, 0x1E]);
    }

    #[test]
    fn wipe_uses_guard_bytes() {
        let mut lcd = device(&[]);
        lcd.wipe_filesystem().unwrap();
        assert_eq!(written(&lcd), &[0xFE, 0x21, 0x59, 0x21]);
    }

    #[test]
    fn lock_level_frame() {
        let mut lcd = device(&[]);
        lcd.set_lock_level(LockLevel::FILESYSTEM | LockLevel::SETTINGS)
            .unwrap();
        assert_eq!(written(&lcd), &[0xFE, 0xCA, 0xF5, 0xA0, 0x30]);
    }

    #[test]
    fn repeated_commands_are_sent_each_time() {
        let mut lcd = device(&[]);
        lcd.clear_screen().unwrap();
        lcd.clear_screen().unwrap();
        assert_eq!(written(&lcd), &[0xFE, 0x58, 0xFE, 0x58]);
        assert_eq!(write_calls(&lcd), 2);
    }

    #[test]
    fn text_is_sent_without_init() {
        let mut lcd = device(&[]);
        lcd.write_text("Hi\n").unwrap();
        assert_eq!(written(&lcd), b"Hi\n");
        assert!(lcd.write_text("caf\u{e9}").is_err());
        assert_eq!(write_calls(&lcd), 1);
    }

    #[rstest]
    #[case::display_minutes(|lcd: &mut GlkDevice<MockPort>| lcd.display_on(91))]
    #[case::pixel_off_panel(|lcd: &mut GlkDevice<MockPort>| lcd.draw_pixel(192, 0))]
    #[case::rect_reversed(|lcd: &mut GlkDevice<MockPort>| lcd.draw_solid_rectangle(Color::White, 9, 0, 8, 5))]
    #[case::bar_graph_id(|lcd: &mut GlkDevice<MockPort>| lcd.draw_bar_graph(16, 10))]
    #[case::strip_chart_unaligned(|lcd: &mut GlkDevice<MockPort>| lcd.init_strip_chart(0, 4, 0, 64, 63))]
    #[case::gpo_zero(|lcd: &mut GlkDevice<MockPort>| lcd.gpo_on(0))]
    #[case::gpo_seven(|lcd: &mut GlkDevice<MockPort>| lcd.gpo_off(7))]
    #[case::led_four(|lcd: &mut GlkDevice<MockPort>| lcd.set_led(4, LedColor::Red, false))]
    #[case::flow_control(|lcd: &mut GlkDevice<MockPort>| lcd.set_flow_control_on(0, 129))]
    #[case::file_id(|lcd: &mut GlkDevice<MockPort>| lcd.delete_file(FileType::Font, 128))]
    #[case::font_id(|lcd: &mut GlkDevice<MockPort>| lcd.set_font(128))]
    #[case::memory_bitmap_id(|lcd: &mut GlkDevice<MockPort>| lcd.draw_memory_bitmap(128, 0, 0))]
    #[case::bar_graph_reversed_x(|lcd: &mut GlkDevice<MockPort>| lcd.init_bar_graph(0, BarGraphDirection::VerticalFromBottom, 20, 0, 10, 5))]
    #[case::bar_graph_reversed_y(|lcd: &mut GlkDevice<MockPort>| lcd.init_bar_graph(0, BarGraphDirection::VerticalFromTop, 0, 10, 5, 9))]
    #[case::strip_chart_reversed_x(|lcd: &mut GlkDevice<MockPort>| lcd.init_strip_chart(0, 16, 0, 8, 63))]
    #[case::strip_chart_reversed_y(|lcd: &mut GlkDevice<MockPort>| lcd.init_strip_chart(0, 8, 40, 64, 30))]
    #[case::customer_data(|lcd: &mut GlkDevice<MockPort>| lcd.write_customer_data(&[0; 17]))]
    fn invalid_parameters_write_nothing(#[case] op: fn(&mut GlkDevice<MockPort>) -> Result<()>) {
        let mut lcd = device(&[]);
        assert!(matches!(op(&mut lcd), Err(Error::InvalidParameter { .. })));
        assert_eq!(write_calls(&lcd), 0);
    }

    #[rstest]
    #[case::font(|lcd: &mut GlkDevice<MockPort>| lcd.upload_font(1, &[0; 8]))]
    #[case::bitmap(|lcd: &mut GlkDevice<MockPort>| lcd.upload_bitmap(1, &[0; 8]))]
    #[case::filesystem(|lcd: &mut GlkDevice<MockPort>| lcd.upload_filesystem(&[0; 16384]))]
    #[case::draw_bitmap(|lcd: &mut GlkDevice<MockPort>| lcd.draw_bitmap(0, 0, 8, 2, &[0; 2]))]
    #[case::baud(|lcd: &mut GlkDevice<MockPort>| lcd.set_non_standard_baud_rate(103))]
    #[case::keypad(|lcd: &mut GlkDevice<MockPort>| lcd.assign_keypad_codes(&[0; 9], &[0; 9]))]
    #[case::strip_chart(|lcd: &mut GlkDevice<MockPort>| lcd.shift_strip_chart(0, StripChartDirection::Left))]
    fn unimplemented_operations_write_nothing(
        #[case] op: fn(&mut GlkDevice<MockPort>) -> Result<()>,
    ) {
        let mut lcd = device(&[]);
        assert!(matches!(op(&mut lcd), Err(Error::NotImplemented { .. })));
        assert_eq!(write_calls(&lcd), 0);
    }

    #[test]
    fn unimplemented_operations_validate_first() {
        let mut lcd = device(&[]);
        assert!(matches!(
            lcd.set_non_standard_baud_rate(11),
            Err(Error::InvalidParameter { name: "speed", .. })
        ));
        assert!(matches!(
            lcd.upload_filesystem(&[0; 100]),
            Err(Error::InvalidParameter { name: "image", .. })
        ));
    }

    #[test]
    fn free_space_reply() {
        let mut lcd = device(&[0x00, 0x10, 0x00, 0x00]);
        assert_eq!(lcd.get_free_space().unwrap(), 4096);
        assert_eq!(written(&lcd), &[0xFE, 0xAF]);
    }

    #[test]
    fn poll_keys_reads_one_key() {
        let mut lcd = device(&[0x42, 0x00]);
        let keys = lcd.poll_keys().unwrap();
        assert_eq!(keys, vec![KeyEvent { code: 0x42 }]);
        assert_eq!(keys[0].key(), Some(Key::Up));
        assert_eq!(written(&lcd), &[0xFE, 0x26]);
    }

    #[test]
    fn poll_keys_empty_buffer() {
        let mut lcd = device(&[0x00]);
        assert!(lcd.poll_keys().unwrap().is_empty());
    }

    #[test]
    fn directory_listing() {
        let mut lcd = device(&[0x02, 0x01, 0x81, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let entries = lcd.get_directory().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].in_use());
        assert_eq!(entries[0].file_type, FileType::Bitmap);
        assert_eq!((entries[0].id, entries[0].size), (1, 64));
        assert!(!entries[1].in_use());
    }

    #[test]
    fn truncated_directory() {
        let mut lcd = device(&[0x02, 0x01, 0x01, 0x10, 0x00, 0x00, 0x00]);
        assert!(matches!(
            lcd.get_directory(),
            Err(Error::TruncatedReply {
                expected: 8,
                received: 6
            })
        ));
    }

    #[test]
    fn download_file_reply() {
        let mut lcd = device(&[0x03, 0x00, 0x00, 0x00, 0xAA, 0xBB, 0xCC]);
        assert_eq!(
            lcd.download_file(FileType::Font, 2).unwrap(),
            vec![0xAA, 0xBB, 0xCC]
        );
        assert_eq!(written(&lcd), &[0xFE, 0xB2, 0x00, 0x02]);
    }

    #[test]
    fn truncated_file() {
        let mut lcd = device(&[0x05, 0x00, 0x00, 0x00, 0xAA, 0xBB]);
        assert!(matches!(
            lcd.download_file(FileType::Bitmap, 0),
            Err(Error::TruncatedReply {
                expected: 5,
                received: 2
            })
        ));
    }

    #[test]
    fn silent_module_times_out() {
        let mut lcd = device(&[]);
        assert!(matches!(lcd.get_version(), Err(Error::OperationTimeout)));
        assert!(matches!(
            lcd.get_module_type_with_timeout(Duration::from_millis(5)),
            Err(Error::OperationTimeout)
        ));
    }

    #[test]
    fn identification_replies() {
        let mut lcd = answering_device(&[&[0x57], &[0x15]]);
        assert_eq!(lcd.get_version().unwrap().to_string(), "5.7");
        assert_eq!(lcd.get_module_type().unwrap(), ModuleType::Glk24064_25);
        assert_eq!(written(&lcd), &[0xFE, 0x36, 0xFE, 0x37]);
    }

    #[test]
    fn leftover_key_bytes_are_not_the_next_reply() {
        let mut lcd = answering_device(&[&[0x42, 0x00], &[0x57]]);
        assert_eq!(lcd.poll_keys().unwrap(), vec![KeyEvent { code: 0x42 }]);
        assert_eq!(lcd.get_version().unwrap().raw(), 0x57);
    }

    #[test]
    fn flow_control_signal_between_replies_is_dropped() {
        use crate::cmds::GLK_FLOW_CONTROL_ALMOST_EMPTY;

        let mut lcd = answering_device(&[&[0x57, GLK_FLOW_CONTROL_ALMOST_EMPTY], &[0x15]]);
        assert_eq!(lcd.get_version().unwrap().raw(), 0x57);
        assert_eq!(lcd.get_module_type().unwrap(), ModuleType::Glk24064_25);
    }

    #[rstest]
    #[case::flow_control_on(|lcd: &mut GlkDevice<MockPort>| lcd.set_flow_control_on(10, 100), &[0xFE, 0x3A, 0x0A, 0x64])]
    #[case::i2c_address(|lcd: &mut GlkDevice<MockPort>| lcd.set_i2c_slave_address(0x50), &[0xFE, 0x33, 0x50])]
    #[case::baud_rate(|lcd: &mut GlkDevice<MockPort>| lcd.set_baud_rate(BaudRate::B19200), &[0xFE, 0x39, 0x67])]
    #[case::font(|lcd: &mut GlkDevice<MockPort>| lcd.set_font(3), &[0xFE, 0x31, 0x03])]
    #[case::font_metrics(
        |lcd: &mut GlkDevice<MockPort>| lcd.set_font_metrics(FontMetrics {
            left_margin: 1,
            top_margin: 2,
            char_spacing: 3,
            line_spacing: 4,
            scroll_row: 5,
        }),
        &[0xFE, 0x32, 0x01, 0x02, 0x03, 0x04, 0x05]
    )]
    #[case::box_space(|lcd: &mut GlkDevice<MockPort>| lcd.set_box_space_mode(true), &[0xFE, 0xAC, 0x01])]
    #[case::cursor_home(|lcd: &mut GlkDevice<MockPort>| lcd.cursor_home(), &[0xFE, 0x48])]
    #[case::cursor_position(|lcd: &mut GlkDevice<MockPort>| lcd.set_cursor_position(2, 3), &[0xFE, 0x47, 0x02, 0x03])]
    #[case::autoscroll_on(|lcd: &mut GlkDevice<MockPort>| lcd.set_autoscroll(true), &[0xFE, 0x51])]
    #[case::autoscroll_off(|lcd: &mut GlkDevice<MockPort>| lcd.set_autoscroll(false), &[0xFE, 0x52])]
    #[case::memory_bitmap(|lcd: &mut GlkDevice<MockPort>| lcd.draw_memory_bitmap(4, 10, 20), &[0xFE, 0x62, 0x04, 0x0A, 0x14])]
    #[case::drawing_color(|lcd: &mut GlkDevice<MockPort>| lcd.set_drawing_color(Color::White), &[0xFE, 0x63, 0x00])]
    #[case::pixel(|lcd: &mut GlkDevice<MockPort>| lcd.draw_pixel(191, 63), &[0xFE, 0x70, 0xBF, 0x3F])]
    #[case::line(|lcd: &mut GlkDevice<MockPort>| lcd.draw_line(0, 0, 191, 63), &[0xFE, 0x6C, 0x00, 0x00, 0xBF, 0x3F])]
    #[case::continue_line(|lcd: &mut GlkDevice<MockPort>| lcd.continue_line(30, 40), &[0xFE, 0x65, 0x1E, 0x28])]
    #[case::solid_rectangle(|lcd: &mut GlkDevice<MockPort>| lcd.draw_solid_rectangle(Color::White, 1, 2, 3, 4), &[0xFE, 0x78, 0x00, 0x01, 0x02, 0x03, 0x04])]
    #[case::bar_graph_init(
        |lcd: &mut GlkDevice<MockPort>| lcd.init_bar_graph(2, BarGraphDirection::HorizontalFromLeft, 0, 0, 100, 7),
        &[0xFE, 0x67, 0x02, 0x01, 0x00, 0x00, 0x64, 0x07]
    )]
    #[case::bar_graph(|lcd: &mut GlkDevice<MockPort>| lcd.draw_bar_graph(2, 50), &[0xFE, 0x69, 0x02, 0x32])]
    #[case::strip_chart_init(|lcd: &mut GlkDevice<MockPort>| lcd.init_strip_chart(1, 8, 0, 64, 63), &[0xFE, 0x6A, 0x01, 0x08, 0x00, 0x40, 0x3F])]
    #[case::gpo_on(|lcd: &mut GlkDevice<MockPort>| lcd.gpo_on(5), &[0xFE, 0x57, 0x05])]
    #[case::gpo_off(|lcd: &mut GlkDevice<MockPort>| lcd.gpo_off(6), &[0xFE, 0x56, 0x06])]
    #[case::startup_gpo(|lcd: &mut GlkDevice<MockPort>| lcd.set_startup_gpo_state(3, true), &[0xFE, 0xC3, 0x03, 0x01])]
    #[case::autotransmit_on(|lcd: &mut GlkDevice<MockPort>| lcd.set_key_autotransmit_on(), &[0xFE, 0x41])]
    #[case::autotransmit_off(|lcd: &mut GlkDevice<MockPort>| lcd.set_key_autotransmit_off(), &[0xFE, 0x4F])]
    #[case::clear_keys(|lcd: &mut GlkDevice<MockPort>| lcd.clear_key_buffer(), &[0xFE, 0x45])]
    #[case::debounce(|lcd: &mut GlkDevice<MockPort>| lcd.set_debounce_time(8), &[0xFE, 0x55, 0x08])]
    #[case::auto_repeat(|lcd: &mut GlkDevice<MockPort>| lcd.set_auto_repeat_mode(AutoRepeatMode::KeyUpDown), &[0xFE, 0x7E, 0x01])]
    #[case::auto_repeat_off(|lcd: &mut GlkDevice<MockPort>| lcd.set_auto_repeat_off(), &[0xFE, 0x60])]
    #[case::display_on(|lcd: &mut GlkDevice<MockPort>| lcd.display_on(10), &[0xFE, 0x42, 0x0A])]
    #[case::display_off(|lcd: &mut GlkDevice<MockPort>| lcd.display_off(), &[0xFE, 0x46])]
    #[case::backlight_on(|lcd: &mut GlkDevice<MockPort>| lcd.set_backlight(true), &[0xFE, 0x42, 0x00])]
    #[case::brightness(|lcd: &mut GlkDevice<MockPort>| lcd.set_brightness(200), &[0xFE, 0x99, 0xC8])]
    #[case::default_brightness(|lcd: &mut GlkDevice<MockPort>| lcd.set_default_brightness(255), &[0xFE, 0x98, 0xFF])]
    #[case::contrast(|lcd: &mut GlkDevice<MockPort>| lcd.set_contrast(128), &[0xFE, 0x50, 0x80])]
    #[case::default_contrast(|lcd: &mut GlkDevice<MockPort>| lcd.set_default_contrast(100), &[0xFE, 0x91, 0x64])]
    #[case::delete_file(|lcd: &mut GlkDevice<MockPort>| lcd.delete_file(FileType::Bitmap, 5), &[0xFE, 0xAD, 0x01, 0x05])]
    #[case::move_file(
        |lcd: &mut GlkDevice<MockPort>| lcd.move_file(FileType::Font, 1, FileType::Bitmap, 2),
        &[0xFE, 0xB4, 0x00, 0x01, 0x01, 0x02]
    )]
    #[case::remember(|lcd: &mut GlkDevice<MockPort>| lcd.set_remember(true), &[0xFE, 0x93, 0x01])]
    #[case::default_lock_level(|lcd: &mut GlkDevice<MockPort>| lcd.set_default_lock_level(LockLevel::COMMAND), &[0xFE, 0xCB, 0xF5, 0xA0, 0x40])]
    fn command_frames(
        #[case] op: fn(&mut GlkDevice<MockPort>) -> Result<()>,
        #[case] frame: &[u8],
    ) {
        let mut lcd = device(&[]);
        op(&mut lcd).unwrap();
        assert_eq!(written(&lcd), frame);
        assert_eq!(write_calls(&lcd), 1);
    }

    #[test]
    fn dump_filesystem_reply() {
        let mut lcd = answering_device(&[&[0x02, 0x00, 0x00, 0x00, 0xAA, 0xBB]]);
        assert_eq!(lcd.dump_filesystem().unwrap(), vec![0xAA, 0xBB]);
        assert_eq!(written(&lcd), &[0xFE, 0x30]);
    }

    #[test]
    fn customer_data_reply() {
        let data: Vec<u8> = (1..=16).collect();
        let mut lcd = answering_device(&[data.as_slice()]);
        assert_eq!(lcd.read_customer_data().unwrap().to_vec(), data);
        assert_eq!(written(&lcd), &[0xFE, 0x35]);
    }

    #[test]
    fn customer_data_is_padded() {
        let mut lcd = device(&[]);
        lcd.write_customer_data(b"abc").unwrap();
        let mut expected = vec![0xFE, 0x34, b'a', b'b', b'c'];
        expected.resize(2 + GLK_CUSTOMER_DATA_SIZE, 0);
        assert_eq!(written(&lcd), expected.as_slice());
    }

    #[test]
    fn led_colors_drive_gpo_pairs() {
        let mut lcd = device(&[]);
        lcd.set_led(2, LedColor::Red, false).unwrap();
        assert_eq!(written(&lcd), &[0xFE, 0x56, 0x03, 0xFE, 0x57, 0x04]);

        let mut lcd = device(&[]);
        lcd.set_led(1, LedColor::Green, true).unwrap();
        assert_eq!(
            written(&lcd),
            &[
                0xFE, 0x57, 0x01, 0xFE, 0xC3, 0x01, 0x01, 0xFE, 0x56, 0x02, 0xFE, 0xC3, 0x02, 0x00
            ]
        );
    }

    #[test]
    fn flow_control_defaults() {
        let mut lcd = device(&[]);
        lcd.set_flow_control(true).unwrap();
        lcd.set_flow_control(false).unwrap();
        assert_eq!(written(&lcd), &[0xFE, 0x3A, 0x00, 0x80, 0xFE, 0x3B]);
    }

    #[test]
    fn trace_hook_sees_both_directions() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut lcd = device(&[0x00, 0x01, 0x00, 0x00]);
        lcd.channel_mut()
            .set_trace_hook(Box::new(move |direction: TraceDirection, bytes: &[u8]| {
                sink.lock().unwrap().push((direction, bytes.to_vec()));
            }));
        lcd.get_free_space().unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], (TraceDirection::Sent, vec![0xFE, 0xAF]));
        let received: Vec<u8> = seen
            .iter()
            .filter(|(d, _)| *d == TraceDirection::Received)
            .flat_map(|(_, b)| b.clone())
            .collect();
        assert_eq!(received, vec![0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn i2c_mode_is_unsupported() {
        let mut lcd = device(&[]);
        lcd.set_transport_mode(TransportMode::I2c);
        assert!(matches!(
            lcd.clear_screen(),
            Err(Error::UnsupportedInMode {
                mode: TransportMode::I2c
            })
        ));
        assert!(lcd.get_version().is_err());
        assert_eq!(write_calls(&lcd), 0);
    }

    #[test]
    fn geometry_limits_coordinates() {
        let mut lcd = device(&[]).with_geometry(DisplayGeometry::GLK12232);
        assert!(lcd.draw_pixel(121, 31).is_ok());
        assert!(lcd.draw_pixel(122, 0).is_err());
        assert_eq!(write_calls(&lcd), 1);
    }
}

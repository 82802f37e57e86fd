use crate::cip::{ConnectionPriority, ConnectionType};
use crate::error::{EipError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Policy used when building Forward Open requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPolicy {
    #[serde(default)]
    pub priority: ConnectionPriority,
    #[serde(default)]
    pub connection_type: ConnectionType,
    /// O->T data has a variable size (default: false)
    #[serde(default)]
    pub o_to_t_variable: bool,
    /// T->O data has a variable size (default: true)
    #[serde(default = "default_true")]
    pub t_to_o_variable: bool,
    #[serde(default)]
    pub shared: bool,
    /// Tick size exponent, tick = 2^n ms (default: 6)
    #[serde(default = "default_timeout_tick_size")]
    pub timeout_tick_size: u8,
    /// Ticks before an unconnected request times out (default: 80)
    #[serde(default = "default_timeout_ticks")]
    pub timeout_ticks: u8,
    /// Connection timeout multiplier code (default: 0, i.e. x4)
    #[serde(default)]
    pub timeout_multiplier: u8,
    /// Transport class and trigger byte (default: 1, class 1 cyclic)
    #[serde(default = "default_transport_trigger")]
    pub transport_trigger: u8,
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        ConnectionPolicy {
            priority: ConnectionPriority::default(),
            connection_type: ConnectionType::default(),
            o_to_t_variable: false,
            t_to_o_variable: default_true(),
            shared: false,
            timeout_tick_size: default_timeout_tick_size(),
            timeout_ticks: default_timeout_ticks(),
            timeout_multiplier: 0,
            transport_trigger: default_transport_trigger(),
        }
    }
}

fn default_true() -> bool { true }
fn default_timeout_tick_size() -> u8 { 6 }
fn default_timeout_ticks() -> u8 { 80 }
fn default_transport_trigger() -> u8 { 1 }

/// Session configuration.
/// Values mirror the wire defaults; every field may be omitted in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Explicit messaging port (default: 44818)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Implicit I/O port (default: 2222)
    #[serde(default = "default_io_port")]
    pub io_port: u16,
    /// Originator vendor ID sent in Forward Open / Close
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    /// Originator serial number sent in Forward Open / Close
    #[serde(default = "default_serial_number")]
    pub serial_number: u32,
    /// Encapsulation protocol version (default: 1)
    #[serde(default = "default_protocol_version")]
    pub protocol_version: u16,
    /// RegisterSession option flags (default: 0)
    #[serde(default)]
    pub register_options: u16,
    /// Timeout field of RR-Data requests (default: 0)
    #[serde(default)]
    pub rr_data_timeout: u16,
    /// Receive buffer size in bytes (default: 4096)
    #[serde(default = "default_receive_buffer_size")]
    pub receive_buffer_size: usize,
    #[serde(default)]
    pub connection: ConnectionPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            port: default_port(),
            io_port: default_io_port(),
            vendor_id: default_vendor_id(),
            serial_number: default_serial_number(),
            protocol_version: default_protocol_version(),
            register_options: 0,
            rr_data_timeout: 0,
            receive_buffer_size: default_receive_buffer_size(),
            connection: ConnectionPolicy::default(),
        }
    }
}

fn default_port() -> u16 { 44818 }
fn default_io_port() -> u16 { 2222 }
fn default_vendor_id() -> u16 { 0x1234 }
fn default_serial_number() -> u32 { 0x5678_9ABC }
fn default_protocol_version() -> u16 { 1 }
fn default_receive_buffer_size() -> usize { 4096 }

impl SessionConfig {
    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: SessionConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // header alone is 24 bytes
        if self.receive_buffer_size < 24 {
            return Err(EipError::Config(format!(
                "receive_buffer_size {} cannot hold an encapsulation header",
                self.receive_buffer_size
            )));
        }
        if self.connection.timeout_multiplier > 7 {
            return Err(EipError::Config(format!(
                "timeout_multiplier {} is out of range 0..=7",
                self.connection.timeout_multiplier
            )));
        }
        Ok(())
    }
}

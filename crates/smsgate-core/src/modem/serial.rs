//! Serial port handling
//!
//! Provides low-level serial port access for the modem link.

use serialport::{SerialPortInfo, SerialPortType};
use std::time::Duration;

use super::channel::SerialChannel;
use super::error::ModemError;

/// Per-read poll timeout. Short so the command engine's own deadline
/// governs the round-trip, not the port.
const PORT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port name (e.g., "/dev/ttyUSB0" or "COM3")
    pub name: String,

    /// Manufacturer name (if available)
    pub manufacturer: Option<String>,

    /// Product name (if available)
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (manufacturer, product) = match info.port_type {
            SerialPortType::UsbPort(usb_info) => (usb_info.manufacturer, usb_info.product),
            _ => (None, None),
        };

        Self {
            name: info.port_name,
            manufacturer,
            product,
        }
    }
}

/// Helper used to sort port names so that:
///  - ttyUSB* ports come first (GSM dongles usually enumerate there), sorted numerically
///  - then ttyACM* ports (sorted numerically)
///  - then other ports (sorted by name)
fn port_sort_key(name: &str) -> (u8, usize, String) {
    let basename = name.rsplit('/').next().unwrap_or(name);
    if let Some(rest) = basename.strip_prefix("ttyUSB") {
        let num = rest.parse::<usize>().unwrap_or(usize::MAX);
        return (0, num, basename.to_string());
    }
    if let Some(rest) = basename.strip_prefix("ttyACM") {
        let num = rest.parse::<usize>().unwrap_or(usize::MAX);
        return (1, num, basename.to_string());
    }
    (2, 0, basename.to_string())
}

/// List available serial ports in deterministic order. Diagnostics only —
/// the gateway never probes ports to find a modem.
pub fn list_ports() -> Vec<PortInfo> {
    let mut ports: Vec<PortInfo> = serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .map(PortInfo::from)
        .collect();
    ports.sort_by_key(|p| port_sort_key(&p.name));
    ports
}

/// Open the modem serial device with 8N1 framing and no flow control
pub fn open_port(device: &str, baud_rate: u32) -> Result<SerialChannel, ModemError> {
    let port = serialport::new(device, baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(PORT_READ_TIMEOUT)
        .open()
        .map_err(|e| ModemError::Serial(e.to_string()))?;

    Ok(SerialChannel::new(port))
}

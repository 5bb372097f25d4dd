use crate::error::PinFinderError;
use crate::serial::CommandPort;

use rppal::uart::{Parity, Uart};
use std::time::Duration;
use tracing::info;

/// Command port on a host UART, 8N1.
pub struct SerialUart {
    uart: Uart,
    device: String,
}

impl SerialUart {
    pub fn open(device: &str, baud_rate: u32) -> Result<Self, PinFinderError> {
        let mut uart = Uart::with_path(device, baud_rate, Parity::None, 8, 1).map_err(|e| {
            PinFinderError::Serial(format!("Failed to open {} at {} baud: {}", device, baud_rate, e))
        })?;
        // min length 0 with no timeout makes read() return immediately
        uart.set_read_mode(0, Duration::ZERO)?;
        uart.set_write_mode(true)?;
        info!("Serial port {} opened at {} baud", device, baud_rate);

        Ok(SerialUart {
            uart,
            device: device.to_string(),
        })
    }
}

impl CommandPort for SerialUart {
    fn read_byte(&mut self) -> Result<Option<u8>, PinFinderError> {
        let mut buf = [0u8; 1];
        match self.uart.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), PinFinderError> {
        let data = format!("{}\r\n", line);
        let mut written = 0;
        while written < data.len() {
            written += self.uart.write(&data.as_bytes()[written..])?;
        }
        Ok(())
    }

    fn get_name(&self) -> String {
        format!("SerialUart({})", self.device)
    }
}

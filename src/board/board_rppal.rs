use crate::board::Board;
use crate::error::PinFinderError;

use rppal::gpio::{Gpio, Level, OutputPin};
use spin_sleep::SpinSleeper;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, info};

/// Board backed by the host's GPIO character device. Callers address pins
/// by shield number; `pin_map` translates them to host GPIO lines.
pub struct BoardRppal {
    gpio: Gpio,
    pin_map: BTreeMap<u8, u8>,
    outputs: HashMap<u8, OutputPin>,
    sleeper: SpinSleeper,
}

impl BoardRppal {
    pub fn new(pin_map: BTreeMap<u8, u8>) -> Result<Self, PinFinderError> {
        let gpio = Gpio::new()?;
        info!("GPIO initialized successfully");
        Ok(BoardRppal {
            gpio,
            pin_map,
            outputs: HashMap::new(),
            // 800us holds are well below the OS scheduler's accuracy, spin for the tail
            sleeper: SpinSleeper::new(100_000),
        })
    }
}

impl Board for BoardRppal {
    fn set_output(&mut self, pin: u8) -> Result<(), PinFinderError> {
        if self.outputs.contains_key(&pin) {
            return Ok(());
        }
        let line = self.pin_map.get(&pin).copied().unwrap_or(pin);
        let mut output = self
            .gpio
            .get(line)
            .map_err(|e| {
                PinFinderError::Gpio(format!("Failed to get GPIO {} (shield pin {}): {}", line, pin, e))
            })?
            .into_output();
        // keep the pin driven after we let go of it, like pinMode on the MCU
        output.set_reset_on_drop(false);
        self.outputs.insert(pin, output);
        debug!("Shield pin {} configured as output on GPIO {}", pin, line);
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), PinFinderError> {
        let output = self
            .outputs
            .get_mut(&pin)
            .ok_or(PinFinderError::PinNotConfigured(pin))?;
        output.write(level);
        Ok(())
    }

    fn delay_us(&mut self, us: u64) {
        self.sleeper.sleep(Duration::from_micros(us));
    }

    fn get_name(&self) -> String {
        "BoardRppal".to_string()
    }
}

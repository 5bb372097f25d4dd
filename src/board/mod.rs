use rppal::gpio::Level;

use crate::error::PinFinderError;

pub mod board_mock;
pub mod board_rppal;

/// Digital outputs plus a blocking delay, the only hardware the pin finder touches.
pub trait Board {
    /// Configures `pin` as a digital output. Calling it again for a pin that is
    /// already an output is a no-op.
    fn set_output(&mut self, pin: u8) -> Result<(), PinFinderError>;

    fn write(&mut self, pin: u8, level: Level) -> Result<(), PinFinderError>;

    /// Blocks the caller for `us` microseconds.
    fn delay_us(&mut self, us: u64);

    fn delay_ms(&mut self, ms: u64) {
        self.delay_us(ms * 1000);
    }

    fn get_name(&self) -> String;
}

impl<T: Board + ?Sized> Board for Box<T> {
    fn set_output(&mut self, pin: u8) -> Result<(), PinFinderError> {
        (**self).set_output(pin)
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), PinFinderError> {
        (**self).write(pin, level)
    }

    fn delay_us(&mut self, us: u64) {
        (**self).delay_us(us)
    }

    fn get_name(&self) -> String {
        (**self).get_name()
    }
}

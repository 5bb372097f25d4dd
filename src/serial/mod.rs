use crate::error::PinFinderError;

pub mod serial_console;
pub mod serial_mock;
pub mod serial_uart;

/// Byte-in, line-out link to the operator.
pub trait CommandPort {
    /// Returns the next received byte, or `None` straight away when nothing is waiting.
    fn read_byte(&mut self) -> Result<Option<u8>, PinFinderError>;

    fn write_line(&mut self, line: &str) -> Result<(), PinFinderError>;

    fn get_name(&self) -> String;
}

impl<T: CommandPort + ?Sized> CommandPort for Box<T> {
    fn read_byte(&mut self) -> Result<Option<u8>, PinFinderError> {
        (**self).read_byte()
    }

    fn write_line(&mut self, line: &str) -> Result<(), PinFinderError> {
        (**self).write_line(line)
    }

    fn get_name(&self) -> String {
        (**self).get_name()
    }
}

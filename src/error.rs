use thiserror::Error;

#[derive(Debug, Error)]
pub enum PinFinderError {
    #[error("GPIO error: {0}")]
    Gpio(String),

    // writes are only valid after set_output()
    #[error("Pin {0} has not been configured as an output")]
    PinNotConfigured(u8),

    #[error("Serial error: {0}")]
    Serial(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<rppal::gpio::Error> for PinFinderError {
    fn from(e: rppal::gpio::Error) -> Self {
        PinFinderError::Gpio(e.to_string())
    }
}

impl From<rppal::uart::Error> for PinFinderError {
    fn from(e: rppal::uart::Error) -> Self {
        PinFinderError::Serial(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PinFinderError::PinNotConfigured(12).to_string(),
            "Pin 12 has not been configured as an output"
        );
        assert_eq!(
            PinFinderError::Serial("port closed".to_string()).to_string(),
            "Serial error: port closed"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such device");
        let err: PinFinderError = io_err.into();
        assert!(matches!(err, PinFinderError::Io(_)));
        assert_eq!(err.to_string(), "no such device");
    }
}

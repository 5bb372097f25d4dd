use crate::error::PinFinderError;
use crate::serial::CommandPort;

use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use tracing::{debug, warn};

/// Command port on the process's stdin/stdout, for running from a terminal.
///
/// Stdin is drained by a reader thread so `read_byte` never blocks the loop.
pub struct SerialConsole {
    rx: Receiver<u8>,
    closed: bool,
}

impl SerialConsole {
    pub fn new() -> Result<Self, PinFinderError> {
        let (tx, rx) = mpsc::channel::<u8>();

        std::thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for byte in stdin.lock().bytes() {
                    match byte {
                        Ok(b) => {
                            if tx.send(b).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Failed to read stdin: {}", e);
                            break;
                        }
                    }
                }
                debug!("stdin reader finished");
            })?;

        Ok(SerialConsole { rx, closed: false })
    }
}

impl CommandPort for SerialConsole {
    fn read_byte(&mut self) -> Result<Option<u8>, PinFinderError> {
        if self.closed {
            return Ok(None);
        }
        match self.rx.try_recv() {
            Ok(b) => Ok(Some(b)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                // EOF on stdin, keep running like a board with nothing plugged into RX
                warn!("stdin closed, no further commands will be received");
                self.closed = true;
                Ok(None)
            }
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), PinFinderError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "SerialConsole".to_string()
    }
}

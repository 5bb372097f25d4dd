use crate::error::PinFinderError;
use crate::serial::CommandPort;

use std::collections::VecDeque;

/// In-memory command port: queued input bytes, captured output lines.
#[derive(Debug, Default)]
pub struct SerialMock {
    input: VecDeque<u8>,
    output: Vec<String>,
    failing_reads: usize,
}

impl SerialMock {
    pub fn new() -> Self {
        SerialMock::default()
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    /// Makes the next `count` reads fail, as a disconnected UART would.
    pub fn fail_reads(&mut self, count: usize) {
        self.failing_reads = count;
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }
}

impl CommandPort for SerialMock {
    fn read_byte(&mut self) -> Result<Option<u8>, PinFinderError> {
        if self.failing_reads > 0 {
            self.failing_reads -= 1;
            return Err(PinFinderError::Serial("device disconnected".to_string()));
        }
        Ok(self.input.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<(), PinFinderError> {
        self.output.push(line.to_string());
        Ok(())
    }

    fn get_name(&self) -> String {
        "SerialMock".to_string()
    }
}

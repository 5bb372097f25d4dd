use crate::board::Board;
use crate::error::PinFinderError;

use rppal::gpio::Level;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    Output(u8),
    Write(u8, Level),
    Delay(u64),
}

/// Simulated board: records every pin operation and delay instead of
/// touching hardware. Delays return immediately.
#[derive(Debug, Default)]
pub struct BoardMock {
    events: Vec<BoardEvent>,
    outputs: BTreeSet<u8>,
    levels: HashMap<u8, Level>,
}

impl BoardMock {
    pub fn new() -> Self {
        BoardMock::default()
    }

    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn is_output(&self, pin: u8) -> bool {
        self.outputs.contains(&pin)
    }

    pub fn outputs(&self) -> Vec<u8> {
        self.outputs.iter().copied().collect()
    }

    pub fn level(&self, pin: u8) -> Option<Level> {
        self.levels.get(&pin).copied()
    }

    /// Number of low-to-high transitions written to `pin` since the last clear.
    pub fn rising_edges(&self, pin: u8) -> usize {
        let mut last = Level::Low;
        let mut count = 0;
        for event in &self.events {
            if let BoardEvent::Write(p, level) = *event {
                if p == pin {
                    if last == Level::Low && level == Level::High {
                        count += 1;
                    }
                    last = level;
                }
            }
        }
        count
    }

    /// Number of writes of any level to `pin` since the last clear.
    pub fn writes_to(&self, pin: u8) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BoardEvent::Write(p, _) if *p == pin))
            .count()
    }

    pub fn total_delay_us(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                BoardEvent::Delay(us) => *us,
                _ => 0,
            })
            .sum()
    }
}

impl Board for BoardMock {
    fn set_output(&mut self, pin: u8) -> Result<(), PinFinderError> {
        self.outputs.insert(pin);
        self.levels.entry(pin).or_insert(Level::Low);
        self.events.push(BoardEvent::Output(pin));
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), PinFinderError> {
        if !self.outputs.contains(&pin) {
            return Err(PinFinderError::PinNotConfigured(pin));
        }
        self.levels.insert(pin, level);
        self.events.push(BoardEvent::Write(pin, level));
        Ok(())
    }

    fn delay_us(&mut self, us: u64) {
        self.events.push(BoardEvent::Delay(us));
    }

    fn get_name(&self) -> String {
        "BoardMock".to_string()
    }
}

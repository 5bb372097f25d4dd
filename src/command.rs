use core::fmt;
use rppal::gpio::Level;

use crate::pins::PIN_CONFIGS;

/// A single-byte operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// '1'..'4': switch to the given pin table entry (zero based) and run.
    SelectConfig(usize),
    /// 'r' / 'R': run again on the current pins.
    Repeat,
    /// 'd' / 'D': flip the direction pin and run.
    ToggleDirection,
}

impl Command {
    /// Decodes one byte from the command port. Anything outside the
    /// command alphabet is `None` and must be dropped without a reply.
    pub fn from_byte(byte: u8) -> Option<Command> {
        match byte {
            b'1'..=b'4' => {
                let index = (byte - b'1') as usize;
                debug_assert!(index < PIN_CONFIGS.len());
                Some(Command::SelectConfig(index))
            }
            b'r' | b'R' => Some(Command::Repeat),
            b'd' | b'D' => Some(Command::ToggleDirection),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SelectConfig(index) => write!(f, "SelectConfig({})", index + 1),
            Command::Repeat => write!(f, "Repeat"),
            Command::ToggleDirection => write!(f, "ToggleDirection"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn toggled(self) -> Direction {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Level the dir pin is driven to for this direction.
    pub fn level(self) -> Level {
        match self {
            Direction::Forward => Level::Low,
            Direction::Reverse => Level::High,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "FORWARD"),
            Direction::Reverse => write!(f, "REVERSE"),
        }
    }
}

/// What the controller is doing right now. Every command starts from and
/// returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Reconfiguring,
    DirectionToggling,
    Running,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

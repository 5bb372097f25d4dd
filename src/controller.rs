use crate::board::Board;
use crate::command::{Command, Direction, Phase};
use crate::error::PinFinderError;
use crate::pins::{
    ENABLE_PIN, PIN_CONFIGS, PinConfiguration, STARTUP_SETTLE_MS, STEP_HALF_PERIOD_US,
    STEPS_PER_RUN,
};
use crate::serial::CommandPort;

use rppal::gpio::Level;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest pause between reads while the command port keeps failing.
pub const MAX_READ_BACKOFF: Duration = Duration::from_secs(1);

/// Mutable state of the pin finder. `step_pin` and `dir_pin` only change
/// through [`ControllerState::apply`], so they always match `config_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    config_index: usize,
    direction: Direction,
    step_pin: u8,
    dir_pin: u8,
    phase: Phase,
}

impl ControllerState {
    pub fn new() -> Self {
        let first = &PIN_CONFIGS[0];
        ControllerState {
            config_index: 0,
            direction: Direction::Forward,
            step_pin: first.step_pin,
            dir_pin: first.dir_pin,
            phase: Phase::Idle,
        }
    }

    /// Selects pin table entry `index`.
    ///
    /// # Panics
    /// If `index` is outside the pin table. Command decoding only ever
    /// produces indices 0..=3.
    pub fn apply(&mut self, index: usize) -> &'static PinConfiguration {
        let config = &PIN_CONFIGS[index];
        self.config_index = index;
        self.step_pin = config.step_pin;
        self.dir_pin = config.dir_pin;
        config
    }

    pub fn config_index(&self) -> usize {
        self.config_index
    }

    pub fn config(&self) -> &'static PinConfiguration {
        &PIN_CONFIGS[self.config_index]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn step_pin(&self) -> u8 {
        self.step_pin
    }

    pub fn dir_pin(&self) -> u8 {
        self.dir_pin
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        ControllerState::new()
    }
}

/// What a single pass of the command loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing was waiting on the port.
    Empty,
    /// A byte outside the command alphabet was consumed and dropped.
    Ignored,
    Handled(Command),
    /// The port reported an error, nothing was consumed.
    ReadFailed,
}

impl PollOutcome {
    pub fn command(self) -> Option<Command> {
        match self {
            PollOutcome::Handled(command) => Some(command),
            _ => None,
        }
    }
}

/// Pause after the `failures`-th consecutive read error: doubles from
/// `idle_poll` (at least 1ms) up to [`MAX_READ_BACKOFF`].
pub fn read_backoff(idle_poll: Duration, failures: u32) -> Duration {
    let base = idle_poll.max(Duration::from_millis(1));
    let shift = failures.saturating_sub(1).min(10);
    base.saturating_mul(1 << shift).min(MAX_READ_BACKOFF)
}

/// Cycles the A-axis step/dir candidates on operator command and pulses
/// the step pin so the operator can watch for motion.
pub struct PinFinder<B: Board, P: CommandPort> {
    board: B,
    port: P,
    state: ControllerState,
    runs: u64,
    read_failures: u32,
}

impl<B: Board, P: CommandPort> PinFinder<B, P> {
    pub fn new(board: B, port: P) -> Self {
        info!(
            "Pin finder using board {} and port {}",
            board.get_name(),
            port.get_name()
        );
        PinFinder {
            board,
            port,
            state: ControllerState::new(),
            runs: 0,
            read_failures: 0,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Number of completed step sequences, including the one run at startup.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Enables the drivers, prints the help banner, then tries config 1 once.
    pub fn setup(&mut self) -> Result<(), PinFinderError> {
        self.board.set_output(ENABLE_PIN)?;
        self.board.write(ENABLE_PIN, Level::Low)?;
        info!("Stepper drivers enabled (pin {} low)", ENABLE_PIN);

        // give the operator's terminal time to attach before the banner
        self.board.delay_ms(STARTUP_SETTLE_MS);

        self.print_banner();
        self.setup_pins(0)?;
        self.run_motor()?;
        self.set_phase(Phase::Idle);
        Ok(())
    }

    fn print_banner(&mut self) {
        self.say("");
        self.say("=== CNC Shield A-axis Pin Finder ===");
        self.say("Commands:");
        for (i, config) in PIN_CONFIGS.iter().enumerate() {
            self.say(&format!("  {} = {}", i + 1, config.short_label));
        }
        self.say("  r = repeat current config");
        self.say("  d = toggle direction");
        self.say("");
        self.say("Starting with config 1...");
    }

    /// Switches to pin table entry `index`, makes both pins outputs and
    /// drives the dir pin low. The direction flag is left as it was.
    pub fn setup_pins(&mut self, index: usize) -> Result<(), PinFinderError> {
        self.set_phase(Phase::Reconfiguring);
        let config = self.state.apply(index);

        self.board.set_output(config.step_pin)?;
        self.board.set_output(config.dir_pin)?;
        self.board.write(config.dir_pin, Level::Low)?;

        info!(
            "Config {} selected: step={}, dir={}",
            index + 1,
            config.step_pin,
            config.dir_pin
        );
        self.say(&format!(
            ">>> Config {}: {}, Step={}, Dir={}",
            index + 1,
            config.label,
            config.step_pin,
            config.dir_pin
        ));
        Ok(())
    }

    /// Pulses the current step pin [`STEPS_PER_RUN`] times, blocking until done.
    pub fn run_motor(&mut self) -> Result<(), PinFinderError> {
        self.set_phase(Phase::Running);
        let step_pin = self.state.step_pin;

        self.say(&format!("Running {} steps...", STEPS_PER_RUN));
        debug!(
            "Pulsing pin {} {} times, direction {}",
            step_pin, STEPS_PER_RUN, self.state.direction
        );

        for _ in 0..STEPS_PER_RUN {
            self.board.write(step_pin, Level::High)?;
            self.board.delay_us(STEP_HALF_PERIOD_US);
            self.board.write(step_pin, Level::Low)?;
            self.board.delay_us(STEP_HALF_PERIOD_US);
        }

        self.runs += 1;
        self.say("Done. Did motor move? Send 1-4 to try other configs, 'r' to repeat.");
        Ok(())
    }

    /// Flips the direction flag and drives the dir pin to match.
    pub fn toggle_direction(&mut self) -> Result<(), PinFinderError> {
        self.set_phase(Phase::DirectionToggling);
        let direction = self.state.direction.toggled();
        self.state.direction = direction;
        self.board.write(self.state.dir_pin, direction.level())?;

        info!("Direction set to {}", direction);
        self.say(&format!("Direction: {}", direction));
        Ok(())
    }

    /// Carries out `command` and returns to `Idle` once all of it is done.
    /// The building blocks above leave the phase where they set it.
    pub fn handle(&mut self, command: Command) -> Result<(), PinFinderError> {
        debug!("Handling command {}", command);
        match command {
            Command::SelectConfig(index) => {
                self.setup_pins(index)?;
                self.run_motor()?;
            }
            Command::Repeat => self.run_motor()?,
            Command::ToggleDirection => {
                self.toggle_direction()?;
                self.run_motor()?;
            }
        }
        self.set_phase(Phase::Idle);
        Ok(())
    }

    /// One pass of the command loop: consumes at most one byte. Returns
    /// immediately when no byte is waiting. Bytes outside the command
    /// alphabet are dropped without any output or log line.
    pub fn poll(&mut self) -> Result<PollOutcome, PinFinderError> {
        let byte = match self.port.read_byte() {
            Ok(read) => {
                if self.read_failures > 0 {
                    info!(
                        "{} readable again after {} failed reads",
                        self.port.get_name(),
                        self.read_failures
                    );
                    self.read_failures = 0;
                }
                match read {
                    Some(b) => b,
                    None => return Ok(PollOutcome::Empty),
                }
            }
            Err(e) => {
                self.read_failures = self.read_failures.saturating_add(1);
                // 1st, 2nd, 4th, 8th... failure in a row
                if self.read_failures.is_power_of_two() {
                    warn!(
                        "Failed to read from {} ({} in a row): {}",
                        self.port.get_name(),
                        self.read_failures,
                        e
                    );
                }
                return Ok(PollOutcome::ReadFailed);
            }
        };

        match Command::from_byte(byte) {
            Some(command) => {
                self.handle(command)?;
                Ok(PollOutcome::Handled(command))
            }
            None => Ok(PollOutcome::Ignored),
        }
    }

    /// Polls once and returns how long the loop should wait before the next
    /// poll: `idle_poll` when the port was empty, nothing when a byte was
    /// consumed, a growing backoff while reads keep failing.
    pub fn step(&mut self, idle_poll: Duration) -> Result<Duration, PinFinderError> {
        let pause = match self.poll()? {
            PollOutcome::Empty => idle_poll,
            PollOutcome::Ignored | PollOutcome::Handled(_) => Duration::ZERO,
            PollOutcome::ReadFailed => read_backoff(idle_poll, self.read_failures),
        };
        Ok(pause)
    }

    /// Runs the command loop until a pin operation fails.
    pub fn run_forever(&mut self, idle_poll: Duration) -> Result<(), PinFinderError> {
        info!("Waiting for commands on {}", self.port.get_name());
        loop {
            let pause = self.step(idle_poll)?;
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.state.phase != phase {
            debug!("Phase {} -> {}", self.state.phase, phase);
            self.state.phase = phase;
        }
    }

    fn say(&mut self, line: &str) {
        if let Err(e) = self.port.write_line(line) {
            warn!("Failed to write to {}: {}", self.port.get_name(), e);
        }
    }
}

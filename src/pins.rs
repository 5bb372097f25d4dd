/// Arduino numbering for the shield's analog header, A0..A5.
pub const A0: u8 = 14;
pub const A1: u8 = 15;
pub const A3: u8 = 17;
pub const A4: u8 = 18;
pub const A5: u8 = 19;

/// Stepper driver enable line shared by all axes (D8, active low).
pub const ENABLE_PIN: u8 = 8;

pub const STEPS_PER_RUN: u32 = 400;
pub const STEP_HALF_PERIOD_US: u64 = 800;
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const STARTUP_SETTLE_MS: u64 = 1000;

/// A candidate step/dir wiring for the A axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfiguration {
    pub step_pin: u8,
    pub dir_pin: u8,
    pub label: &'static str,
    pub short_label: &'static str,
}

/// Wirings seen on CNC Shield v3 clones, most common first.
pub const PIN_CONFIGS: [PinConfiguration; 4] = [
    PinConfiguration {
        step_pin: A0,
        dir_pin: A1,
        label: "A0/A1 (Analog 0,1)",
        short_label: "A0/A1",
    },
    PinConfiguration {
        step_pin: 12,
        dir_pin: 13,
        label: "D12/D13",
        short_label: "D12/D13",
    },
    PinConfiguration {
        step_pin: A3,
        dir_pin: A4,
        label: "A3/A4 (Analog 3,4)",
        short_label: "A3/A4",
    },
    // shares A4 with config 3; these are also the I2C pins, so rarely used
    PinConfiguration {
        step_pin: A4,
        dir_pin: A5,
        label: "A4/A5 (Analog 4,5)",
        short_label: "A4/A5",
    },
];

pub mod board;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod pins;
pub mod serial;
pub mod utils;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::board::Board;
use crate::board::board_mock::BoardMock;
use crate::board::board_rppal::BoardRppal;
use crate::config::{AppConfig, BoardConfig, SerialConfig};
use crate::error::PinFinderError;
use crate::serial::CommandPort;
use crate::serial::serial_console::SerialConsole;
use crate::serial::serial_mock::SerialMock;
use crate::serial::serial_uart::SerialUart;

pub use crate::controller::PinFinder;

pub type DynBoard = Box<dyn Board>;
pub type DynPort = Box<dyn CommandPort>;

pub fn configure_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                EnvFilter::new("info") // Default log level if not set
            }),
        )
        .with_thread_ids(false)
        .with_thread_names(false)
        // stdout may be the command port, keep logs off it
        .with_writer(std::io::stderr)
        .init();
}

pub fn init_board(board_config: &BoardConfig) -> Result<DynBoard, PinFinderError> {
    match board_config.board_type.as_str() {
        "BoardRppal" => Ok(Box::new(BoardRppal::new(board_config.pin_map.clone())?)),
        "BoardMock" => Ok(Box::new(BoardMock::new())),
        _ => Err(PinFinderError::Config(format!(
            "Unsupported board type '{}'",
            board_config.board_type
        ))),
    }
}

pub fn init_port(serial_config: &SerialConfig) -> Result<DynPort, PinFinderError> {
    match serial_config.port_type.as_str() {
        "SerialUart" => Ok(Box::new(SerialUart::open(
            &serial_config.device,
            serial_config.baud_rate,
        )?)),
        "SerialConsole" => Ok(Box::new(SerialConsole::new()?)),
        "SerialMock" => Ok(Box::new(SerialMock::new())),
        _ => Err(PinFinderError::Config(format!(
            "Unsupported serial port type '{}'",
            serial_config.port_type
        ))),
    }
}

/// Builds the pin finder described by `app_config`. Pin assignments are
/// checked before any GPIO or serial device is opened.
pub fn build_pin_finder(app_config: &AppConfig) -> Result<PinFinder<DynBoard, DynPort>, PinFinderError> {
    info!(
        "Starting a-axis-pin-finder, version: {}",
        env!("CARGO_PKG_VERSION")
    );
    app_config.validate()?;
    let board = init_board(&app_config.board)?;
    let port = init_port(&app_config.serial)?;
    Ok(PinFinder::new(board, port))
}

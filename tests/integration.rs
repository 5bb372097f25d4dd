use a_axis_pin_finder::PinFinder;
use a_axis_pin_finder::board::board_mock::BoardMock;
use a_axis_pin_finder::command::{Command, Direction, Phase};
use a_axis_pin_finder::pins::{ENABLE_PIN, PIN_CONFIGS};
use a_axis_pin_finder::serial::serial_mock::SerialMock;
use regex::Regex;
use rppal::gpio::Level;
use std::time::Duration;

fn setup() -> PinFinder<BoardMock, SerialMock> {
    let mut finder = PinFinder::new(BoardMock::new(), SerialMock::new());
    finder.setup().unwrap();
    finder
}

fn send(finder: &mut PinFinder<BoardMock, SerialMock>, bytes: &[u8]) -> Vec<Option<Command>> {
    finder.port_mut().push_input(bytes);
    let mut handled = Vec::new();
    while finder.port().pending_input() > 0 {
        handled.push(finder.poll().unwrap().command());
    }
    handled
}

#[test]
fn test_startup_runs_config_one() {
    let finder = setup();

    assert_eq!(finder.state().config_index(), 0);
    assert_eq!(finder.state().config().label, "A0/A1 (Analog 0,1)");
    assert_eq!(finder.board().rising_edges(14), 400);
    assert_eq!(finder.board().outputs(), vec![ENABLE_PIN, 14, 15]);
    assert_eq!(finder.state().phase(), Phase::Idle);
}

#[test]
fn test_end_to_end_scenario() {
    let mut finder = setup();
    finder.board_mut().clear_events();
    finder.port_mut().take_output();

    // switch to D12/D13
    let handled = send(&mut finder, b"2");
    assert_eq!(handled, vec![Some(Command::SelectConfig(1))]);
    assert_eq!(finder.state().config_index(), 1);
    assert_eq!(finder.board().rising_edges(12), 400);
    assert_eq!(finder.board().level(13), Some(Level::Low));

    let output = finder.port_mut().take_output();
    assert_eq!(
        output,
        vec![
            ">>> Config 2: D12/D13, Step=12, Dir=13".to_string(),
            "Running 400 steps...".to_string(),
            "Done. Did motor move? Send 1-4 to try other configs, 'r' to repeat.".to_string(),
        ]
    );

    // flip direction, same pins
    finder.board_mut().clear_events();
    let handled = send(&mut finder, b"d");
    assert_eq!(handled, vec![Some(Command::ToggleDirection)]);
    assert_eq!(finder.state().direction(), Direction::Reverse);
    assert_eq!(finder.board().level(13), Some(Level::High));
    assert_eq!(finder.board().rising_edges(12), 400);
    assert_eq!(finder.board().writes_to(13), 1);

    let output = finder.port_mut().take_output();
    assert_eq!(output.first().map(String::as_str), Some("Direction: REVERSE"));
    assert_eq!(finder.runs(), 3);
}

#[test]
fn test_mixed_input_only_acts_on_commands() {
    let mut finder = setup();
    finder.board_mut().clear_events();

    let handled = send(&mut finder, b"x4\nR");
    assert_eq!(
        handled,
        vec![None, Some(Command::SelectConfig(3)), None, Some(Command::Repeat)]
    );
    let config = PIN_CONFIGS[3];
    assert_eq!(finder.board().rising_edges(config.step_pin), 800);
    assert_eq!(finder.state().step_pin(), config.step_pin);
    assert_eq!(finder.state().dir_pin(), config.dir_pin);
}

#[test]
fn test_status_line_format() {
    let mut finder = setup();
    send(&mut finder, b"1234");

    let re = Regex::new(r"^>>> Config [1-4]: .+, Step=\d+, Dir=\d+$").unwrap();
    let status_lines: Vec<&String> = finder
        .port()
        .output()
        .iter()
        .filter(|line| line.starts_with(">>>"))
        .collect();

    // one from startup plus one per digit
    assert_eq!(status_lines.len(), 5);
    for line in status_lines {
        assert!(re.is_match(line), "Unexpected status line: {}", line);
    }
}

#[test]
fn test_loop_does_not_pause_between_queued_bytes() {
    let mut finder = setup();
    let idle = Duration::from_millis(5);

    finder.port_mut().push_input(b"\r\nd");
    let pauses: Vec<Duration> = (0..4).map(|_| finder.step(idle).unwrap()).collect();

    assert_eq!(pauses, vec![Duration::ZERO, Duration::ZERO, Duration::ZERO, idle]);
    assert_eq!(finder.state().direction(), Direction::Reverse);
    assert_eq!(finder.state().phase(), Phase::Idle);
}

//! Integration tests driving real child processes.

use expectcore::{ExpectError, ProcessSpawnable};
use std::time::Duration;

fn echo_command(text: &str) -> ProcessSpawnable {
    if cfg!(windows) {
        ProcessSpawnable::with_args("cmd", ["/C".to_string(), format!("echo {text}")])
    } else {
        ProcessSpawnable::with_args("echo", [text.to_string()])
    }
}

#[test]
fn matches_output_of_a_spawned_process() {
    let mut session = expectcore::spawn(echo_command("Hello World")).unwrap();

    let result = session.expect("Hello", |_| {}).unwrap();

    assert_eq!(result.matched, "Hello");
}

#[test]
fn regex_pattern_extracts_from_real_output() {
    let mut session = expectcore::spawn(echo_command("Number: 12345")).unwrap();

    let result = session.expect(r"\d+", |_| {}).unwrap();

    assert_eq!(result.matched, "12345");
    assert!(result.before.contains("Number"));
}

#[test]
fn stderr_shares_the_match_window() {
    if cfg!(windows) {
        return;
    }
    let mut session =
        expectcore::spawn(ProcessSpawnable::with_args("sh", ["-c", "echo oops 1>&2"])).unwrap();

    let result = session.expect("oops", |_| {}).unwrap();

    assert_eq!(result.matched, "oops");
}

#[test]
fn send_and_expect_roundtrip() {
    if cfg!(windows) {
        return;
    }
    let mut session = expectcore::spawn(ProcessSpawnable::new("cat")).unwrap();
    session.set_timeout_ms(5000).unwrap();

    session.send("hello expect\n").unwrap();
    let first = session.expect("hello expect", |_| {}).unwrap();
    assert_eq!(first.matched, "hello expect");

    session.send("second line\n").unwrap();
    let second = session.expect("second line", |_| {}).unwrap();
    assert_eq!(second.matched, "second line");
}

#[tokio::test]
async fn async_send_and_expect_roundtrip() {
    if cfg!(windows) {
        return;
    }
    let mut session = expectcore::spawn(ProcessSpawnable::new("cat")).unwrap();
    session.set_timeout_ms(5000).unwrap();

    session.send("ping\n").unwrap();
    let result = session.expect_async("ping", |_| {}).await.unwrap();

    assert_eq!(result.matched, "ping");
}

#[test]
fn silent_process_times_out() {
    if cfg!(windows) {
        return;
    }
    let mut session = expectcore::spawn(ProcessSpawnable::new("cat")).unwrap();
    session.set_timeout_ms(200).unwrap();
    let mut called = false;

    let err = session.expect("NEVER_APPEARS", |_| called = true).unwrap_err();

    assert!(matches!(
        err,
        ExpectError::Timeout { duration } if duration == Duration::from_millis(200)
    ));
    assert!(!called);
}

#[test]
fn stale_output_is_discarded_before_a_write() {
    if cfg!(windows) {
        return;
    }
    // "early" is produced but never consumed by an expect call; the next
    // write must discard it rather than prepend it to the next match window.
    let mut session =
        expectcore::spawn(ProcessSpawnable::with_args("sh", ["-c", "echo early && cat"])).unwrap();
    session.set_timeout_ms(5000).unwrap();
    std::thread::sleep(Duration::from_millis(300));

    session.send("fresh\n").unwrap();
    let result = session.expect("fresh", |_| {}).unwrap();

    assert_eq!(result.matched, "fresh");
    assert!(!result.before.contains("early"));
}

#[test]
fn spawn_fails_synchronously_for_empty_command() {
    let err = expectcore::spawn(ProcessSpawnable::new("")).unwrap_err();
    assert!(matches!(err, ExpectError::Spawn(_)));
}

#[test]
fn spawn_fails_for_unknown_program() {
    let err =
        expectcore::spawn(ProcessSpawnable::new("definitely_not_a_real_command_12345")).unwrap_err();
    assert!(matches!(err, ExpectError::Spawn(_)));
}

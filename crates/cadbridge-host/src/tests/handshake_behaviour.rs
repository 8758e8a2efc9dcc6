//! Behavioural tests for the host version gate.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

use cadbridge_protocol::{BRIDGE_VERSION, CommandResult};

use super::support::{HealthEvent, RecordingHealthReporter, ServiceHarness};

struct HandshakeWorld {
    reporter: Arc<RecordingHealthReporter>,
    harness: Option<ServiceHarness>,
    results: Vec<CommandResult>,
}

impl HandshakeWorld {
    fn send_operation(&mut self, operation: &str) {
        let harness = self.harness.as_ref().expect("service started");
        let result = harness.send(&json!({"operation": operation}));
        self.results.push(result);
    }
}

#[fixture]
fn world() -> RefCell<HandshakeWorld> {
    RefCell::new(HandshakeWorld {
        reporter: Arc::new(RecordingHealthReporter::default()),
        harness: None,
        results: Vec::new(),
    })
}

#[given("a host reporting version {version}")]
fn given_host_version(world: &RefCell<HandshakeWorld>, version: u32) {
    let mut world = world.borrow_mut();
    let reporter = Arc::clone(&world.reporter);
    world.harness = Some(ServiceHarness::start_with_reporter(version, reporter));
}

#[when("the client requests {operation}")]
fn when_client_requests(world: &RefCell<HandshakeWorld>, operation: String) {
    world.borrow_mut().send_operation(&operation);
}

#[then("the version info reports host version {version}")]
fn then_version_info(world: &RefCell<HandshakeWorld>, version: u32) {
    let world = world.borrow();
    let result = world.results.last().expect("result");
    let data = result.data().expect("version payload");
    assert_eq!(data["host_version"], version);
    assert_eq!(data["bridge_version"], BRIDGE_VERSION);
}

#[then("every result is an incompatibility error")]
fn then_all_incompatible(world: &RefCell<HandshakeWorld>) {
    let world = world.borrow();
    assert!(!world.results.is_empty());
    for result in &world.results {
        let message = result.message().unwrap_or_default();
        assert!(!result.is_ok(), "expected error, got {result:?}");
        assert!(message.contains("incompatible host"), "unexpected {message}");
    }
}

#[then("the version check was reported once as {verdict}")]
fn then_version_reported(world: &RefCell<HandshakeWorld>, verdict: String) {
    let world = world.borrow();
    let checks: Vec<bool> = world
        .reporter
        .events()
        .into_iter()
        .filter_map(|event| match event {
            HealthEvent::VersionChecked { compatible, .. } => Some(compatible),
            _ => None,
        })
        .collect();
    assert_eq!(checks, vec![verdict == "compatible"]);
}

#[scenario(
    path = "tests/features/version_handshake.feature",
    name = "A supported host reports its versions"
)]
fn supported_host_scenario(#[from(world)] world: RefCell<HandshakeWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/version_handshake.feature",
    name = "An outdated host rejects every operation"
)]
fn outdated_host_scenario(#[from(world)] world: RefCell<HandshakeWorld>) {
    drop(world);
}

//! Shared helpers for client tests.

mod fake_bridge;

use std::net::TcpListener;

pub(super) use fake_bridge::FakeBridge;

/// Returns a loopback port that nothing is listening on.
pub(super) fn closed_port() -> u16 {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
    listener.local_addr().expect("ephemeral address").port()
}

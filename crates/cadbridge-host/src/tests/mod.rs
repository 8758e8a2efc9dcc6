//! Test suites for the command service.

mod handshake_behaviour;
mod support;

//! Shared harness running a real service over an in-memory host.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

use cadbridge_config::ServiceEndpoint;
use cadbridge_protocol::CommandResult;

use crate::dispatch::DispatchTable;
use crate::health::HealthReporter;
use crate::host::{HostThread, InMemoryModel};
use crate::service::{CommandService, RunningService, ServiceError};

const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// A running command service bound to an ephemeral loopback port.
pub(crate) struct ServiceHarness {
    running: Option<RunningService>,
    host: Option<HostThread>,
    address: SocketAddr,
}

impl ServiceHarness {
    pub(crate) fn start(host_version: u32) -> Self {
        Self::start_with_reporter(host_version, Arc::new(RecordingHealthReporter::default()))
    }

    pub(crate) fn start_with_reporter(
        host_version: u32,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        let (handle, host) = HostThread::spawn(16, move || InMemoryModel::new(host_version))
            .expect("spawn host thread");
        let running = CommandService::new(DispatchTable::standard().expect("table"), handle)
            .with_reporter(reporter)
            .with_io_timeout(CLIENT_TIMEOUT)
            .start(&ServiceEndpoint::loopback(0))
            .expect("start service");
        let address = running.local_addr();
        Self {
            running: Some(running),
            host: Some(host),
            address,
        }
    }

    pub(crate) fn address(&self) -> SocketAddr {
        self.address
    }

    /// Stops accepting without waiting for the accept loop.
    pub(crate) fn stop(&self) {
        if let Some(running) = &self.running {
            running.stop();
        }
    }

    /// Sends raw bytes as one request and returns the response line.
    pub(crate) fn send_raw(&self, request: &[u8]) -> String {
        exchange(self.address, request)
    }

    /// Sends a JSON command and decodes the result.
    pub(crate) fn send(&self, request: &Value) -> CommandResult {
        let mut frame = serde_json::to_vec(request).expect("encode request");
        frame.push(b'\n');
        decode(&self.send_raw(&frame))
    }
}

impl Drop for ServiceHarness {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.join();
        }
        if let Some(host) = self.host.take() {
            let _ = host.join();
        }
    }
}

/// Performs one request/response exchange against `address`.
pub(crate) fn exchange(address: SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(address).expect("connect");
    stream
        .set_read_timeout(Some(CLIENT_TIMEOUT))
        .expect("set read timeout");
    stream.write_all(request).expect("write request");
    stream.shutdown(Shutdown::Write).expect("half close");
    let mut line = String::new();
    BufReader::new(stream)
        .read_line(&mut line)
        .expect("read response");
    line
}

pub(crate) fn decode(line: &str) -> CommandResult {
    serde_json::from_str(line.trim_end()).expect("decode result")
}

/// Lifecycle event captured by [`RecordingHealthReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HealthEvent {
    Starting,
    Ready(SocketAddr),
    Failed,
    Stopped(SocketAddr),
    VersionChecked { host_version: u32, compatible: bool },
}

/// Reporter that keeps every event for later assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    pub(crate) fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Polls until the service reports its bound address.
    pub(crate) fn wait_until_ready(&self) -> SocketAddr {
        let deadline = Instant::now() + CLIENT_TIMEOUT;
        loop {
            let ready = self.events().into_iter().find_map(|event| match event {
                HealthEvent::Ready(addr) => Some(addr),
                _ => None,
            });
            if let Some(addr) = ready {
                return addr;
            }
            assert!(Instant::now() < deadline, "service never became ready");
            thread::sleep(Duration::from_millis(10));
        }
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn service_starting(&self, _endpoint: &ServiceEndpoint) {
        self.record(HealthEvent::Starting);
    }

    fn service_ready(&self, local_addr: SocketAddr) {
        self.record(HealthEvent::Ready(local_addr));
    }

    fn service_failed(&self, _error: &ServiceError) {
        self.record(HealthEvent::Failed);
    }

    fn service_stopped(&self, local_addr: SocketAddr) {
        self.record(HealthEvent::Stopped(local_addr));
    }

    fn host_version_checked(&self, host_version: u32, compatible: bool) {
        self.record(HealthEvent::VersionChecked {
            host_version,
            compatible,
        });
    }
}

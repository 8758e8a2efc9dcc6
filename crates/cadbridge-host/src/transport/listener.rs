//! Accept loop for the command service socket.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use cadbridge_config::ServiceEndpoint;

use super::{ConnectionHandler, LISTENER_TARGET, ListenerError};

/// Sleep between polls when no client is waiting.
const IDLE_POLL: Duration = Duration::from_millis(25);
/// Sleep after a failed `accept`.
const FAILURE_PAUSE: Duration = Duration::from_millis(150);

/// A bound, not yet serving, service socket.
#[derive(Debug)]
pub(crate) struct SocketListener {
    endpoint: ServiceEndpoint,
    socket: TcpListener,
    local_addr: SocketAddr,
}

impl SocketListener {
    pub(crate) fn bind(endpoint: &ServiceEndpoint) -> Result<Self, ListenerError> {
        let addr = endpoint.resolve().map_err(|source| ListenerError::Resolve {
            host: endpoint.host().to_owned(),
            port: endpoint.port(),
            source,
        })?;
        let socket =
            TcpListener::bind(addr).map_err(|source| ListenerError::Bind { addr, source })?;
        let local_addr = socket.local_addr().map_err(|source| ListenerError::Socket {
            step: "read the bound address",
            source,
        })?;
        Ok(Self {
            endpoint: endpoint.clone(),
            socket,
            local_addr,
        })
    }

    /// Address actually bound, which differs from the endpoint for port 0.
    pub(crate) fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Moves the socket onto a listener thread.
    ///
    /// Clients are served one after another on that thread, each with
    /// `io_timeout` applied to its reads and writes.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
        io_timeout: Duration,
    ) -> Result<ListenerHandle, ListenerError> {
        self.socket
            .set_nonblocking(true)
            .map_err(|source| ListenerError::Socket {
                step: "enable non-blocking accepts",
                source,
            })?;
        let stop = Arc::new(AtomicBool::new(false));
        let Self {
            endpoint,
            socket,
            local_addr,
        } = self;
        let socket = Arc::new(Mutex::new(Some(socket)));
        let accept_loop = AcceptLoop {
            endpoint,
            local_addr,
            socket: Arc::clone(&socket),
            stop: Arc::clone(&stop),
            handler,
            io_timeout,
        };
        let thread = thread::Builder::new()
            .name("cadbridge-listener".to_owned())
            .spawn(move || accept_loop.run())
            .map_err(|source| ListenerError::Spawn { source })?;
        Ok(ListenerHandle {
            stop,
            socket,
            thread: Some(thread),
        })
    }
}

/// Listening socket shared by the accept loop and its handle.
///
/// `None` once the socket has been closed.
type SocketSlot = Arc<Mutex<Option<TcpListener>>>;

fn lock_slot(slot: &Mutex<Option<TcpListener>>) -> MutexGuard<'_, Option<TcpListener>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owner of a running listener thread.
///
/// Dropping the handle requests a stop without waiting for it.
#[derive(Debug)]
pub(crate) struct ListenerHandle {
    stop: Arc<AtomicBool>,
    socket: SocketSlot,
    thread: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    /// Closes the listening socket at once, so new clients are refused.
    ///
    /// The exchange in progress, if any, still runs to completion on the
    /// listener thread.
    pub(crate) fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
        if lock_slot(&self.socket).take().is_some() {
            debug!(target: LISTENER_TARGET, "listening socket closed");
        }
    }

    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        thread.join().map_err(|_| ListenerError::ThreadPanic)
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct AcceptLoop {
    endpoint: ServiceEndpoint,
    local_addr: SocketAddr,
    socket: SocketSlot,
    stop: Arc<AtomicBool>,
    handler: Arc<dyn ConnectionHandler>,
    io_timeout: Duration,
}

impl AcceptLoop {
    fn run(self) {
        info!(
            target: LISTENER_TARGET,
            endpoint = %self.endpoint,
            local_addr = %self.local_addr,
            "accepting bridge connections"
        );
        // Repeated failures of the same kind are logged once.
        let mut reported = None::<io::ErrorKind>;
        while !self.stop.load(Ordering::SeqCst) {
            match self.poll() {
                Ok(Some((stream, peer))) => {
                    reported = None;
                    debug!(target: LISTENER_TARGET, %peer, "serving connection");
                    self.handler.handle(stream);
                }
                Ok(None) => thread::sleep(IDLE_POLL),
                Err(error) => {
                    if reported != Some(error.kind()) {
                        warn!(target: LISTENER_TARGET, %error, "accept failed");
                        reported = Some(error.kind());
                    }
                    thread::sleep(FAILURE_PAUSE);
                }
            }
        }
        info!(
            target: LISTENER_TARGET,
            endpoint = %self.endpoint,
            "stopped accepting bridge connections"
        );
    }

    /// Takes the next waiting client, if any, and switches it to blocking
    /// I/O bounded by the exchange timeout.
    fn poll(&self) -> io::Result<Option<(TcpStream, SocketAddr)>> {
        let accepted = match lock_slot(&self.socket).as_ref() {
            Some(socket) => socket.accept(),
            None => return Ok(None),
        };
        let (stream, peer) = match accepted {
            Ok(accepted) => accepted,
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(None),
            Err(error) => return Err(error),
        };
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(self.io_timeout))?;
        stream.set_write_timeout(Some(self.io_timeout))?;
        Ok(Some((stream, peer)))
    }
}

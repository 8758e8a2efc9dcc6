//! Fake command service for client tests.
//!
//! Accepts one connection per canned response, records each request line,
//! and answers with the matching response line. A silent bridge records the
//! request and then holds the connection open without answering.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

const ACCEPT_DEADLINE: Duration = Duration::from_secs(5);

pub(in crate::tests) struct FakeBridge {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    held: Arc<Mutex<Vec<TcpStream>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeBridge {
    /// Spawns a bridge on an ephemeral port.
    pub(in crate::tests) fn spawn(responses: Vec<String>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake bridge")?;
        Self::serve(listener, responses.into_iter().map(Some).collect())
    }

    /// Spawns a bridge on a specific port.
    pub(in crate::tests) fn spawn_on(port: u16, responses: Vec<String>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port)).context("bind fake bridge")?;
        Self::serve(listener, responses.into_iter().map(Some).collect())
    }

    /// Spawns a bridge that reads `connections` requests and never answers.
    ///
    /// The connections stay open until the bridge is dropped.
    pub(in crate::tests) fn spawn_silent(connections: usize) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake bridge")?;
        Self::serve(listener, vec![None; connections])
    }

    fn serve(listener: TcpListener, replies: Vec<Option<String>>) -> Result<Self> {
        listener
            .set_nonblocking(true)
            .context("fake bridge nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let held = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let holding = Arc::clone(&held);
        let handle =
            thread::spawn(move || Self::serve_clients(&listener, &replies, &recorded, &holding));
        Ok(Self {
            port,
            requests,
            held,
            handle: Some(handle),
        })
    }

    pub(in crate::tests) fn port(&self) -> u16 {
        self.port
    }

    /// Requests recorded so far, without waiting for the bridge to finish.
    pub(in crate::tests) fn recorded(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Waits for the bridge to finish and returns the recorded requests.
    pub(in crate::tests) fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake bridge thread panicked"))?
                .context("fake bridge failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_clients(
        listener: &TcpListener,
        replies: &[Option<String>],
        requests: &Mutex<Vec<String>>,
        held: &Mutex<Vec<TcpStream>>,
    ) -> Result<()> {
        for reply in replies {
            let Some(stream) = Self::accept(listener)? else {
                return Ok(());
            };
            let stream = Self::record(stream, requests)?;
            match reply {
                Some(response) => Self::answer(stream, response)?,
                None => held
                    .lock()
                    .map_err(|error| anyhow!("lock held streams: {error}"))?
                    .push(stream),
            }
        }
        Ok(())
    }

    fn accept(listener: &TcpListener) -> Result<Option<TcpStream>> {
        let deadline = Instant::now() + ACCEPT_DEADLINE;
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    stream.set_nonblocking(false).context("blocking stream")?;
                    return Ok(Some(stream));
                }
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                // No client arrived; tests that expect fewer exchanges do not hang.
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn record(stream: TcpStream, requests: &Mutex<Vec<String>>) -> Result<TcpStream> {
        let mut line = String::new();
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        reader.read_line(&mut line).context("read request")?;
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(line);
        Ok(stream)
    }

    fn answer(stream: TcpStream, response: &str) -> Result<()> {
        let mut writer = stream;
        writer
            .write_all(response.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush())
            .context("write response")
    }
}

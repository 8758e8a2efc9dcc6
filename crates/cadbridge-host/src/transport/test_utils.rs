//! Connection handlers used by the listener tests.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::ConnectionHandler;

/// Echoes the first line of every connection and counts connections served.
///
/// A connection that sends nothing, or times out, is still counted.
#[derive(Debug, Default)]
pub(crate) struct LineEchoHandler {
    served: AtomicUsize,
}

impl LineEchoHandler {
    pub(crate) fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

impl ConnectionHandler for LineEchoHandler {
    fn handle(&self, stream: TcpStream) {
        let mut line = String::new();
        let mut reader = BufReader::new(&stream);
        if matches!(reader.read_line(&mut line), Ok(read) if read > 0) {
            let mut writer = &stream;
            let _ = writer.write_all(line.as_bytes());
        }
        self.served.fetch_add(1, Ordering::SeqCst);
    }
}

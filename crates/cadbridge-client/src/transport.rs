//! A single request/response exchange over TCP.

use std::io;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use cadbridge_protocol::{
    Command, CommandResult, FrameError, decode_frame, read_frame, write_frame,
};

use crate::errors::ClientError;
use crate::retry::is_transient;

/// Outcome of one failed attempt.
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// Worth retrying: the bridge is not listening or did not answer in time.
    Transient(io::Error),
    /// Retrying would not help.
    Fatal(ClientError),
}

/// Connects, writes one command frame, and reads one result frame.
pub(crate) fn exchange(
    address: SocketAddr,
    timeout: Duration,
    command: &Command,
) -> Result<CommandResult, AttemptError> {
    let mut stream = TcpStream::connect_timeout(&address, timeout)
        .map_err(|error| classify_io(address, error))?;
    stream
        .set_read_timeout(Some(timeout))
        .and_then(|()| stream.set_write_timeout(Some(timeout)))
        .map_err(|error| classify_io(address, error))?;

    write_frame(&mut stream, command).map_err(|error| classify_frame(address, error))?;
    let frame = read_frame(&mut stream)
        .map_err(|error| classify_frame(address, error))?
        .ok_or_else(|| {
            AttemptError::Fatal(ClientError::Transport {
                address,
                source: FrameError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "bridge closed the connection without a result",
                )),
            })
        })?;
    decode_frame(&frame).map_err(|error| AttemptError::Fatal(error.into()))
}

fn classify_io(address: SocketAddr, error: io::Error) -> AttemptError {
    if is_transient(&error) {
        AttemptError::Transient(error)
    } else {
        AttemptError::Fatal(ClientError::Transport {
            address,
            source: FrameError::Io(error),
        })
    }
}

fn classify_frame(address: SocketAddr, error: FrameError) -> AttemptError {
    match error {
        FrameError::Io(source) => classify_io(address, source),
        other => AttemptError::Fatal(ClientError::Transport {
            address,
            source: other,
        }),
    }
}

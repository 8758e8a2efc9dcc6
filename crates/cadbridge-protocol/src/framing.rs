//! Newline-delimited JSON framing.
//!
//! Each message is one compact JSON document followed by `\n`. Compact
//! serialization never emits a raw newline, so the delimiter cannot appear
//! inside a frame. Readers cap a frame at [`MAX_FRAME_BYTES`].

use std::io::{self, Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{FrameError, ProtocolError};

/// Maximum size of a single frame in bytes.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Serializes `message` as one frame and flushes the writer.
///
/// # Errors
///
/// Returns `FrameError::Serialize` when the message cannot be encoded and
/// `FrameError::Io` when the write fails.
pub fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<(), FrameError>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

/// Reads one frame from `reader`.
///
/// Returns `Ok(None)` when the peer closes the stream before sending any
/// byte. A stream that ends after some bytes but without a newline yields
/// those bytes as the frame. Bytes after the first newline are discarded;
/// each connection carries a single exchange.
///
/// # Errors
///
/// Returns `FrameError::TooLarge` once more than [`MAX_FRAME_BYTES`] arrive
/// without a newline, and `FrameError::Io` for read failures, including
/// timeouts.
pub fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, FrameError>
where
    R: Read + ?Sized,
{
    read_frame_with_limit(reader, MAX_FRAME_BYTES)
}

pub(crate) fn read_frame_with_limit<R>(
    reader: &mut R,
    max_size: usize,
) -> Result<Option<Vec<u8>>, FrameError>
where
    R: Read + ?Sized,
{
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];

    loop {
        let bytes_read = read_with_retry(reader, &mut chunk)?;
        if bytes_read == 0 {
            return Ok(if buffer.is_empty() {
                None
            } else {
                Some(buffer)
            });
        }

        let received = chunk.get(..bytes_read).unwrap_or_default();
        if let Some(newline_pos) = received.iter().position(|b| *b == b'\n') {
            buffer.extend_from_slice(received.get(..=newline_pos).unwrap_or_default());
            enforce_limit(buffer.len(), max_size)?;
            return Ok(Some(buffer));
        }

        buffer.extend_from_slice(received);
        enforce_limit(buffer.len(), max_size)?;
    }
}

/// Decodes a frame into `T`, ignoring the trailing delimiter.
///
/// # Errors
///
/// Returns `ProtocolError::Malformed` when the frame is empty or does not
/// decode as `T`.
pub fn decode_frame<T: DeserializeOwned>(frame: &[u8]) -> Result<T, ProtocolError> {
    let text = frame.trim_ascii_end();
    if text.is_empty() {
        return Err(ProtocolError::malformed("empty frame"));
    }
    serde_json::from_slice(text).map_err(ProtocolError::from_json_error)
}

fn read_with_retry<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

fn enforce_limit(size: usize, max_size: usize) -> Result<(), FrameError> {
    if size > max_size {
        return Err(FrameError::TooLarge { size, max_size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::{Command, CommandResult, Success};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn written_frames_end_with_a_single_newline() {
        let mut output = Vec::new();
        write_frame(&mut output, &json!({"text": "line\nbreak"})).expect("write");
        assert_eq!(output.iter().filter(|b| **b == b'\n').count(), 1);
        assert_eq!(output.last(), Some(&b'\n'));
    }

    #[test]
    fn reads_exactly_one_frame() {
        let mut input = Cursor::new(b"{\"operation\":\"ping\"}\n{\"operation\":\"other\"}\n".to_vec());
        let frame = read_frame(&mut input).expect("read").expect("frame");
        let command: Command = decode_frame(&frame).expect("decode");
        assert_eq!(command.operation(), "ping");
    }

    #[test]
    fn clean_eof_yields_none() {
        let mut input = Cursor::new(Vec::new());
        assert!(read_frame(&mut input).expect("read").is_none());
    }

    #[test]
    fn unterminated_frame_is_returned_at_eof() {
        let mut input = Cursor::new(br#"{"status":"ok"}"#.to_vec());
        let frame = read_frame(&mut input).expect("read").expect("frame");
        let result: CommandResult = decode_frame(&frame).expect("decode");
        assert!(result.is_ok());
    }

    #[test]
    fn oversized_frames_are_rejected() {
        let mut input = Cursor::new(vec![b'x'; 64]);
        let error = read_frame_with_limit(&mut input, 16).expect_err("limit");
        assert!(matches!(error, FrameError::TooLarge { max_size: 16, .. }));
    }

    #[test]
    fn decode_rejects_blank_frames() {
        assert!(matches!(
            decode_frame::<Value>(b"\n"),
            Err(ProtocolError::Malformed { .. })
        ));
    }

    #[rstest]
    #[case::beam(Command {
        operation: "create_beam".to_owned(),
        args: object(json!({
            "p1": [0.0, -1.5, 2.25],
            "p2": [4.0, -1.5, 2.25],
            "p3": [0.0, -1.5, 3.25],
            "width": 0.125,
            "height": 0.25,
            "name": "Sparren"
        })),
    })]
    #[case::mixed(Command {
        operation: "get_user_attributes".to_owned(),
        args: object(json!({
            "element_id": 42,
            "flags": [true, false, null],
            "nested": {"points": [[1, 2, 3], [-4.5, 0.5, 6]], "label": ""}
        })),
    })]
    #[case::bare(Command::new("ping"))]
    fn commands_survive_a_frame(#[case] command: Command) {
        let mut wire = Vec::new();
        write_frame(&mut wire, &command).expect("write");
        let frame = read_frame(&mut Cursor::new(wire)).expect("read").expect("frame");
        assert_eq!(Command::parse(&frame).expect("parse"), command);
    }

    #[rstest]
    #[case::created(CommandResult::ok(Success::new().with_id(17).with_name("Beam 17")))]
    #[case::with_data(CommandResult::ok(Success::new().with_data(json!({
        "host_version": 31,
        "bridge_version": "0.1.0",
        "ids": [3, 5, 8]
    }))))]
    #[case::failed(CommandResult::error("element 9 not found"))]
    fn results_survive_a_frame(#[case] result: CommandResult) {
        let mut wire = Vec::new();
        write_frame(&mut wire, &result).expect("write");
        let frame = read_frame(&mut Cursor::new(wire)).expect("read").expect("frame");
        let decoded: CommandResult = decode_frame(&frame).expect("decode");
        assert_eq!(decoded, result);
        assert_eq!(decoded.status(), result.status());
        assert_eq!(decoded.message(), result.message());
    }
}

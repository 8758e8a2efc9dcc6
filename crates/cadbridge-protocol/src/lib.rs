//! Wire types shared by the command service and the bridge client.
//!
//! A request is a single [`Command`] naming an operation and carrying a JSON
//! object of arguments. Every request receives exactly one [`CommandResult`].
//! Both travel as one JSON document per line over a loopback TCP connection;
//! see [`framing`] for the line discipline.

mod args;
mod command;
mod error;
pub mod framing;
pub mod operations;
mod result;
mod version;

pub use args::{CreateBeamArgs, ElementIdArgs, NoArgs, Point3};
pub use command::{Command, decode_args};
pub use error::{FrameError, ProtocolError};
pub use framing::{MAX_FRAME_BYTES, decode_frame, read_frame, write_frame};
pub use result::{CommandResult, Failure, Status, Success};
pub use version::{BRIDGE_VERSION, MIN_HOST_VERSION, VersionInfo, is_compatible};

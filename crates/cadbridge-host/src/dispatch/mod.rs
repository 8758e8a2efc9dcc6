//! Operation dispatch for the command service.
//!
//! Each connection carries one JSONL [`Command`](cadbridge_protocol::Command)
//! and receives one JSONL [`CommandResult`](cadbridge_protocol::CommandResult):
//!
//! ```json
//! {"operation":"create_beam","args":{"p1":[0,0,0],"p2":[10,0,0],"width":0.2,"height":0.3}}
//! {"status":"ok","id":1,"name":"Beam 1","msg":null}
//! ```
//!
//! The [`DispatchTable`] maps operation names to handlers. A handler turns
//! the raw argument map into a typed record on the socket thread and returns
//! a [`PreparedCall`] that the host-safe context executes. Every failure on
//! the way, from framing to a panicking host call, is turned into an `error`
//! result so the accept loop never sees it.

mod errors;
mod handler;
mod handshake;
mod operations;
mod table;

pub use self::errors::{DispatchError, RegistrationError};
pub(crate) use self::handler::CommandConnectionHandler;
pub use self::operations::UNSAVED_MODEL_NAME;
pub use self::table::{DispatchTable, DispatchTableBuilder, Handler, PreparedCall};

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

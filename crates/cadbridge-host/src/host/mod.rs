//! The host application's state and the thread that is allowed to touch it.
//!
//! Host state lives behind [`HostModel`] and is driven exclusively from the
//! host-safe context: whichever thread owns the [`HostPump`]. Socket threads
//! hold a [`HostHandle`] and submit work through a bounded FIFO, so at most
//! one job runs against the model at any instant and jobs run in arrival
//! order.

mod errors;
mod executor;
mod memory;
mod model;

pub use errors::{ExecutorError, HostError};
pub use executor::{
    DEFAULT_QUEUE_CAPACITY, HostHandle, HostPump, HostThread, host_queue,
};
pub use memory::InMemoryModel;
pub use model::{ElementInfo, ElementKind, HostModel, StandardAttributes};

pub(crate) const HOST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::host");

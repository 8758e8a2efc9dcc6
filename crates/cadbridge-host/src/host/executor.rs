//! Bounded FIFO hand-off from socket threads to the host-safe context.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use super::HOST_TARGET;
use super::errors::ExecutorError;
use super::model::HostModel;

/// Queue depth used by the standalone host.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

type HostJob = Box<dyn FnOnce(&mut dyn HostModel) + Send>;

/// Creates a bounded queue feeding the host-safe context.
///
/// A full queue blocks the submitting thread rather than the host.
#[must_use]
pub fn host_queue(capacity: usize) -> (HostHandle, HostPump) {
    let (sender, receiver) = mpsc::sync_channel(capacity);
    (HostHandle { sender }, HostPump { receiver })
}

/// Submits jobs to the host-safe context.
///
/// Handles are cheap to clone and may be shared between threads.
#[derive(Clone)]
pub struct HostHandle {
    sender: SyncSender<HostJob>,
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("HostHandle").finish_non_exhaustive()
    }
}

impl HostHandle {
    /// Runs `job` on the host-safe context and blocks until it finishes.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::Closed` when the pump has gone away and
    /// `ExecutorError::Panicked` when the job panicked.
    pub fn call<F, R>(&self, job: F) -> Result<R, ExecutorError>
    where
        F: FnOnce(&mut dyn HostModel) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        let wrapped: HostJob = Box::new(move |model| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(model)))
                .map_err(|payload| panic_message(payload.as_ref()));
            if let Err(message) = &outcome {
                warn!(target: HOST_TARGET, %message, "host job panicked");
            }
            if reply_tx.send(outcome).is_err() {
                debug!(target: HOST_TARGET, "caller stopped waiting for host job");
            }
        });
        self.sender
            .send(wrapped)
            .map_err(|_| ExecutorError::Closed)?;
        match reply_rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(ExecutorError::Panicked { message }),
            Err(_) => Err(ExecutorError::Closed),
        }
    }
}

/// Consumer side of the queue, owned by the host-safe context.
pub struct HostPump {
    receiver: Receiver<HostJob>,
}

impl fmt::Debug for HostPump {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("HostPump").finish_non_exhaustive()
    }
}

impl HostPump {
    /// Runs every job queued so far and returns how many ran.
    ///
    /// Suited to hosts that poll from an idle or timer callback on their
    /// main thread.
    pub fn run_pending(&self, model: &mut dyn HostModel) -> usize {
        let mut executed = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job(&mut *model);
            executed += 1;
        }
        executed
    }

    /// Runs jobs until every [`HostHandle`] has been dropped.
    pub fn run(&self, model: &mut dyn HostModel) {
        for job in &self.receiver {
            job(&mut *model);
        }
    }
}

/// A dedicated thread acting as the host-safe context.
///
/// The model is built on the thread itself, so it never crosses threads.
#[derive(Debug)]
pub struct HostThread {
    thread: JoinHandle<()>,
}

impl HostThread {
    /// Spawns the host thread and returns a handle for submitting work.
    ///
    /// The thread exits once every clone of the returned handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::Thread` when the OS refuses to spawn a thread.
    pub fn spawn<F, M>(capacity: usize, factory: F) -> Result<(HostHandle, Self), ExecutorError>
    where
        F: FnOnce() -> M + Send + 'static,
        M: HostModel + 'static,
    {
        let (handle, pump) = host_queue(capacity);
        let thread = thread::Builder::new()
            .name("cadbridge-host".to_owned())
            .spawn(move || {
                let mut model = factory();
                info!(
                    target: HOST_TARGET,
                    host_version = model.host_version(),
                    "host context running"
                );
                pump.run(&mut model);
                info!(target: HOST_TARGET, "host context stopped");
            })
            .map_err(|error| ExecutorError::Thread {
                message: error.to_string(),
            })?;
        Ok((handle, Self { thread }))
    }

    /// Waits for the host thread to exit.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::Thread` when the thread itself panicked.
    pub fn join(self) -> Result<(), ExecutorError> {
        self.thread.join().map_err(|payload| ExecutorError::Thread {
            message: panic_message(payload.as_ref()),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::host::InMemoryModel;

    #[test]
    fn run_pending_drains_jobs_in_arrival_order() {
        let (handle, pump) = host_queue(8);
        let order = Arc::new(Mutex::new(Vec::new()));
        let workers: Vec<_> = (0..3)
            .map(|index| {
                let handle = handle.clone();
                let order = Arc::clone(&order);
                // Submit sequentially so the expected order is deterministic.
                let worker = thread::spawn(move || {
                    handle
                        .call(move |_| order.lock().expect("order lock").push(index))
                        .expect("job runs");
                });
                while pump_once(&pump) == 0 {
                    thread::yield_now();
                }
                worker
            })
            .collect();
        for worker in workers {
            worker.join().expect("worker");
        }
        assert_eq!(*order.lock().expect("order lock"), vec![0, 1, 2]);
    }

    fn pump_once(pump: &HostPump) -> usize {
        let mut model = InMemoryModel::default();
        pump.run_pending(&mut model)
    }

    #[test]
    fn panicking_job_is_reported_and_pump_survives() {
        let (handle, thread) = HostThread::spawn(4, InMemoryModel::default).expect("spawn");
        let error = handle
            .call::<_, ()>(|_| panic!("boom"))
            .expect_err("panic must surface");
        assert_eq!(
            error,
            ExecutorError::Panicked {
                message: "boom".to_owned()
            }
        );
        let version = handle.call(|model| model.host_version()).expect("pump alive");
        assert!(version > 0);
        drop(handle);
        thread.join().expect("host thread exits");
    }

    #[test]
    fn calls_fail_once_pump_is_gone() {
        let (handle, pump) = host_queue(1);
        drop(pump);
        assert_eq!(handle.call(|_| ()), Err(ExecutorError::Closed));
    }
}

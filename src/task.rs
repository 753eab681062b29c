//! One-shot background tasks.
//!
//! Image reads and mesh loads run on their own worker thread and deliver a
//! single value. The owner polls with [`OneShot::poll`] from its event loop;
//! nothing is ever cancelled.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::StudioError;

/// The receiving end of a task that produces exactly one value.
#[derive(Debug)]
pub struct OneShot<T> {
    receiver: Receiver<T>,
}

/// Outcome of polling a [`OneShot`].
#[derive(Debug, PartialEq, Eq)]
pub enum Poll<T> {
    Ready(T),
    Pending,
}

impl<T: Send + 'static> OneShot<T> {
    /// Runs `job` on a new thread.
    pub fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may be gone if the owner was dropped first.
            let _ = sender.send(job());
        });
        Self { receiver }
    }

    /// A task that is already complete.
    pub fn ready(value: T) -> Self {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(value);
        Self { receiver }
    }

    /// Checks for the result without blocking.
    ///
    /// Returns an error if the worker died without sending.
    pub fn poll(&self) -> Result<Poll<T>, StudioError> {
        match self.receiver.try_recv() {
            Ok(value) => Ok(Poll::Ready(value)),
            Err(TryRecvError::Empty) => Ok(Poll::Pending),
            Err(TryRecvError::Disconnected) => Err(StudioError::TaskDropped),
        }
    }

    /// Blocks until the result arrives.
    pub fn wait(self) -> Result<T, StudioError> {
        self.receiver.recv().map_err(|_| StudioError::TaskDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_task_polls_immediately() {
        let task = OneShot::ready(7);
        assert_eq!(task.poll().unwrap(), Poll::Ready(7));
    }

    #[test]
    fn spawned_task_delivers_once() {
        let task = OneShot::spawn(|| "done");
        assert_eq!(task.wait().unwrap(), "done");
    }

    #[test]
    fn pending_until_worker_sends() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let task = OneShot::spawn(move || {
            gate_rx.recv().unwrap();
            42
        });
        assert_eq!(task.poll().unwrap(), Poll::Pending);
        gate_tx.send(()).unwrap();
        assert_eq!(task.wait().unwrap(), 42);
    }

    #[test]
    fn panicking_worker_reports_dropped() {
        let task: OneShot<u8> = OneShot::spawn(|| panic!("boom"));
        assert!(matches!(task.wait(), Err(StudioError::TaskDropped)));
    }
}

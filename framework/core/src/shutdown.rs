use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tokio::sync::watch;

/// The single flag that decides whether the demo should keep running.
///
/// Cloning a [RunState] gives another handle to the same flag. The flag starts out `true` and
/// moves to `false` exactly once, either when the load phases finish or when the user interrupts
/// the run. It is never set back to `true`.
#[derive(Debug, Clone)]
pub struct RunState {
    inner: Arc<RunStateInner>,
}

#[derive(Debug)]
struct RunStateInner {
    running: Mutex<bool>,
    stopped: Condvar,
    sender: watch::Sender<bool>,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RunStateInner {
                running: Mutex::new(true),
                stopped: Condvar::new(),
                sender: watch::channel(true).0,
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.inner.running.lock()
    }

    /// Clear the running flag.
    ///
    /// Returns `true` for the call that performed the transition and `false` for every call after
    /// that, so callers can tell whether they were the ones to stop the run.
    pub fn stop(&self) -> bool {
        let mut running = self.inner.running.lock();
        if !*running {
            return false;
        }
        *running = false;
        drop(running);

        self.inner.stopped.notify_all();
        // Nobody may be subscribed yet, `send_replace` updates the value regardless.
        self.inner.sender.send_replace(false);
        log::debug!("Run state cleared");

        true
    }

    /// Block the calling thread for up to `duration`, waking early if the run is stopped.
    ///
    /// Returns whether the run is still active once the pause is over. Loops should use this for
    /// their inter-iteration delay and exit when it returns `false`.
    pub fn pause(&self, duration: Duration) -> bool {
        let mut running = self.inner.running.lock();
        if *running {
            self.inner
                .stopped
                .wait_while_for(&mut running, |running| *running, duration);
        }
        *running
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.inner.sender.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Point in time check. Unlike a one-shot signal this keeps returning `true` once the run has
    /// been stopped, so it is safe to poll from a loop condition.
    pub fn should_shutdown(&self) -> bool {
        !*self.receiver.borrow()
    }

    /// Wait until the run is stopped. Resolves immediately if it already has been.
    ///
    /// It is safe to race this with another future so that stopping the run cancels work in
    /// progress.
    pub async fn wait_for_shutdown(&mut self) {
        // An error means the sender is gone, which can only happen once every RunState handle has
        // been dropped. Treat that the same as a stop.
        let _ = self.receiver.wait_for(|running| !*running).await;
    }
}

#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct ShutdownSignalError {
    msg: String,
}

impl Default for ShutdownSignalError {
    fn default() -> Self {
        Self {
            msg: "Execution cancelled by shutdown signal".to_string(),
        }
    }
}

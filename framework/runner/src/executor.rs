use std::future::Future;

use click_demo_core::prelude::{RunState, ShutdownSignalError};

#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
    run_state: RunState,
}

impl Executor {
    pub fn new(runtime: tokio::runtime::Runtime, run_state: RunState) -> Self {
        Self { runtime, run_state }
    }

    /// Run async code in place, blocking until it completes.
    ///
    /// The future is not started once the run has been stopped, and is cancelled if the run is
    /// stopped while it is in flight. Either way a [ShutdownSignalError] is returned. May be
    /// called from several threads at once.
    pub fn execute_in_place<T>(
        &self,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        let mut shutdown_listener = self.run_state.listener();
        if shutdown_listener.should_shutdown() {
            return Err(anyhow::anyhow!(ShutdownSignalError::default()));
        }

        self.runtime.block_on(async move {
            tokio::select! {
                result = fut => result,
                _ = shutdown_listener.wait_for_shutdown() => {
                    Err(anyhow::anyhow!(ShutdownSignalError::default()))
                },
            }
        })
    }

    /// Submit async code to be run in the background.
    ///
    /// The future is not cancelled when the run is stopped, it is dropped with the runtime.
    pub fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        self.runtime.spawn(fut);
    }
}

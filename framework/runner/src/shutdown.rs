use click_demo_core::prelude::RunState;
use tokio::signal;

use crate::executor::Executor;

/// Stop the run when the user presses Ctrl-C.
///
/// Once this is installed the process no longer exits on the signal, the loops see the cleared
/// [RunState] and wind down on their own.
pub fn start_interrupt_listener(executor: &Executor, run_state: RunState) {
    executor.spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                if run_state.stop() {
                    log::info!("Received interrupt signal, shutting down...");
                }
            }
            Err(e) => {
                log::error!("Failed to listen for interrupt signal: {e:?}");
            }
        }
    });
}

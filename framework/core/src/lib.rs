mod shutdown;

pub mod prelude {
    pub use crate::shutdown::{RunState, ShutdownListener, ShutdownSignalError};
}

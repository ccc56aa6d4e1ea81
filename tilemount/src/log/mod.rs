//! Logging abstraction layer.
//!
//! Library components log through the [`Logger`] trait instead of calling
//! `tracing` directly, so the filesystem core can be exercised in tests
//! with a silent or recording logger.
//!
//! - [`TracingLogger`]: forwards to the `tracing` crate
//! - [`NoOpLogger`]: discards everything
//! - [`MemoryLogger`]: keeps messages in memory for assertions
//!
//! ```
//! use tilemount::log::{Logger, NoOpLogger};
//! use tilemount::{log_debug, log_info};
//! use std::sync::Arc;
//!
//! struct Mounter {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Mounter {
//!     fn mount(&self, path: &str) {
//!         log_info!(self.logger, "Mounting at {}", path);
//!         log_debug!(self.logger, "Mounted");
//!     }
//! }
//!
//! Mounter { logger: Arc::new(NoOpLogger) }.mount("/mnt/tiles");
//! ```

mod logger;
mod memory;
mod sinks;

pub use logger::{LogLevel, Logger};
pub use memory::MemoryLogger;
pub use sinks::{NoOpLogger, TracingLogger};

//! # Event listeners.
//!
//! ## Listener types
//! - [`Listen`] synchronous observer, called in registration order on the
//!   delivering thread
//! - [`Subscribe`] asynchronous observer, driven by a [`QueuedListener`] worker
//! - [`LogWriter`] built-in listener writing events to `tracing`
//!
//! ```text
//! EventBus::emit(&Event)
//!   ├──► listener #1 .on_event()          (sync)
//!   ├──► LogWriter   .on_event() ─► tracing
//!   └──► QueuedListener .on_event() ─► [queue] ─► worker ─► Subscribe::on_event().await
//! ```

mod listen;
mod log;
mod queued;

pub use listen::Listen;
pub use log::LogWriter;
pub use queued::{QueuedListener, Subscribe};

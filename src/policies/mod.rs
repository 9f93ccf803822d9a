//! Crash-recovery policies.
//!
//! ## Contents
//! - [`RestartPolicy`] when to restart the pool after a fatal failure
//! - [`Recovery`] the decision produced for one failure event
//!
//! ## Quick wiring
//! ```text
//! ServiceConfig { restart: RestartPolicy, .. }
//!      └─► Service::on_event(PoolFailure)
//!           └─► restart.decide(stopping) ─► Restart | Escalate | Ignore
//! ```

mod restart;

pub use restart::{Recovery, RestartPolicy};

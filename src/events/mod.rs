//! Runtime events: types, fan-out bus and delivery sink.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload
//! - [`EventBus`] ordered, panic-isolated fan-out to listeners
//! - [`EventSink`] handle given to the pool and the bridge
//!
//! ## Quick reference
//! - **Publishers**: the worker pool, the bridging handler, and `Service` itself
//!   (shutdown and recovery events).
//! - **Consumers**: listeners registered with `Service::add_listener`, then the
//!   service's restart policy.

mod bus;
mod event;
mod sink;

pub use bus::EventBus;
pub use event::{Event, EventKind};
pub use sink::EventSink;

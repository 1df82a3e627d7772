//! Event converters: raw event + container → optional update.
//!
//! Both converters apply their mutation through a
//! [`BlockUpdater`](crate::BlockUpdater) and describe the effect as an
//! [`EventHandlerUpdate`]. They never fail across their boundary: an event
//! that is unknown or can't be applied yields `None` and leaves the container
//! untouched.

mod inner;
mod local;

pub use inner::InnerConverter;
pub use local::LocalConverter;

use crate::error::ContainerError;
use crate::update::EventHandlerUpdate;

/// Turn an updater result into the event's update, logging a drop.
fn applied(
    subject: &'static str,
    result: Result<(), ContainerError>,
    update: impl FnOnce() -> EventHandlerUpdate,
) -> Option<EventHandlerUpdate> {
    match result {
        Ok(()) => Some(update()),
        Err(e) => {
            tracing::warn!(subject, error = %e, "event not applicable, dropped");
            None
        }
    }
}

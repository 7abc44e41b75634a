//! Sensors: the listeners through which an agent perceives events.
//!
//! - `Sensor` -- a cloneable callback handle, compared by identity
//! - `registry` -- `SensorRegistry` with per-type and global listener lists

pub mod registry;

use std::fmt;
use std::sync::Arc;

use sensorium_types::error::SensorError;
use sensorium_types::event::Event;

pub use registry::{Delivery, SensorRegistry};

type SensorFn = dyn Fn(&Event) -> Result<(), SensorError> + Send + Sync;

/// A registered event listener.
///
/// Two `Sensor` values are "the same callback" only if one was cloned from
/// the other, which is what `off` / `off_any` match on. Keep a clone of the
/// handle you registered if you intend to remove it later.
#[derive(Clone)]
pub struct Sensor {
    callback: Arc<SensorFn>,
}

impl Sensor {
    /// Wrap a fallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Event) -> Result<(), SensorError> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Wrap a callback that cannot fail.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self::new(move |event| {
            callback(event);
            Ok(())
        })
    }

    /// Identity comparison (same registration handle).
    pub fn same_as(&self, other: &Sensor) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }

    pub(crate) fn sense(&self, event: &Event) -> Result<(), SensorError> {
        (self.callback)(event)
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("ptr", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

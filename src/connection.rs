//! Connection contract consumed from the event-loop engine
//!
//! The engine owns the real connection type. This module only names the
//! setters the lifecycle hook needs, the callback shapes stored on a
//! connection, and the per-connection [`Context`] value.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Request handler invoked by the engine for each readable connection
pub type OnRequest =
    Arc<dyn Fn(&Context, &mut dyn Connection) -> anyhow::Result<()> + Send + Sync>;

/// Per-connection preparation callback
///
/// Both the caller-supplied callback and the lifecycle hook produced by
/// [`Options::prepare`](crate::Options::prepare) have this type.
pub type OnPrepare = Arc<dyn Fn(&mut dyn Connection) -> Context + Send + Sync>;

/// A connection accepted by the engine
pub trait Connection: Send {
    /// Install the dispatch target for subsequent reads
    fn set_on_request(&mut self, on_request: OnRequest);

    /// Set the read timeout. Zero means no timeout.
    fn set_read_timeout(&mut self, timeout: Duration);

    /// Set the idle timeout. Zero means no timeout.
    fn set_idle_timeout(&mut self, timeout: Duration);
}

type Values = HashMap<&'static str, Arc<dyn Any + Send + Sync>>;

/// Value associated with a connection for its lifetime
///
/// A context is immutable; [`Context::with_value`] derives a new one.
#[derive(Clone, Default)]
pub struct Context {
    values: Option<Arc<Values>>,
}

impl Context {
    /// The empty context returned when no preparation callback is configured
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Whether this is the empty background context
    #[must_use]
    pub fn is_background(&self) -> bool {
        self.values.is_none()
    }

    /// Derive a context that also carries `value` under `key`
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(&self, key: &'static str, value: T) -> Self {
        let mut values = self.values.as_deref().cloned().unwrap_or_default();
        values.insert(key, Arc::new(value));

        Self {
            values: Some(Arc::new(values)),
        }
    }

    /// Look up a value by key, returning `None` if absent or of another type
    pub fn value<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.as_ref()?.get(key)?.downcast_ref::<T>()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.values {
            None => f.write_str("Context::Background"),
            Some(values) => {
                let mut keys: Vec<_> = values.keys().collect();
                keys.sort();
                f.debug_struct("Context").field("keys", &keys).finish()
            }
        }
    }
}

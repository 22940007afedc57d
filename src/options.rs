//! Event loop options and the connection preparation wrapper
//!
//! Options are deferred mutations folded, in caller order, over a zero-valued
//! [`Options`]. The last option touching a field wins. Once resolved, options
//! are read-only and can be projected into the lifecycle hook the engine calls
//! for every accepted connection.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::connection::{Connection, Context, OnPrepare, OnRequest};

/// A single deferred change to the event loop [`Options`]
pub struct LoopOption {
    apply: Box<dyn FnOnce(&mut Options) + Send>,
}

impl LoopOption {
    fn new(apply: impl FnOnce(&mut Options) + Send + 'static) -> Self {
        Self {
            apply: Box::new(apply),
        }
    }

    pub(crate) fn apply(self, options: &mut Options) {
        (self.apply)(options);
    }
}

impl fmt::Debug for LoopOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopOption").finish_non_exhaustive()
    }
}

/// Register a callback run on every new connection after its handler and
/// timeouts are installed
///
/// The callback may override per-connection settings; its [`Context`] becomes
/// the connection's context.
#[must_use]
pub fn with_on_prepare(on_prepare: OnPrepare) -> LoopOption {
    LoopOption::new(move |options| options.on_prepare = Some(on_prepare))
}

/// Set the read timeout of connections
#[must_use]
pub fn with_read_timeout(timeout: Duration) -> LoopOption {
    LoopOption::new(move |options| options.read_timeout = timeout)
}

/// Set the idle timeout of connections
#[must_use]
pub fn with_idle_timeout(timeout: Duration) -> LoopOption {
    LoopOption::new(move |options| options.idle_timeout = timeout)
}

/// Resolved event loop options
#[derive(Clone, Default)]
pub struct Options {
    on_prepare: Option<OnPrepare>,
    read_timeout: Duration,
    idle_timeout: Duration,
}

impl Options {
    /// Fold `options` over the defaults in iteration order
    pub fn resolve<I>(options: I) -> Self
    where
        I: IntoIterator<Item = LoopOption>,
    {
        let mut resolved = Self::default();
        let mut applied = 0_usize;

        for option in options {
            option.apply(&mut resolved);
            applied += 1;
        }

        debug!(
            "Resolved {} loop options: read_timeout={:?}, idle_timeout={:?}, on_prepare={}",
            applied,
            resolved.read_timeout,
            resolved.idle_timeout,
            resolved.on_prepare.is_some()
        );

        resolved
    }

    /// Read timeout applied to every connection
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Idle timeout applied to every connection
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Caller-supplied preparation callback, if any
    #[must_use]
    pub fn on_prepare(&self) -> Option<&OnPrepare> {
        self.on_prepare.as_ref()
    }

    /// Build the lifecycle hook for `on_request`
    ///
    /// The hook installs `on_request` and both timeouts on the connection,
    /// then runs the preparation callback and returns its context. Without a
    /// callback it returns [`Context::background`]. The hook owns a snapshot
    /// of these options and is safe to call concurrently.
    #[must_use]
    pub fn prepare(&self, on_request: OnRequest) -> OnPrepare {
        let options = self.clone();

        Arc::new(move |connection: &mut dyn Connection| {
            connection.set_on_request(Arc::clone(&on_request));
            connection.set_read_timeout(options.read_timeout);
            connection.set_idle_timeout(options.idle_timeout);

            match &options.on_prepare {
                Some(on_prepare) => on_prepare(connection),
                None => Context::background(),
            }
        })
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("on_prepare", &self.on_prepare.is_some())
            .field("read_timeout", &self.read_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

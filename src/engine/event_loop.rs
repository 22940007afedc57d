//! Event loop service constructor

use std::sync::Arc;

use tracing::info;

use crate::connection::{Connection, Context, OnPrepare, OnRequest};
use crate::options::{LoopOption, Options};

use super::PollerState;

/// Event loop service owning the resolved options and lifecycle hook
pub struct EventLoop {
    options: Options,
    on_prepare: OnPrepare,
    poller: Arc<PollerState>,
}

impl EventLoop {
    /// Create an event loop
    ///
    /// `options` are resolved here, once, and cannot change afterwards.
    pub fn new<I>(poller: Arc<PollerState>, on_request: OnRequest, options: I) -> Self
    where
        I: IntoIterator<Item = LoopOption>,
    {
        let options = Options::resolve(options);
        let on_prepare = options.prepare(on_request);

        Self {
            options,
            on_prepare,
            poller,
        }
    }

    /// Start serving; closes the poller tuning window
    pub fn start(&self) {
        self.poller.start();
        info!(
            "Event loop started (read_timeout={:?}, idle_timeout={:?})",
            self.options.read_timeout(),
            self.options.idle_timeout()
        );
    }

    /// Prepare a newly accepted connection
    ///
    /// Must be called once per connection, before any read is dispatched.
    pub fn accept(&self, connection: &mut dyn Connection) -> Context {
        (self.on_prepare)(connection)
    }

    /// The lifecycle hook handed to the accept path
    #[must_use]
    pub fn lifecycle_hook(&self) -> OnPrepare {
        Arc::clone(&self.on_prepare)
    }

    /// Resolved options
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Poller settings shared with the tuning handle
    #[must_use]
    pub fn poller(&self) -> &Arc<PollerState> {
        &self.poller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{with_idle_timeout, with_on_prepare, with_read_timeout};
    use crate::tuning::{PollerTuning, Tuning};
    use crate::PollconfError;
    use std::time::Duration;

    #[derive(Default)]
    struct TestConnection {
        on_request: Option<OnRequest>,
        read_timeout: Duration,
        idle_timeout: Duration,
    }

    impl Connection for TestConnection {
        fn set_on_request(&mut self, on_request: OnRequest) {
            self.on_request = Some(on_request);
        }

        fn set_read_timeout(&mut self, timeout: Duration) {
            self.read_timeout = timeout;
        }

        fn set_idle_timeout(&mut self, timeout: Duration) {
            self.idle_timeout = timeout;
        }
    }

    fn handler() -> OnRequest {
        Arc::new(|_ctx: &Context, _conn: &mut dyn Connection| Ok(()))
    }

    #[test]
    fn test_caller_options_override_library_defaults() {
        // A wrapper applies its own default before forwarding caller options
        let caller = vec![with_read_timeout(Duration::from_secs(2))];
        let options = std::iter::once(with_read_timeout(Duration::from_secs(60))).chain(caller);

        let event_loop = EventLoop::new(Arc::new(PollerState::new(4)), handler(), options);

        assert_eq!(event_loop.options().read_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_accept_prepares_connection() {
        let on_prepare: OnPrepare =
            Arc::new(|_conn: &mut dyn Connection| Context::background().with_value("peer", "a"));
        let event_loop = EventLoop::new(
            Arc::new(PollerState::new(4)),
            handler(),
            [
                with_read_timeout(Duration::from_secs(5)),
                with_idle_timeout(Duration::from_secs(30)),
                with_on_prepare(on_prepare),
            ],
        );

        let mut conn = TestConnection::default();
        let ctx = event_loop.accept(&mut conn);

        assert!(conn.on_request.is_some());
        assert_eq!(conn.read_timeout, Duration::from_secs(5));
        assert_eq!(conn.idle_timeout, Duration::from_secs(30));
        assert_eq!(ctx.value::<&str>("peer"), Some(&"a"));
    }

    #[test]
    fn test_start_closes_tuning() {
        let poller = Arc::new(PollerState::new(4));
        let tuning = Tuning::new(Arc::clone(&poller));
        tuning.set_num_loops(2).unwrap();

        let event_loop =
            EventLoop::new(Arc::clone(&poller), handler(), Vec::<LoopOption>::new());
        event_loop.start();

        assert!(event_loop.poller().is_started());
        assert_eq!(event_loop.poller().num_loops(), 2);
        assert!(matches!(
            tuning.set_num_loops(3),
            Err(PollconfError::TuningClosed)
        ));
        assert!(matches!(
            poller.disable_dispatch_pool(),
            Err(PollconfError::TuningClosed)
        ));
    }

    #[test]
    fn test_lifecycle_hook_is_shared() {
        let event_loop = EventLoop::new(
            Arc::new(PollerState::new(4)),
            handler(),
            Vec::<LoopOption>::new(),
        );

        let hook = event_loop.lifecycle_hook();
        let mut conn = TestConnection::default();

        assert!(hook(&mut conn).is_background());
        assert!(conn.on_request.is_some());
    }
}

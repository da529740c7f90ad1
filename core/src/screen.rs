//! A screen is one loop instance wired with exactly two feedback units: the
//! screen's own effect and the re-injection of events sent by the host.

use std::fmt;

use tokio::sync::mpsc;

use crate::feedback::Feedback;
use crate::system::{StateStream, System};

pub struct Screen<S, E> {
    system: System<S>,
    user_events: mpsc::UnboundedSender<E>,
}

impl<S, E> Screen<S, E>
where
    S: Clone + fmt::Debug + Send + Sync + 'static,
    E: fmt::Debug + Send + 'static,
{
    /// Start the screen's loop on the current Tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn spawn<R>(initial: S, reduce: R, effects: Feedback<S, E>) -> Self
    where
        R: Fn(S, E) -> S + Send + 'static,
    {
        let (user_events, input) = mpsc::unbounded_channel();
        let system = System::spawn(initial, reduce, vec![effects, Feedback::events(input)]);
        Self {
            system,
            user_events,
        }
    }

    /// Forward a host event (e.g. "appeared") into the loop.
    pub fn send(&self, event: E) {
        if let Err(e) = self.user_events.send(event) {
            tracing::warn!(event = ?e.0, "screen loop has stopped, event dropped");
        }
    }

    pub fn state(&self) -> S {
        self.system.state()
    }

    pub fn states(&self) -> StateStream<S> {
        self.system.states()
    }
}

//! Feedback units: side-effect sources that turn published states into events.
//!
//! A unit is started once per loop. It receives every state the loop
//! publishes, in order, and sends events back into the loop's merged event
//! channel. Each state arrives tagged with its publication number; an effect
//! stamps its event with the number of the state that started it, and the loop
//! drops events whose state has since been superseded.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

/// A state as handed to feedback units.
#[derive(Debug)]
pub(crate) struct Published<S> {
    pub(crate) seq: u64,
    pub(crate) state: S,
}

/// An event on its way into the loop.
#[derive(Debug)]
pub(crate) struct Envelope<E> {
    /// Publication number of the state whose effect produced the event.
    /// `None` for events that do not answer a state, such as user input.
    pub(crate) origin: Option<u64>,
    pub(crate) event: E,
}

type Run<S, E> =
    Box<dyn FnOnce(UnboundedReceiver<Published<S>>, UnboundedSender<Envelope<E>>) -> BoxFuture<'static, ()> + Send>;

pub struct Feedback<S, E> {
    run: Run<S, E>,
}

impl<S, E> Feedback<S, E>
where
    S: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn from_task<F, Fut>(run: F) -> Self
    where
        F: FnOnce(UnboundedReceiver<Published<S>>, UnboundedSender<Envelope<E>>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            run: Box::new(
                move |states: UnboundedReceiver<Published<S>>, events: UnboundedSender<Envelope<E>>| {
                    run(states, events).boxed()
                },
            ),
        }
    }

    /// A unit that maps each published state to at most one effect.
    ///
    /// Every new state cancels the effect started for the previous one, so
    /// only the latest effect can deliver its event. An effect that finished
    /// just before being cancelled still carries the stale stamp, and the loop
    /// discards its event. `None` starts nothing.
    pub fn effects<F>(effect: F) -> Self
    where
        F: Fn(&S) -> Option<BoxFuture<'static, E>> + Send + 'static,
    {
        Self::from_task(move |mut states, events| async move {
            let mut in_flight = JoinSet::new();
            while let Some(Published { seq, state }) = states.recv().await {
                while in_flight.try_join_next().is_some() {}
                if !in_flight.is_empty() {
                    tracing::trace!(seq, "superseding in-flight effect");
                    in_flight.abort_all();
                }

                if let Some(effect) = effect(&state) {
                    let events = events.clone();
                    in_flight.spawn(async move {
                        let event = effect.await;
                        let _ = events.send(Envelope {
                            origin: Some(seq),
                            event,
                        });
                    });
                }
            }
        })
    }

    /// A unit that forwards externally sent events unchanged.
    pub fn events(mut input: UnboundedReceiver<E>) -> Self {
        Self::from_task(move |_states, output| async move {
            while let Some(event) = input.recv().await {
                if output.send(Envelope { origin: None, event }).is_err() {
                    break;
                }
            }
        })
    }

    pub(crate) fn start(
        self,
        states: UnboundedReceiver<Published<S>>,
        events: UnboundedSender<Envelope<E>>,
    ) -> BoxFuture<'static, ()> {
        (self.run)(states, events)
    }
}

//! Unidirectional loop runtime.
//!
//! # Design
//! One consumer task owns the state. It merges the events of every feedback
//! unit from a single channel, folds each through `reduce`, stores the result
//! in a `watch` holder, publishes it to observers and then hands it to every
//! feedback unit. `reduce` therefore never runs concurrently with itself, and
//! states are published in exactly the order they were produced, unchanged
//! states included.
//!
//! Every published state gets the next publication number, starting at 0 for
//! the initial state. Effect events come back stamped with the number of the
//! state that started them; an event whose state is no longer the latest one
//! handed to the feedback units is dropped before `reduce` sees it.
//!
//! Dropping the [`System`] aborts the loop, the feedback drivers and their
//! in-flight effects.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use crate::feedback::{Envelope, Feedback, Published};

pub struct System<S> {
    current: watch::Receiver<S>,
    observers: mpsc::UnboundedSender<mpsc::UnboundedSender<S>>,
    _tasks: JoinSet<()>,
}

impl<S> System<S>
where
    S: Clone + fmt::Debug + Send + Sync + 'static,
{
    /// Start the loop on the current Tokio runtime.
    ///
    /// Every feedback unit first sees `initial`. The loop ends on its own once
    /// every feedback unit has stopped producing events.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn spawn<E, R>(initial: S, reduce: R, feedbacks: Vec<Feedback<S, E>>) -> Self
    where
        E: fmt::Debug + Send + 'static,
        R: Fn(S, E) -> S + Send + 'static,
    {
        let (current_tx, current_rx) = watch::channel(initial.clone());
        let (observers_tx, observers_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut tasks = JoinSet::new();
        let mut inputs = Vec::with_capacity(feedbacks.len());
        for feedback in feedbacks {
            let (state_tx, state_rx) = mpsc::unbounded_channel();
            let _ = state_tx.send(Published {
                seq: 0,
                state: initial.clone(),
            });
            inputs.push(state_tx);
            tasks.spawn(feedback.start(state_rx, events_tx.clone()));
        }
        drop(events_tx);

        tasks.spawn(run_loop(initial, reduce, events_rx, observers_rx, inputs, current_tx));

        Self {
            current: current_rx,
            observers: observers_tx,
            _tasks: tasks,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> S {
        self.current.borrow().clone()
    }

    /// Subscribe to published states. The stream starts with the current
    /// state, then yields every later state in order. It ends immediately if
    /// the loop has already finished.
    pub fn states(&self) -> StateStream<S> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = self.observers.send(tx);
        StateStream { rx }
    }
}

async fn run_loop<S, E, R>(
    mut state: S,
    reduce: R,
    mut events: mpsc::UnboundedReceiver<Envelope<E>>,
    mut observer_requests: mpsc::UnboundedReceiver<mpsc::UnboundedSender<S>>,
    inputs: Vec<mpsc::UnboundedSender<Published<S>>>,
    current: watch::Sender<S>,
) where
    S: Clone + fmt::Debug,
    E: fmt::Debug,
    R: Fn(S, E) -> S,
{
    let mut observers: Vec<mpsc::UnboundedSender<S>> = Vec::new();
    let mut seq: u64 = 0;
    loop {
        tokio::select! {
            biased;

            Some(observer) = observer_requests.recv() => {
                if observer.send(state.clone()).is_ok() {
                    observers.push(observer);
                }
            }

            event = events.recv() => {
                let Some(Envelope { origin, event }) = event else { break };
                if origin.is_some_and(|origin| origin < seq) {
                    tracing::trace!(?event, ?origin, seq, "dropping event of superseded effect");
                    continue;
                }
                tracing::trace!(?event, "reducing event");
                state = reduce(state, event);
                seq += 1;
                tracing::trace!(?state, seq, "publishing state");

                current.send_replace(state.clone());
                observers.retain(|observer| observer.send(state.clone()).is_ok());
                for input in &inputs {
                    let _ = input.send(Published {
                        seq,
                        state: state.clone(),
                    });
                }
            }
        }
    }
    tracing::debug!("all event sources closed, loop finished");
}

/// Ordered stream of published states.
pub struct StateStream<S> {
    rx: mpsc::UnboundedReceiver<S>,
}

impl<S> StateStream<S> {
    /// Next published state, or `None` once the loop is gone.
    pub async fn recv(&mut self) -> Option<S> {
        self.rx.recv().await
    }

    /// Skip states until one satisfies `predicate`.
    pub async fn wait_for(&mut self, predicate: impl Fn(&S) -> bool) -> Option<S> {
        while let Some(state) = self.rx.recv().await {
            if predicate(&state) {
                return Some(state);
            }
        }
        None
    }
}

impl<S> Stream for StateStream<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S>> {
        self.rx.poll_recv(cx)
    }
}

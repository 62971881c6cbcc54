//! Screen state machines and the runtime that drives them.
//!
//! Every screen runs as one task. It owns its state, receives events from an
//! inbox, publishes the current state on a `watch` channel and pushes
//! navigation intents into a [`NavigationQueue`]. State is only mutated
//! inside that task, so transitions never race each other.
//!
//! The machines themselves are pure: `on_event` returns the next state plus
//! a list of effects, which the screen task executes.

pub mod favorites;
mod navigation;
pub mod recipe_details;
pub mod recipe_list;

pub use navigation::NavigationQueue;

use log::{debug, warn};
use std::future::Future;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

/// What a screen task gets to work with
pub struct ScreenScope<S, N> {
    name: &'static str,
    state: watch::Sender<S>,
    navigation: mpsc::UnboundedSender<N>,
    tasks: JoinSet<()>,
}

impl<S, N> ScreenScope<S, N> {
    /// Publish a new state; observers that haven't caught up only see the latest
    pub fn set_state(&self, state: S)
    where
        S: PartialEq,
    {
        self.state.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }

    pub fn navigate(&self, intent: N)
    where
        N: std::fmt::Debug,
    {
        debug!("[{}] navigate {:?}", self.name, intent);
        if self.navigation.send(intent).is_err() {
            warn!("[{}] navigation queue closed, intent dropped", self.name);
        }
    }

    /// Run `work` in the background for as long as the screen lives.
    /// Its result is not reported back.
    pub fn spawn_detached<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(work);
    }

    /// Reap finished background work; pends forever while there is none
    pub async fn reap(&mut self) {
        if self.tasks.is_empty() {
            return std::future::pending().await;
        }
        if let Some(Err(e)) = self.tasks.join_next().await {
            if e.is_panic() {
                warn!("[{}] background task panicked: {}", self.name, e);
            }
        }
    }
}

/// Handle held by the rendering layer: send events in, observe state and
/// navigation out. Dropping it tears the screen down.
pub struct ScreenHandle<E, S, N> {
    events: mpsc::UnboundedSender<E>,
    state: watch::Receiver<S>,
    navigation: NavigationQueue<N>,
    task: JoinHandle<()>,
}

impl<E, S, N> ScreenHandle<E, S, N>
where
    E: Send + 'static,
    S: Clone + Send + Sync + 'static,
    N: Send + 'static,
{
    /// Start a screen task running `body` with `initial` as its first state
    pub fn launch<F, Fut>(name: &'static str, initial: S, body: F) -> Self
    where
        F: FnOnce(mpsc::UnboundedReceiver<E>, ScreenScope<S, N>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (events, inbox) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(initial);
        let (nav_tx, navigation) = NavigationQueue::channel();

        let scope = ScreenScope {
            name,
            state: state_tx,
            navigation: nav_tx,
            tasks: JoinSet::new(),
        };
        let task = tokio::spawn(body(inbox, scope));
        debug!("[{}] screen started", name);

        Self {
            events,
            state,
            navigation,
            task,
        }
    }

    pub fn on_event(&self, event: E) {
        if self.events.send(event).is_err() {
            warn!("Screen is closed, event dropped");
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Continuously observe the state
    pub fn watch_state(&self) -> watch::Receiver<S> {
        self.state.clone()
    }

    pub fn navigation(&self) -> NavigationQueue<N> {
        self.navigation.clone()
    }

    /// Cancel everything in flight and close the navigation queue.
    /// Intents already queued can still be drained.
    pub fn close(&self) {
        self.task.abort();
    }

    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }
}

impl<E, S, N> Drop for ScreenHandle<E, S, N> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

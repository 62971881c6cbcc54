//! Tri-state wrapper around a single remote fetch.
//!
//! A [`Pipeline`] emits [`AsyncOutcome::Loading`] first and then exactly one
//! terminal outcome. Dropping the pipeline aborts the fetch and closes the
//! channel, so a superseded fetch can't deliver anything afterwards.

use log::debug;
use std::fmt::Display;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncOutcome<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> AsyncOutcome<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AsyncOutcome::Loading)
    }
}

impl<T, E: Display> From<Result<T, E>> for AsyncOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => AsyncOutcome::Success(data),
            Err(e) => AsyncOutcome::Error(e.to_string()),
        }
    }
}

/// A running fetch and the receiving end of its outcomes
#[derive(Debug)]
pub struct Pipeline<T> {
    rx: mpsc::Receiver<AsyncOutcome<T>>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Pipeline<T> {
    /// Spawn `fetch` on the runtime and start reporting its progress
    pub fn launch<F, E>(fetch: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        // Loading + one terminal outcome
        let (tx, rx) = mpsc::channel(2);
        let task = tokio::spawn(async move {
            if tx.send(AsyncOutcome::Loading).await.is_err() {
                return;
            }
            let outcome = AsyncOutcome::from(fetch.await);
            if tx.send(outcome).await.is_err() {
                debug!("Pipeline receiver dropped before the outcome was delivered");
            }
        });

        Self { rx, task }
    }
}

impl<T> Pipeline<T> {
    /// Next outcome, or `None` once the terminal outcome has been taken
    pub async fn next(&mut self) -> Option<AsyncOutcome<T>> {
        self.rx.recv().await
    }
}

impl<T> Drop for Pipeline<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Wait on an optional pipeline; pends forever when there is none.
///
/// Clears the slot after the terminal outcome so later polls go idle.
pub async fn next_outcome<T>(slot: &mut Option<Pipeline<T>>) -> AsyncOutcome<T> {
    let Some(pipeline) = slot.as_mut() else {
        return std::future::pending().await;
    };
    match pipeline.next().await {
        Some(outcome) => {
            if outcome.is_terminal() {
                *slot = None;
            }
            outcome
        }
        None => {
            *slot = None;
            std::future::pending().await
        }
    }
}

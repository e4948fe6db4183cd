//! Single-flight fingerprint worker
//!
//! Identity input can change on every keystroke while each derivation takes
//! a full PBKDF2 run. The worker keeps a queue of depth one:
//!
//! ```text
//! submit() ──► watch<Intent> ──► worker ──► spawn_blocking(derive)
//!   (latest wins)                   │
//!                                   ▼ result still matches latest intent?
//!                  watch<FingerprintState> ◄── yes: publish / no: discard
//! ```
//!
//! Intermediate intents coalesce in the watch channel, at most one
//! derivation runs at a time, and a result is only published if its input
//! is still the latest one.

use std::sync::Arc;

use seedpass_crypto::{Fingerprint, StreamConfig, render_and_digest};
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    error::SessionError,
    input::{IdentityInput, IdentitySeed},
};

/// Published fingerprint state.
#[derive(Debug, Clone)]
pub enum FingerprintState {
    /// Nothing submitted yet
    Empty,
    /// Input incomplete; show no fingerprint
    Cleared {
        /// Intent this state answers
        generation: u64,
    },
    /// Fingerprint for the latest complete input
    Ready {
        /// Intent this state answers
        generation: u64,
        /// Derived digest and grid
        fingerprint: Arc<Fingerprint>,
    },
}

impl FingerprintState {
    /// Generation of the intent this state answers.
    pub fn generation(&self) -> u64 {
        match self {
            Self::Empty => 0,
            Self::Cleared { generation } | Self::Ready { generation, .. } => *generation,
        }
    }

    /// Fingerprint, if one is ready.
    pub fn fingerprint(&self) -> Option<&Arc<Fingerprint>> {
        match self {
            Self::Ready { fingerprint, .. } => Some(fingerprint),
            Self::Empty | Self::Cleared { .. } => None,
        }
    }
}

/// Latest submitted identity snapshot.
#[derive(Debug, Clone, Default)]
struct Intent {
    generation: u64,
    seed: Option<IdentitySeed>,
}

/// Handle to a running fingerprint worker.
///
/// Dropping the handle stops the worker after its current derivation.
#[derive(Debug)]
pub struct FingerprintWorker {
    intents: watch::Sender<Intent>,
    states: watch::Receiver<FingerprintState>,
    task: JoinHandle<()>,
}

impl FingerprintWorker {
    /// Start a worker on the current Tokio runtime.
    pub fn spawn(config: StreamConfig) -> Self {
        let (intents, intent_rx) = watch::channel(Intent::default());
        let (state_tx, states) = watch::channel(FingerprintState::Empty);
        let task = tokio::spawn(run(intent_rx, state_tx, config));
        tracing::debug!("fingerprint worker started");
        Self { intents, states, task }
    }

    /// Replace the pending intent with `input`. Never blocks.
    ///
    /// Returns the generation assigned to this intent.
    pub fn submit(&self, input: &IdentityInput) -> u64 {
        let seed = input.seed();
        let mut assigned = 0;
        self.intents.send_modify(|intent| {
            intent.generation += 1;
            intent.seed = seed;
            assigned = intent.generation;
        });
        assigned
    }

    /// Receiver for published states.
    pub fn subscribe(&self) -> watch::Receiver<FingerprintState> {
        self.states.clone()
    }

    /// Most recently published state.
    pub fn latest(&self) -> FingerprintState {
        self.states.borrow().clone()
    }

    /// Wait until the published state answers the latest submitted intent.
    pub async fn settled(&self) -> Result<FingerprintState, SessionError> {
        let target = self.intents.borrow().generation;
        let mut states = self.states.clone();
        let state = states
            .wait_for(|state| state.generation() >= target)
            .await
            .map_err(|_| SessionError::WorkerGone)?;
        Ok(state.clone())
    }

    /// Stop the worker and wait for it to exit.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        let Self { intents, task, .. } = self;
        drop(intents);
        task.await.map_err(|_| SessionError::WorkerGone)
    }
}

/// Worker loop: runs until every intent sender is dropped.
async fn run(
    mut intents: watch::Receiver<Intent>,
    states: watch::Sender<FingerprintState>,
    config: StreamConfig,
) {
    // Seed behind the currently published fingerprint
    let mut rendered: Option<IdentitySeed> = None;

    while intents.changed().await.is_ok() {
        let Intent { generation, seed } = intents.borrow_and_update().clone();

        let Some(seed) = seed else {
            rendered = None;
            states.send_replace(FingerprintState::Cleared { generation });
            continue;
        };

        if rendered.as_ref() == Some(&seed) {
            states.send_modify(|state| {
                if let FingerprintState::Ready { generation: current, .. } = state {
                    *current = generation;
                }
            });
            continue;
        }

        tracing::debug!(generation, "deriving fingerprint");
        let task_seed = seed.clone();
        let derived =
            tokio::task::spawn_blocking(move || render_and_digest(task_seed.as_bytes(), &config))
                .await;

        if intents.borrow().seed.as_ref() != Some(&seed) {
            let latest = intents.borrow().generation;
            tracing::debug!(generation, latest, "discarding stale fingerprint");
            continue;
        }

        match derived {
            Ok(Ok(fingerprint)) => {
                rendered = Some(seed);
                states.send_replace(FingerprintState::Ready {
                    generation,
                    fingerprint: Arc::new(fingerprint),
                });
            },
            Ok(Err(err)) => {
                tracing::warn!(generation, error = %err, "fingerprint derivation failed");
                rendered = None;
                states.send_replace(FingerprintState::Cleared { generation });
            },
            Err(err) => {
                tracing::error!(generation, error = %err, "fingerprint task panicked");
                break;
            },
        }
    }

    tracing::info!("fingerprint worker stopped");
}

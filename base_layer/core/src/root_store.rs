// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::sync::Mutex;

use ledger_common_types::FieldElement;
use log::*;

use crate::TransitionError;

const LOG_TARGET: &str = "ledger::core::root_store";

#[derive(Debug)]
struct Committed<S> {
    root: FieldElement,
    state: S,
}

/// The single source of truth for a ledger: the committed root, plus whatever auxiliary state `S` an anchor needs to
/// update together with it (e.g. the last accepted attestation sequence).
///
/// The root only changes through [`transition`](Self::transition), which checks and writes inside one critical section.
/// Two callers that both built their transition against the same root are therefore serialized; the second one sees
/// the new root and fails its witness check.
#[derive(Debug)]
pub struct RootCommitmentStore<S = ()> {
    inner: Mutex<Option<Committed<S>>>,
}

impl<S> Default for RootCommitmentStore<S> {
    fn default() -> Self {
        Self { inner: Mutex::new(None) }
    }
}

impl<S: Clone> RootCommitmentStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial root. This can only happen once.
    pub fn init(&self, root: FieldElement, state: S) -> Result<(), TransitionError> {
        let mut inner = self.lock()?;
        if inner.is_some() {
            return Err(TransitionError::AlreadyInitialized);
        }
        info!(target: LOG_TARGET, "Root commitment initialized to {}", root);
        *inner = Some(Committed { root, state });
        Ok(())
    }

    pub fn is_initialized(&self) -> Result<bool, TransitionError> {
        Ok(self.lock()?.is_some())
    }

    pub fn root(&self) -> Result<FieldElement, TransitionError> {
        self.lock()?
            .as_ref()
            .map(|c| c.root)
            .ok_or(TransitionError::NotInitialized)
    }

    pub fn state(&self) -> Result<S, TransitionError> {
        self.lock()?
            .as_ref()
            .map(|c| c.state.clone())
            .ok_or(TransitionError::NotInitialized)
    }

    /// Runs `f` against the committed root and state, and commits the root and state it returns. Nothing is written if
    /// `f` fails. `f` runs while the store is locked, so it must not block.
    pub fn transition<F>(&self, f: F) -> Result<FieldElement, TransitionError>
    where F: FnOnce(&FieldElement, &S) -> Result<(FieldElement, S), TransitionError> {
        let mut inner = self.lock()?;
        let committed = inner.as_mut().ok_or(TransitionError::NotInitialized)?;
        match f(&committed.root, &committed.state) {
            Ok((new_root, new_state)) => {
                debug!(
                    target: LOG_TARGET,
                    "Committed root {} -> {}", committed.root, new_root
                );
                committed.root = new_root;
                committed.state = new_state;
                Ok(new_root)
            },
            Err(e) => {
                debug!(
                    target: LOG_TARGET,
                    "Transition against root {} rejected: {}", committed.root, e
                );
                Err(e)
            },
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Committed<S>>>, TransitionError> {
        self.inner
            .lock()
            .map_err(|e| TransitionError::PoisonedAccess(e.to_string()))
    }
}

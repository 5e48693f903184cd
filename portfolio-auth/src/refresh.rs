//! Single-flight coordination of access-token renewal.
//!
//! Many requests can hit a 401 at the same time. Only one of them may call
//! the refresh endpoint; the others queue behind it and pick up its result.
//! Without this, concurrent callers would each spend the refresh token and
//! all but one would fail.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::*;
use secrecy::SecretString;
use tokio::sync::oneshot;

use crate::error::{token_error, Error, TokenErrorKind};

/// Counts completed renewals. A request records the value before it is sent
/// so a late 401 can tell whether its token has already been replaced.
pub type Generation = u64;

/// Outcome of a successful `RefreshCoordinator::renew` call.
#[derive(Debug, Clone)]
pub enum Renewal {
    /// A renewal this caller ran or waited on produced a new access token.
    Renewed(SecretString),
    /// A renewal finished after the caller's request went out; the stored
    /// token is already newer than the one that was rejected.
    AlreadyRenewed,
}

type Waiter = oneshot::Sender<Option<SecretString>>;

#[derive(Default)]
struct State {
    in_flight: bool,
    generation: Generation,
    waiters: Vec<Waiter>,
}

/// Renewal state owned by one request client.
///
/// Every clone of a `RequestClient` shares one coordinator; independent
/// clients never share renewal state.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<State>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.lock().generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    // The lock is never held across an await, and the state stays consistent
    // even if a holder panicked, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Renew the access token at most once across all concurrent callers.
    ///
    /// # Arguments
    ///
    /// * `seen` - Generation recorded when the caller's request was sent
    /// * `wait_timeout` - How long a queued caller waits for the in-flight renewal
    /// * `refresh` - Performs the actual renewal; only run by the caller that wins
    ///
    /// A queued caller that times out gives up on its own; the renewal it was
    /// waiting on keeps going for everyone else.
    pub async fn renew<F, Fut>(
        &self,
        seen: Generation,
        wait_timeout: Duration,
        refresh: F,
    ) -> Result<Renewal, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SecretString, Error>>,
    {
        let waiter = {
            let mut state = self.lock();
            if state.generation != seen {
                debug!("Access token already renewed since the request was sent");
                return Ok(Renewal::AlreadyRenewed);
            }

            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                Some(rx)
            } else {
                state.in_flight = true;
                None
            }
        };

        if let Some(rx) = waiter {
            debug!("Token renewal in flight, waiting for its outcome");
            return match tokio::time::timeout(wait_timeout, rx).await {
                Ok(Ok(Some(token))) => Ok(Renewal::Renewed(token)),
                Ok(Ok(None)) | Ok(Err(_)) => Err(token_error(
                    TokenErrorKind::RefreshFailed,
                    "Token renewal failed",
                )),
                Err(_) => Err(token_error(
                    TokenErrorKind::WaitTimedOut,
                    "Timed out waiting for token renewal",
                )),
            };
        }

        let mut in_flight = InFlight {
            coordinator: self,
            token: None,
        };
        let token = refresh().await?;
        in_flight.token = Some(token.clone());
        drop(in_flight);

        Ok(Renewal::Renewed(token))
    }
}

/// Marks the running renewal. Dropping it (on success, error or cancellation)
/// clears the in-flight flag and releases every queued caller.
struct InFlight<'a> {
    coordinator: &'a RefreshCoordinator,
    token: Option<SecretString>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let waiters = {
            let mut state = self.coordinator.lock();
            state.in_flight = false;
            if self.token.is_some() {
                state.generation += 1;
            }
            std::mem::take(&mut state.waiters)
        };

        debug!(
            "Token renewal {}, releasing {} waiter(s)",
            if self.token.is_some() { "succeeded" } else { "failed" },
            waiters.len()
        );

        for waiter in waiters {
            // A waiter that already timed out has dropped its receiver.
            let _ = waiter.send(self.token.clone());
        }
    }
}

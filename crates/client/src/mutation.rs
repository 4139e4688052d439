//! Mutation coordinator: one in-flight write per control.
//!
//! A coordinator belongs to a single control (a button, a form, a delete
//! confirmation). It exposes `{pending, error}`, refuses a second submission
//! while one is in flight, and on completion drives cache invalidation and
//! user notifications. Failed writes are never retried.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use storefront_core::{Entity, EntityType};

use crate::cache::ListCache;
use crate::error::{ApiResult, ClientError};
use crate::notify::NotificationSink;

/// Snapshot for rendering the owning control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    pub pending: bool,
    /// User-facing text of the last failure; cleared by the next success.
    pub error: Option<String>,
}

/// What a write touches and how its outcome is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationPlan {
    /// Operation name for logs (e.g. `supplier.create`).
    pub name: &'static str,
    /// Cache family invalidated after the server acknowledges the write.
    pub invalidates: EntityType,
    pub success_message: String,
    /// Shown for any failure that is not a server validation error.
    pub failure_message: String,
}

impl MutationPlan {
    /// Plan a write to an `E`; the cache family comes from `E::ENTITY_TYPE`.
    pub fn for_entity<E: Entity>(
        name: &'static str,
        success_message: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            name,
            invalidates: E::ENTITY_TYPE,
            success_message: success_message.into(),
            failure_message: failure_message.into(),
        }
    }
}

/// Resets the pending flag however the submission ends (including the
/// future being dropped mid-flight).
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct MutationCoordinator {
    cache: Arc<ListCache>,
    notifier: Arc<dyn NotificationSink>,
    invalid_data_prefix: String,
    pending: AtomicBool,
    error: Mutex<Option<String>>,
}

impl core::fmt::Debug for MutationCoordinator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MutationCoordinator")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl MutationCoordinator {
    pub fn new(
        cache: Arc<ListCache>,
        notifier: Arc<dyn NotificationSink>,
        invalid_data_prefix: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            notifier,
            invalid_data_prefix: invalid_data_prefix.into(),
            pending: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn state(&self) -> MutationState {
        MutationState {
            pending: self.is_pending(),
            error: self.error.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        }
    }

    /// Forget the last error (e.g. when the form is reopened).
    pub fn reset(&self) {
        self.set_error(None);
    }

    /// Run one write.
    ///
    /// - While another submission is pending: `Err(Busy)`, `call` is not invoked.
    /// - Success: invalidate `plan.invalidates`, notify success, return the value.
    /// - Failure: record and notify the classified message, return the error.
    /// - `cancel` fires first: the call is dropped, the cache family is still
    ///   invalidated (the write may have landed), nothing is shown.
    pub async fn submit<T, F, Fut>(
        &self,
        plan: &MutationPlan,
        cancel: &CancellationToken,
        call: F,
    ) -> Result<T, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(mutation = plan.name, "submission ignored while pending");
            return Err(ClientError::Busy);
        }
        let _pending = PendingGuard(&self.pending);

        let mutation_id = Uuid::now_v7();
        let span = tracing::info_span!("mutation", %mutation_id, name = plan.name);

        async move {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = call() => Some(result),
            };

            let Some(result) = outcome else {
                self.invalidate(plan);
                tracing::info!("mutation cancelled in flight");
                return Err(ClientError::Cancelled);
            };

            match result {
                Ok(value) => {
                    // Only after the server acknowledged the write.
                    self.invalidate(plan);
                    tracing::info!("mutation succeeded");
                    if cancel.is_cancelled() {
                        return Err(ClientError::Cancelled);
                    }
                    self.set_error(None);
                    self.notifier.success(&plan.success_message);
                    Ok(value)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "mutation failed");
                    if cancel.is_cancelled() {
                        return Err(ClientError::Cancelled);
                    }
                    let message = err.user_message(&self.invalid_data_prefix, &plan.failure_message);
                    self.set_error(Some(message.clone()));
                    self.notifier.error(&message);
                    Err(ClientError::Api(err))
                }
            }
        }
        .instrument(span)
        .await
    }

    fn invalidate(&self, plan: &MutationPlan) {
        self.cache.invalidate(plan.invalidates);
    }

    fn set_error(&self, error: Option<String>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }
}

//! Degraded-mode fallback for mutations against incomplete backend endpoints
//!
//! When a mutating call fails with `NotFound`, the backend endpoint simply
//! does not exist yet. Instead of surfacing a hard failure, the store applies
//! the intended mutation to its local state under a synthesized identifier
//! and reports the outcome with a visible `LocalFallback` origin. Client and
//! server state diverge until the backend catches up; that divergence is an
//! accepted limitation, not a bug.
//!
//! This policy is never applied to authentication or payment-like
//! operations.

use std::sync::atomic::{AtomicU64, Ordering};

use pavilion_common::time::{Clock, SystemClock};
use pavilion_domain::{ApiError, Result};
use tracing::warn;

/// Process-wide sequence so two fallbacks in the same millisecond never
/// collide on synthesized identifiers.
static LOCAL_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Where a write outcome came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOrigin {
    /// The backend confirmed the mutation.
    Server,
    /// The backend endpoint is missing; the mutation was applied locally.
    LocalFallback,
}

/// Result of a mutating store operation
///
/// Fallback writes stay distinguishable from confirmed ones so the UI can
/// qualify them instead of presenting them as real successes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome<T> {
    /// The written value
    pub value: T,
    /// Whether the backend confirmed the write
    pub origin: WriteOrigin,
}

impl<T> WriteOutcome<T> {
    /// Outcome confirmed by the backend
    pub fn confirmed(value: T) -> Self {
        Self { value, origin: WriteOrigin::Server }
    }

    /// Outcome applied locally after a missing-endpoint failure
    pub fn local(value: T) -> Self {
        Self { value, origin: WriteOrigin::LocalFallback }
    }

    /// True when the mutation was only applied locally
    pub fn is_fallback(&self) -> bool {
        self.origin == WriteOrigin::LocalFallback
    }
}

/// Synthesizes identifiers for locally applied mutations
#[derive(Debug, Clone)]
pub struct FallbackPolicy<C: Clock = SystemClock> {
    clock: C,
}

impl FallbackPolicy<SystemClock> {
    /// Policy using the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for FallbackPolicy<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FallbackPolicy<C> {
    /// Policy with an injected clock (useful for testing)
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Timestamp-derived identifier for a locally created resource.
    ///
    /// Two consecutive calls always produce distinct identifiers, even
    /// within the same millisecond.
    pub fn synthesize_id(&self, prefix: &str) -> String {
        let sequence = LOCAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{}-{sequence}", self.clock.millis_since_epoch())
    }
}

/// Absorb a `NotFound` failure from a mutating call.
///
/// On success the value passes through with a `Server` origin. On
/// `NotFound` the local mutation closure runs and the outcome is tagged
/// `LocalFallback`. Every other error propagates unchanged.
///
/// # Errors
/// Any classification other than `NotFound` is surfaced to the caller.
pub fn absorb_not_found<T>(
    result: Result<T>,
    apply_local: impl FnOnce() -> T,
) -> Result<WriteOutcome<T>> {
    match result {
        Ok(value) => Ok(WriteOutcome::confirmed(value)),
        Err(ApiError::NotFound(message)) => {
            warn!(%message, "backend endpoint missing; applying mutation locally");
            Ok(WriteOutcome::local(apply_local()))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pavilion_common::time::MockClock;

    use super::*;

    #[test]
    fn synthesized_ids_never_collide() {
        // A frozen clock is the worst case: every id shares the timestamp.
        let policy = FallbackPolicy::with_clock(MockClock::new());

        let ids: HashSet<String> = (0..100).map(|_| policy.synthesize_id("team")).collect();
        assert_eq!(ids.len(), 100);
        assert!(ids.iter().all(|id| id.starts_with("team-")));
    }

    #[test]
    fn server_success_passes_through_confirmed() {
        let outcome = absorb_not_found(Ok(41), || 0).unwrap();
        assert_eq!(outcome.value, 41);
        assert_eq!(outcome.origin, WriteOrigin::Server);
        assert!(!outcome.is_fallback());
    }

    #[test]
    fn not_found_applies_the_local_mutation() {
        let outcome =
            absorb_not_found(Err(ApiError::NotFound("missing endpoint".into())), || 7).unwrap();
        assert_eq!(outcome.value, 7);
        assert!(outcome.is_fallback());
    }

    #[test]
    fn other_classifications_propagate() {
        let result = absorb_not_found(Err(ApiError::Validation("bad name".into())), || 0);
        assert_eq!(result, Err(ApiError::Validation("bad name".into())));

        let result =
            absorb_not_found(Err(ApiError::Unauthorized("token expired".into())), || 0);
        assert!(result.unwrap_err().is_unauthorized());
    }
}

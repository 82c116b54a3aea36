//! Resource supervisor (C1): starts and stops the kernel and every MCP
//! server concurrently, rolling back everything already opened if any one
//! of them fails to start.
//!
//! Rust doesn't need a live background task to keep an async
//! context-manager-style scope open the way the original implementation
//! does — a [`ManagedResource`] is just an owned value whose `close`
//! consumes it. The concurrency and rollback behavior (§4.1) is what
//! matters, not the mechanism, so this is `futures::future::join_all` plus
//! a rollback pass, not a supervisor task per resource.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::{RuntimeError, RuntimeResult};

/// A resource with a scope to tear down: an opened kernel, a connected MCP
/// server. [`start_all`]/[`stop_all`] manage a batch of these.
#[async_trait]
pub trait ManagedResource: Send {
    /// Release this resource. Called at most once, by [`stop_all`].
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if teardown fails; [`stop_all`]
    /// aggregates these across every resource in the batch rather than
    /// stopping at the first one.
    async fn close(self: Box<Self>) -> Result<(), String>;

    /// Recover the concrete resource behind this type-erased handle, so a
    /// caller of [`start_all`] can use it (e.g. register an opened MCP
    /// server's tools) before eventually passing it back to [`stop_all`].
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// One resource's boxed, not-yet-awaited open operation, paired with a name
/// for error reporting.
pub type OpenFuture = Pin<Box<dyn Future<Output = Result<Box<dyn ManagedResource>, String>> + Send>>;

/// Start every named resource in `opens` concurrently.
///
/// If every open succeeds, returns the opened resources in the same order
/// as `opens`. If any fail, every resource that *did* open is closed
/// concurrently (teardown errors during this rollback are logged, not
/// propagated — the original start failure is what the caller needs to
/// see), and the first failure (by input order) is returned.
///
/// # Errors
///
/// Returns [`RuntimeError::ResourceStartFailed`] naming the first resource
/// (by input order) that failed to open.
pub async fn start_all(opens: Vec<(String, OpenFuture)>) -> RuntimeResult<Vec<Box<dyn ManagedResource>>> {
    let (names, futures): (Vec<String>, Vec<OpenFuture>) = opens.into_iter().unzip();
    let results = futures::future::join_all(futures).await;

    let mut opened = Vec::with_capacity(results.len());
    let mut failures: Vec<(String, String)> = Vec::new();

    for (name, result) in names.into_iter().zip(results) {
        match result {
            Ok(resource) => opened.push(resource),
            Err(reason) => failures.push((name, reason)),
        }
    }

    if failures.is_empty() {
        return Ok(opened);
    }

    if let Err(e) = stop_all(opened).await {
        tracing::warn!(error = %e, "rollback after failed resource start reported errors");
    }

    let (resource, reason) = failures.into_iter().next().expect("failures is non-empty");
    Err(RuntimeError::ResourceStartFailed { resource, reason })
}

/// Close every resource in `resources` concurrently, ignoring which order
/// they finish in. Idempotent in the sense that an empty batch is a no-op.
///
/// # Errors
///
/// Returns [`RuntimeError::ResourceStartFailed`] with every failure's
/// reason joined together if one or more resources failed to close; a
/// single failure is not distinguished from a handful at this boundary —
/// the caller already knows which resources it tore down.
pub async fn stop_all(resources: Vec<Box<dyn ManagedResource>>) -> RuntimeResult<()> {
    let closes = resources.into_iter().map(ManagedResource::close);
    let results = futures::future::join_all(closes).await;
    let errors: Vec<String> = results.into_iter().filter_map(Result::err).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RuntimeError::ResourceStartFailed {
            resource: "multiple".to_string(),
            reason: errors.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counted {
        closed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ManagedResource for Counted {
        async fn close(self: Box<Self>) -> Result<(), String> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    #[tokio::test]
    async fn all_succeed_returns_every_resource_in_order() {
        let opens: Vec<(String, OpenFuture)> = vec![
            ("a".to_string(), Box::pin(async { Ok(Box::new(Counted { closed: Arc::new(AtomicUsize::new(0)) }) as Box<dyn ManagedResource>) })),
            ("b".to_string(), Box::pin(async { Ok(Box::new(Counted { closed: Arc::new(AtomicUsize::new(0)) }) as Box<dyn ManagedResource>) })),
        ];
        let opened = start_all(opens).await.unwrap();
        assert_eq!(opened.len(), 2);
    }

    #[tokio::test]
    async fn one_failure_rolls_back_the_others() {
        let closed = Arc::new(AtomicUsize::new(0));
        let closed_clone = Arc::clone(&closed);
        let opens: Vec<(String, OpenFuture)> = vec![
            ("kernel".to_string(), Box::pin(async move { Ok(Box::new(Counted { closed: closed_clone }) as Box<dyn ManagedResource>) })),
            ("mcp-broken".to_string(), Box::pin(async { Err("connection refused".to_string()) })),
        ];
        let err = start_all(opens).await.unwrap_err();
        assert!(matches!(err, RuntimeError::ResourceStartFailed { resource, .. } if resource == "mcp-broken"));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_all_aggregates_errors() {
        struct Failing;
        #[async_trait]
        impl ManagedResource for Failing {
            async fn close(self: Box<Self>) -> Result<(), String> {
                Err("disk full".to_string())
            }

            fn into_any(self: Box<Self>) -> Box<dyn Any> {
                self
            }
        }
        let resources: Vec<Box<dyn ManagedResource>> = vec![Box::new(Failing), Box::new(Failing)];
        let err = stop_all(resources).await.unwrap_err();
        let RuntimeError::ResourceStartFailed { reason, .. } = err else {
            panic!("expected ResourceStartFailed");
        };
        assert_eq!(reason.matches("disk full").count(), 2);
    }
}

// Copyright (c) 2026 - Soldr Project Developers
//! One-Shot Derived Outputs
//!
//! An [`Output<T>`] is a value that only exists after the convergence
//! engine has realized the resource it comes from. It resolves exactly
//! once, can be cloned and awaited from multiple places, and propagates
//! errors explicitly instead of registering callbacks on shared state.
//!
//! Derived values are built with [`Output::apply`]: projecting a field
//! out of a realized resource yields a new `Output` that resolves when
//! the upstream one does. A failed projection (for example reading the
//! public address of a private-only instance) fails the derived output
//! rather than producing a default value.

use futures::channel::oneshot;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors carried by unresolvable or failed outputs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// The resolver was dropped without resolving the output
    #[error("Output was never resolved")]
    Unresolved,

    /// A projection over the realized value failed
    #[error("Output projection failed: {0}")]
    Projection(String),

    /// The resource this output derives from failed to realize
    #[error("Upstream resource failed: {0}")]
    UpstreamFailed(String),
}

type SharedResult<T> = Shared<BoxFuture<'static, Result<T, OutputError>>>;

/// A single-resolution asynchronous value
///
/// Cloning an `Output` shares the same resolution; every clone observes
/// the same value or error.
#[derive(Clone)]
pub struct Output<T: Clone + Send + Sync + 'static> {
    inner: SharedResult<T>,
}

impl<T: Clone + Send + Sync + 'static> Output<T> {
    /// An output that is already resolved
    pub fn resolved(value: T) -> Self {
        Self {
            inner: futures::future::ready(Ok(value)).boxed().shared(),
        }
    }

    /// An output that is already failed
    pub fn failed(error: OutputError) -> Self {
        Self {
            inner: futures::future::ready(Err(error)).boxed().shared(),
        }
    }

    /// A pending output plus the resolver that will settle it
    pub fn pending() -> (OutputResolver<T>, Self) {
        let (tx, rx) = oneshot::channel();
        let inner = async move {
            match rx.await {
                Ok(result) => result,
                // Sender dropped without resolving
                Err(oneshot::Canceled) => Err(OutputError::Unresolved),
            }
        }
        .boxed()
        .shared();

        (OutputResolver { tx }, Self { inner })
    }

    /// Derive a new output through a fallible projection
    ///
    /// `f` runs once, after the upstream output resolves. Upstream
    /// errors pass through untouched.
    pub fn apply<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Result<U, OutputError> + Send + 'static,
    {
        let upstream = self.inner.clone();
        Output {
            inner: async move { f(upstream.await?) }.boxed().shared(),
        }
    }

    /// Derive a new output through an infallible projection
    pub fn map<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.apply(|value| Ok(f(value)))
    }

    /// Await the resolved value
    pub async fn get(&self) -> Result<T, OutputError> {
        self.inner.clone().await
    }
}

impl<T: Clone + Send + Sync + 'static> std::fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

/// Write side of a pending [`Output`]
///
/// Consumed on first use; an output can be settled at most once.
pub struct OutputResolver<T> {
    tx: oneshot::Sender<Result<T, OutputError>>,
}

impl<T> OutputResolver<T> {
    /// Resolve the output with a value
    pub fn resolve(self, value: T) {
        // Receivers may all be dropped already; nothing to do then
        let _ = self.tx.send(Ok(value));
    }

    /// Fail the output
    pub fn fail(self, error: OutputError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Output-export sink: named string outputs of a provisioning run
#[derive(Debug, Default)]
pub struct Exports {
    entries: BTreeMap<String, Output<String>>,
}

impl Exports {
    /// Create an empty export set
    pub fn new() -> Self {
        Self::default()
    }

    /// Export an output under a name; re-exporting replaces the entry
    pub fn export(&mut self, name: impl Into<String>, output: Output<String>) {
        self.entries.insert(name.into(), output);
    }

    /// Get an exported output by name
    pub fn get(&self, name: &str) -> Option<&Output<String>> {
        self.entries.get(name)
    }

    /// Await every export, in name order
    pub async fn resolve_all(&self) -> Result<Vec<(String, String)>, OutputError> {
        let mut resolved = Vec::with_capacity(self.entries.len());
        for (name, output) in &self.entries {
            resolved.push((name.clone(), output.get().await?));
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_resolved_output() {
        let output = Output::resolved(42);
        assert_eq!(output.get().await, Ok(42));
        // Clones share the resolution
        assert_eq!(output.clone().get().await, Ok(42));
    }

    #[tokio::test]
    async fn test_pending_resolves_once() {
        let (resolver, output) = Output::pending();
        let derived = output.map(|v: i32| v * 2);

        resolver.resolve(21);
        assert_eq!(output.get().await, Ok(21));
        assert_eq!(derived.get().await, Ok(42));
    }

    #[tokio::test]
    async fn test_dropped_resolver_fails_output() {
        let (resolver, output) = Output::<i32>::pending();
        drop(resolver);
        assert_eq!(output.get().await, Err(OutputError::Unresolved));
    }

    #[tokio::test]
    async fn test_apply_propagates_projection_error() {
        let output = Output::resolved(Vec::<String>::new());
        let first = output.apply(|values| {
            values
                .into_iter()
                .next()
                .ok_or_else(|| OutputError::Projection("empty collection".to_string()))
        });

        assert_eq!(
            first.get().await,
            Err(OutputError::Projection("empty collection".to_string()))
        );
    }

    #[tokio::test]
    async fn test_apply_propagates_upstream_error() {
        let (resolver, output) = Output::<i32>::pending();
        let derived = output.map(|v| v + 1);
        resolver.fail(OutputError::UpstreamFailed("instance".to_string()));

        assert_eq!(
            derived.get().await,
            Err(OutputError::UpstreamFailed("instance".to_string()))
        );
    }

    #[tokio::test]
    async fn test_derived_output_awaits_across_tasks() {
        // Derived outputs are awaited from spawned tasks, so the shared
        // future must be Send even while the upstream is still pending.
        let (resolver, output) = Output::<String>::pending();
        let derived = output.map(|ip| format!("http://{ip}:3000"));

        let handle = tokio::spawn(async move { derived.get().await });
        resolver.resolve("34.1.2.3".to_string());

        assert_eq!(
            handle.await.unwrap(),
            Ok("http://34.1.2.3:3000".to_string())
        );
    }

    #[tokio::test]
    async fn test_exports_resolve_in_name_order() {
        let mut exports = Exports::new();
        exports.export("url", Output::resolved("http://34.1.2.3:3000".to_string()));
        exports.export("ip", Output::resolved("34.1.2.3".to_string()));

        let resolved = exports.resolve_all().await.unwrap();
        assert_eq!(
            resolved,
            vec![
                ("ip".to_string(), "34.1.2.3".to_string()),
                ("url".to_string(), "http://34.1.2.3:3000".to_string()),
            ]
        );
    }
}

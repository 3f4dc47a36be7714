//! The `AsyncVal` abstraction of §9 Design Notes: a two-branch value that
//! fuses a synchronously-known result with an awaitable one, plus the
//! collection combinators the executor is built out of.
//!
//! Grounded on how the teacher drives concurrent field resolution —
//! `juniper`'s async executor collects sibling futures into a
//! `FuturesOrdered<BoxFuture<'a, _>>` and streams them to completion in
//! input order (`juniper/src/types/async_await.rs`,
//! `resolve_selection_set_into_async_recursive`). `AsyncValue` generalises
//! that one call site into the reusable primitive described in spec.md §9.

use futures::future::BoxFuture;
use futures::stream::{FuturesOrdered, StreamExt};
use futures::FutureExt;

/// A value that is either already known (`Ready`) or requires awaiting a
/// future (`Pending`).
///
/// Resolvers that return synchronously-available values (the common case —
/// reading a field off an in-memory parent) never pay the cost of being
/// scheduled onto an executor; only resolvers that actually suspend box a
/// future.
pub enum AsyncValue<T> {
    Ready(T),
    Pending(BoxFuture<'static, T>),
}

impl<T: Send + 'static> AsyncValue<T> {
    pub fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    pub fn pending(fut: impl std::future::Future<Output = T> + Send + 'static) -> Self {
        Self::Pending(Box::pin(fut))
    }

    /// Awaits the value, taking the synchronous shortcut when possible.
    pub async fn resolve(self) -> T {
        match self {
            Self::Ready(v) => v,
            Self::Pending(fut) => fut.await,
        }
    }

    fn into_boxed_future(self) -> BoxFuture<'static, T> {
        match self {
            Self::Ready(v) => async move { v }.boxed(),
            Self::Pending(fut) => fut,
        }
    }

    /// Transforms the eventual value, staying on the `Ready` branch when
    /// `self` is already resolved.
    pub fn map<U: Send + 'static>(self, f: impl FnOnce(T) -> U + Send + 'static) -> AsyncValue<U> {
        match self {
            Self::Ready(v) => AsyncValue::Ready(f(v)),
            Self::Pending(fut) => AsyncValue::Pending(Box::pin(async move { f(fut.await) })),
        }
    }

    /// Chains another asynchronous step off the eventual value.
    pub fn bind<U: Send + 'static>(
        self,
        f: impl FnOnce(T) -> AsyncValue<U> + Send + 'static,
    ) -> AsyncValue<U> {
        match self {
            Self::Ready(v) => f(v),
            Self::Pending(fut) => AsyncValue::Pending(Box::pin(async move { f(fut.await).resolve().await })),
        }
    }
}

impl<T: Send + 'static, E: Send + 'static> AsyncValue<Result<T, E>> {
    /// Catches a failure and replaces it with a caller-supplied value — the
    /// sole mechanism for per-field error isolation (§9: "`rescue` catches a
    /// failure and replaces it with a caller-supplied replacement").
    pub fn rescue(self, on_err: impl FnOnce(E) -> T + Send + 'static) -> AsyncValue<T> {
        self.map(|res| match res {
            Ok(v) => v,
            Err(e) => on_err(e),
        })
    }
}

/// Runs every item concurrently, preserving input order in the result —
/// the combinator behind §5's "Field tasks within a single `executeFields`
/// or a `List` expansion run concurrently".
pub async fn collect_parallel<T: Send + 'static>(items: Vec<AsyncValue<T>>) -> Vec<T> {
    let mut ordered: FuturesOrdered<BoxFuture<'static, T>> = FuturesOrdered::new();
    for item in items {
        ordered.push_back(item.into_boxed_future());
    }
    ordered.collect().await
}

/// Runs each thunk strictly in order: a later thunk is not even constructed
/// (let alone started) until the previous one's entire future has resolved.
/// This is what gives `Strategy::Sequential` mutations their observable
/// ordering (§4.6, §8 "Sequential mutation ordering").
pub async fn collect_sequential<T: Send + 'static>(
    thunks: Vec<Box<dyn FnOnce() -> AsyncValue<T> + Send>>,
) -> Vec<T> {
    let mut out = Vec::with_capacity(thunks.len());
    for thunk in thunks {
        out.push(thunk().resolve().await);
    }
    out
}

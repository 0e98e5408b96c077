//! Host context and the callable shapes the menu code stores.
//!
//! Every predicate, generator and handler receives the context by value
//! together with the absolute path it is evaluated for. Contexts are expected
//! to be cheap to clone (an `Arc` or a handle around the inbound update).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The inbound event as seen by the menu layer.
pub trait MenuContext: Clone + Send + Sync + 'static {
    /// Callback data of a button press, `None` for every other kind of update.
    fn callback_data(&self) -> Option<&str>;
}

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Async callback over `(context, key)`.
pub type KeyFn<C, K, T> = Arc<dyn Fn(C, K) -> BoxFuture<anyhow::Result<T>> + Send + Sync>;

/// Async callback over `(context, path)`.
pub type PathFn<C, T> = KeyFn<C, String, T>;

/// Hide predicate: `true` removes the button and disables what it triggers.
pub type HideFn<C> = PathFn<C, bool>;

/// Wrap an async closure into a [`KeyFn`].
pub fn key_fn<C, K, T, F, Fut>(f: F) -> KeyFn<C, K, T>
where
    C: 'static,
    K: 'static,
    T: 'static,
    F: Fn(C, K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    Arc::new(move |ctx: C, key: K| -> BoxFuture<anyhow::Result<T>> {
        Box::pin(f(ctx, key))
    })
}

/// Wrap an async closure into a [`PathFn`].
pub fn path_fn<C, T, F, Fut>(f: F) -> PathFn<C, T>
where
    C: 'static,
    T: 'static,
    F: Fn(C, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    key_fn(f)
}

/// Wrap an async closure into a [`HideFn`].
pub fn hide_fn<C, F, Fut>(f: F) -> HideFn<C>
where
    C: 'static,
    F: Fn(C, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
{
    path_fn(f)
}

/// Evaluate an optional hide predicate; absent means visible.
pub(crate) async fn is_hidden<C: MenuContext>(
    hide: Option<&HideFn<C>>,
    ctx: &C,
    path: &str,
) -> anyhow::Result<bool> {
    match hide {
        Some(hide) => hide(ctx.clone(), path.to_string()).await,
        None => Ok(false),
    }
}

/// Hidden when either predicate says so; `first` is evaluated first.
pub(crate) fn either_hidden<C: MenuContext>(first: Option<HideFn<C>>, second: Option<HideFn<C>>) -> Option<HideFn<C>> {
    match (first, second) {
        (Some(first), Some(second)) => Some(hide_fn(move |ctx: C, path: String| {
            let first = Arc::clone(&first);
            let second = Arc::clone(&second);
            async move { Ok(first(ctx.clone(), path.clone()).await? || second(ctx, path).await?) }
        })),
        (first, second) => first.or(second),
    }
}

// ---------------------------------------------------------------------------
// Constant or computed values
// ---------------------------------------------------------------------------

/// A value that is either fixed at build time or computed per request.
pub enum ContextValue<C, T> {
    Static(T),
    Dynamic(PathFn<C, T>),
}

impl<C: MenuContext, T: Clone + 'static> ContextValue<C, T> {
    pub fn dynamic<F, Fut>(f: F) -> Self
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        ContextValue::Dynamic(path_fn(f))
    }

    pub async fn resolve(&self, ctx: &C, path: &str) -> anyhow::Result<T> {
        match self {
            ContextValue::Static(value) => Ok(value.clone()),
            ContextValue::Dynamic(f) => f(ctx.clone(), path.to_string()).await,
        }
    }
}

impl<C, T: Clone> Clone for ContextValue<C, T> {
    fn clone(&self) -> Self {
        match self {
            ContextValue::Static(value) => ContextValue::Static(value.clone()),
            ContextValue::Dynamic(f) => ContextValue::Dynamic(Arc::clone(f)),
        }
    }
}

impl<C, T> From<T> for ContextValue<C, T> {
    fn from(value: T) -> Self {
        ContextValue::Static(value)
    }
}

impl<C> From<&str> for ContextValue<C, String> {
    fn from(value: &str) -> Self {
        ContextValue::Static(value.to_string())
    }
}

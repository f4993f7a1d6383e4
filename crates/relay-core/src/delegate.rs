//! Delegate - 単一スロットの Callback 保持
//!
//! # 学習ポイント
//! - `Option<Box<dyn Callback<S>>>` による 0 or 1 の排他的所有
//! - 代入（`set`）で古い Callback を drop、`Clone` で deep copy
//! - 空のときは `Default` の値を返す（`try_invoke` はエラーで返す）

use std::fmt;

use crate::callback::{BoxedCallback, Callback, Signature};
use crate::error::CallbackError;

/// Holds at most one callback with signature `S`.
///
/// ```ignore
/// let mut on_close: Delegate<fn(u32) -> bool> = Delegate::new();
/// on_close.set(make_free(confirm as fn(u32) -> bool));
/// let accepted = on_close.invoke((42,));
/// ```
pub struct Delegate<S: Signature> {
    callback: Option<BoxedCallback<S>>,
}

impl<S: Signature> Delegate<S> {
    pub fn new() -> Self {
        Self { callback: None }
    }

    /// Replaces the held callback; the previous one is dropped.
    pub fn set(&mut self, callback: BoxedCallback<S>) -> &mut Self {
        tracing::trace!(kind = %callback.kind(), "delegate bound");
        self.callback = Some(callback);
        self
    }

    /// Like [`set`](Self::set) but hands back the previous callback.
    pub fn replace(&mut self, callback: BoxedCallback<S>) -> Option<BoxedCallback<S>> {
        tracing::trace!(kind = %callback.kind(), "delegate rebound");
        self.callback.replace(callback)
    }

    /// Removes and returns the held callback, leaving the delegate empty.
    pub fn take(&mut self) -> Option<BoxedCallback<S>> {
        self.callback.take()
    }

    /// Calls the held callback, or returns `S::Output::default()` when empty.
    pub fn invoke(&self, args: S::Args) -> S::Output
    where
        S::Output: Default,
    {
        match &self.callback {
            Some(callback) => callback.invoke(args),
            None => {
                tracing::debug!("invoked empty delegate; returning default");
                S::Output::default()
            }
        }
    }

    /// Calls the held callback, or fails with [`CallbackError::Unbound`].
    pub fn try_invoke(&self, args: S::Args) -> Result<S::Output, CallbackError> {
        let callback = self.callback.as_ref().ok_or(CallbackError::Unbound)?;
        Ok(callback.invoke(args))
    }

    pub fn callback(&self) -> Option<&dyn Callback<S>> {
        self.callback.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.callback.is_none()
    }

    /// Whether a callback is held.
    pub fn is_bound(&self) -> bool {
        self.callback.is_some()
    }

    pub fn clear(&mut self) {
        self.callback = None;
    }
}

impl<S: Signature> Default for Delegate<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signature> Clone for Delegate<S> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.as_ref().map(|callback| callback.clone_box()),
        }
    }
}

impl<S: Signature> From<BoxedCallback<S>> for Delegate<S> {
    fn from(callback: BoxedCallback<S>) -> Self {
        Self {
            callback: Some(callback),
        }
    }
}

impl<S: Signature> fmt::Debug for Delegate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("callback", &self.callback.as_ref().map(|callback| callback.kind()))
            .finish()
    }
}

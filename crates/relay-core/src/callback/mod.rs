//! Callback - 型消去された呼び出し可能オブジェクト
//!
//! # 二層構造
//! - **表層（Typed）**: `FreeCallback<S>`, `MemberCallback<T, M>`, `LambdaCallback<F, S>` など
//!   具体型ごとに target・instance・束縛引数を保持する
//! - **内部（Dyn）**: `dyn Callback<S>` - object-safe, `Box` で単一所有
//!
//! # 学習ポイント
//! - `as_any()` + `downcast_ref::<Self>()` による同種比較（異種は常に false）
//! - `clone_box()` による trait object の deep copy
//! - `Box<dyn Callback<S>>` に `Clone` / `PartialEq` を生やす

pub mod free;
pub mod lambda;
pub mod member;
pub mod signature;

use std::any::Any;
use std::fmt;

use serde::Serialize;

pub use self::free::{FreeBindCallback, FreeCallback};
pub use self::lambda::{LambdaBindCallback, LambdaCallback};
pub use self::member::{MemberBindCallback, MemberCallback, WeakMemberCallback};
pub use self::signature::{Lambda, Method, Signature};

/// Owned, type-erased callback with signature `S`.
pub type BoxedCallback<S> = Box<dyn Callback<S>>;

/// Something invocable with `S::Args`, comparable with other callbacks of the
/// same signature, and duplicable.
///
/// Bound kinds erase their argument list: a `FreeBindCallback<fn(i32)>` is a
/// `Callback<fn()>`.
pub trait Callback<S: Signature>: 'static {
    /// Dispatches to the wrapped target. Never reports failure.
    fn invoke(&self, args: S::Args) -> S::Output;

    /// True iff `other` is the same concrete kind with the same target,
    /// instance, bound arguments and identity tag.
    fn equals(&self, other: &dyn Callback<S>) -> bool;

    /// Independent deep copy.
    fn clone_box(&self) -> BoxedCallback<S>;

    fn kind(&self) -> CallbackKind;

    fn as_any(&self) -> &dyn Any;
}

impl<S: Signature> PartialEq for dyn Callback<S> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<S: Signature> Clone for Box<dyn Callback<S>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<S: Signature> fmt::Debug for dyn Callback<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("kind", &self.kind())
            .field("signature", &std::any::type_name::<S>())
            .finish()
    }
}

/// Which concrete kind a callback is.
///
/// Informational only (logs, errors, reports); equality never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackKind {
    Free,
    Member,
    WeakMember,
    Lambda,
    FreeBound,
    MemberBound,
    LambdaBound,
}

impl CallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackKind::Free => "free",
            CallbackKind::Member => "member",
            CallbackKind::WeakMember => "weak_member",
            CallbackKind::Lambda => "lambda",
            CallbackKind::FreeBound => "free_bound",
            CallbackKind::MemberBound => "member_bound",
            CallbackKind::LambdaBound => "lambda_bound",
        }
    }

    /// Whether the kind carries pre-bound arguments.
    pub fn is_bound(&self) -> bool {
        matches!(
            self,
            CallbackKind::FreeBound | CallbackKind::MemberBound | CallbackKind::LambdaBound
        )
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

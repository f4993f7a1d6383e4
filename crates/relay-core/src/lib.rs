//! relay-core
//!
//! Type-erased callbacks plus the two holders built on them.
//!
//! # モジュール構成
//! - **callback**: `Callback<S>` trait と具体型（free / member / lambda とその bound 版）
//! - **factory**: 具体型を組み立てる `make_*` 関数
//! - **delegate**: 単一スロットの `Delegate<S>`
//! - **event**: 順序付き・重複なしの `Event<S>`
//! - **error**: `try_*` 系が返す `CallbackError`
//!
//! シグネチャ `S` は fn ポインタ型で表します（例: `Event<fn(u32, u32)>`）。
//! bound 版は引数を内部に持つので `fn() -> R` として扱えます。

pub mod callback;
pub mod delegate;
pub mod error;
pub mod event;
pub mod factory;

// 主要な trait/型 を再エクスポート
pub use self::callback::{BoxedCallback, Callback, CallbackKind, Lambda, Method, Signature};
pub use self::delegate::Delegate;
pub use self::error::CallbackError;
pub use self::event::Event;
pub use self::factory::{
    make_free, make_free_bound, make_lambda, make_lambda_bound, make_member, make_member_bound,
    make_weak_member,
};

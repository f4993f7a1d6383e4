//! Factory - 渡されたものから適切な Callback 具体型を組み立てる
//!
//! # 使用例
//! ```ignore
//! let mut event: Event<fn()> = Event::new();
//! event += make_free(on_tick as fn());
//! event += make_free_bound(on_value as fn(i32), (5,));
//! event += make_lambda(|| println!("tick"));
//! event += make_lambda_bound(|n: i32| println!("{n}"), (3,));
//! event.invoke(());
//! ```
//!
//! Rust には引数の数によるオーバーロードがないため、形ごとに関数を分けています。
//! 関数アイテムは `as fn(..)` で fn ポインタにキャストしてから渡します。

use std::cell::RefCell;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::callback::{
    BoxedCallback, FreeBindCallback, FreeCallback, Lambda, LambdaBindCallback, LambdaCallback,
    MemberBindCallback, MemberCallback, Method, Signature, WeakMemberCallback,
};

/// Wraps a function pointer.
///
/// Equality compares function addresses. Rust does not promise one address
/// per function, so `#[inline]` or generic functions instantiated in
/// different crates may fail to compare equal, and unsubscribing them can miss.
pub fn make_free<S: Signature>(func: S) -> BoxedCallback<S> {
    Box::new(FreeCallback::new(func))
}

/// Wraps a function pointer together with its arguments.
pub fn make_free_bound<F>(func: F, args: F::Args) -> BoxedCallback<fn() -> F::Output>
where
    F: Signature,
    F::Args: Clone + PartialEq,
{
    Box::new(FreeBindCallback::new(func, args))
}

/// Wraps a method pointer and a non-owning instance pointer.
///
/// # Safety
///
/// `instance` must outlive every invocation of the returned callback and of
/// its clones, and must not be borrowed elsewhere while one runs. For
/// `fn(&mut T, ..)` methods it must permit writes (`NonNull::from(&mut x)`);
/// `fn(&T, ..)` methods accept `NonNull::from(&x)`.
///
/// The method is compared by address, with the same caveat as [`make_free`].
pub unsafe fn make_member<T, M>(method: M, instance: NonNull<T>) -> BoxedCallback<M::Signature>
where
    T: 'static,
    M: Method<T>,
{
    // SAFETY: forwarded to our caller.
    Box::new(unsafe { MemberCallback::new(method, instance) })
}

/// Wraps a method pointer, a non-owning instance pointer and the method's
/// arguments.
///
/// # Safety
///
/// Same contract as [`make_member`].
pub unsafe fn make_member_bound<T, M>(
    method: M,
    instance: NonNull<T>,
    args: M::Args,
) -> BoxedCallback<fn() -> M::Output>
where
    T: 'static,
    M: Method<T>,
    M::Args: Clone + PartialEq,
{
    // SAFETY: forwarded to our caller.
    Box::new(unsafe { MemberBindCallback::new(method, instance, args) })
}

/// Wraps a method pointer and a weak handle to a shared instance.
///
/// Invoking after the instance is dropped returns `Output::default()`.
pub fn make_weak_member<T, M>(method: M, instance: &Rc<RefCell<T>>) -> BoxedCallback<M::Signature>
where
    T: 'static,
    M: Method<T>,
    M::Output: Default,
{
    Box::new(WeakMemberCallback::new(method, instance))
}

/// Wraps a closure or functor; the signature comes from its `Fn` impl.
pub fn make_lambda<S, F>(func: F) -> BoxedCallback<S>
where
    S: Signature,
    F: Lambda<S>,
{
    Box::new(LambdaCallback::new(func))
}

/// Wraps a closure or functor together with its arguments.
pub fn make_lambda_bound<S, F>(func: F, args: S::Args) -> BoxedCallback<fn() -> S::Output>
where
    S: Signature,
    S::Args: Clone + PartialEq,
    F: Lambda<S>,
{
    Box::new(LambdaBindCallback::new(func, args))
}

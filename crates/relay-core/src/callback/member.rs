//! Member callbacks: a method pointer plus the instance it runs on.
//!
//! `MemberCallback` / `MemberBindCallback` keep a raw, non-owning
//! [`NonNull`] to the instance. Nothing here tracks the instance's lifetime;
//! the `unsafe` constructors carry that contract.
//!
//! `WeakMemberCallback` is the opt-in safe variant over `Rc<RefCell<T>>`.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::ptr::NonNull;
use std::rc::{Rc, Weak};

use super::{BoxedCallback, Callback, CallbackKind, Method};

/// Calls `method` on a raw instance pointer.
pub struct MemberCallback<T: 'static, M: Method<T>> {
    method: M,
    instance: NonNull<T>,
}

impl<T: 'static, M: Method<T>> MemberCallback<T, M> {
    /// # Safety
    ///
    /// `instance` must stay valid for as long as this callback (or any clone
    /// of it) can be invoked, and must not be borrowed elsewhere while an
    /// invocation runs. For `fn(&mut T, ..)` methods it must also permit
    /// writes, i.e. come from `NonNull::from(&mut x)`. `fn(&T, ..)` methods
    /// only read through it, so `NonNull::from(&x)` is enough.
    pub unsafe fn new(method: M, instance: NonNull<T>) -> Self {
        Self { method, instance }
    }

    pub fn instance(&self) -> NonNull<T> {
        self.instance
    }
}

impl<T: 'static, M: Method<T>> Clone for MemberCallback<T, M> {
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            instance: self.instance,
        }
    }
}

impl<T: 'static, M: Method<T>> Callback<M::Signature> for MemberCallback<T, M> {
    fn invoke(&self, args: M::Args) -> M::Output {
        // SAFETY: upheld by the caller of `MemberCallback::new`.
        unsafe { self.method.call(self.instance, args) }
    }

    fn equals(&self, other: &dyn Callback<M::Signature>) -> bool {
        other.as_any().downcast_ref::<Self>().is_some_and(|other| {
            self.method.addr_eq(other.method) && self.instance == other.instance
        })
    }

    fn clone_box(&self) -> BoxedCallback<M::Signature> {
        Box::new(self.clone())
    }

    fn kind(&self) -> CallbackKind {
        CallbackKind::Member
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: 'static, M: Method<T>> fmt::Debug for MemberCallback<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberCallback")
            .field("instance", &self.instance)
            .field("method", &std::any::type_name::<M>())
            .finish()
    }
}

/// Calls `method` on a raw instance pointer with arguments captured at
/// construction. Exposed as `Callback<fn() -> R>`.
pub struct MemberBindCallback<T: 'static, M: Method<T>> {
    method: M,
    instance: NonNull<T>,
    args: M::Args,
}

impl<T, M> MemberBindCallback<T, M>
where
    T: 'static,
    M: Method<T>,
    M::Args: Clone + PartialEq,
{
    /// # Safety
    ///
    /// Same contract as [`MemberCallback::new`].
    pub unsafe fn new(method: M, instance: NonNull<T>, args: M::Args) -> Self {
        Self {
            method,
            instance,
            args,
        }
    }

    pub fn args(&self) -> &M::Args {
        &self.args
    }
}

impl<T, M> Clone for MemberBindCallback<T, M>
where
    T: 'static,
    M: Method<T>,
    M::Args: Clone + PartialEq,
{
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            instance: self.instance,
            args: self.args.clone(),
        }
    }
}

impl<T, M> Callback<fn() -> M::Output> for MemberBindCallback<T, M>
where
    T: 'static,
    M: Method<T>,
    M::Args: Clone + PartialEq,
{
    fn invoke(&self, _args: ()) -> M::Output {
        // SAFETY: upheld by the caller of `MemberBindCallback::new`.
        unsafe { self.method.call(self.instance, self.args.clone()) }
    }

    fn equals(&self, other: &dyn Callback<fn() -> M::Output>) -> bool {
        other.as_any().downcast_ref::<Self>().is_some_and(|other| {
            self.method.addr_eq(other.method)
                && self.instance == other.instance
                && self.args == other.args
        })
    }

    fn clone_box(&self) -> BoxedCallback<fn() -> M::Output> {
        Box::new(self.clone())
    }

    fn kind(&self) -> CallbackKind {
        CallbackKind::MemberBound
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: 'static, M: Method<T>> fmt::Debug for MemberBindCallback<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberBindCallback")
            .field("instance", &self.instance)
            .field("method", &std::any::type_name::<M>())
            .finish_non_exhaustive()
    }
}

/// Calls `method` on an `Rc<RefCell<T>>` it does not keep alive.
///
/// Once the last strong reference is gone, invoking returns
/// `Output::default()`. The instance is mutably borrowed for the duration of
/// the call, so a method that re-enters the same instance panics.
pub struct WeakMemberCallback<T: 'static, M: Method<T>> {
    method: M,
    instance: Weak<RefCell<T>>,
}

impl<T: 'static, M: Method<T>> WeakMemberCallback<T, M> {
    pub fn new(method: M, instance: &Rc<RefCell<T>>) -> Self {
        Self {
            method,
            instance: Rc::downgrade(instance),
        }
    }

    /// Whether the instance is still alive.
    pub fn is_alive(&self) -> bool {
        self.instance.strong_count() > 0
    }
}

impl<T: 'static, M: Method<T>> Clone for WeakMemberCallback<T, M> {
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            instance: self.instance.clone(),
        }
    }
}

impl<T, M> Callback<M::Signature> for WeakMemberCallback<T, M>
where
    T: 'static,
    M: Method<T>,
    M::Output: Default,
{
    fn invoke(&self, args: M::Args) -> M::Output {
        match self.instance.upgrade() {
            Some(instance) => {
                let mut this = instance.borrow_mut();
                // SAFETY: the `RefMut` guard holds the only borrow until the call returns.
                unsafe { self.method.call(NonNull::from(&mut *this), args) }
            }
            None => {
                tracing::debug!(
                    instance = std::any::type_name::<T>(),
                    "weak member instance dropped; returning default"
                );
                M::Output::default()
            }
        }
    }

    fn equals(&self, other: &dyn Callback<M::Signature>) -> bool {
        other.as_any().downcast_ref::<Self>().is_some_and(|other| {
            self.method.addr_eq(other.method) && Weak::ptr_eq(&self.instance, &other.instance)
        })
    }

    fn clone_box(&self) -> BoxedCallback<M::Signature> {
        Box::new(self.clone())
    }

    fn kind(&self) -> CallbackKind {
        CallbackKind::WeakMember
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: 'static, M: Method<T>> fmt::Debug for WeakMemberCallback<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakMemberCallback")
            .field("alive", &self.is_alive())
            .field("method", &std::any::type_name::<M>())
            .finish()
    }
}

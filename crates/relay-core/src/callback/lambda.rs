//! Lambda / functor callbacks.
//!
//! Closures cannot be compared by value, so identity is the closure's
//! `TypeId`. Two closures of the same type compare equal whatever they
//! captured:
//!
//! ```ignore
//! fn adder(n: i32) -> impl Fn(i32) -> i32 + Clone { move |x| x + n }
//! assert!(make_lambda(adder(1)) == make_lambda(adder(2)));
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use super::{BoxedCallback, Callback, CallbackKind, Lambda, Signature};

/// Owns a closure and calls it with the runtime arguments.
pub struct LambdaCallback<F, S> {
    func: F,
    tag: TypeId,
    _signature: PhantomData<S>,
}

impl<F, S> LambdaCallback<F, S>
where
    S: Signature,
    F: Lambda<S>,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            tag: TypeId::of::<F>(),
            _signature: PhantomData,
        }
    }

    pub fn tag(&self) -> TypeId {
        self.tag
    }
}

impl<F, S> Clone for LambdaCallback<F, S>
where
    S: Signature,
    F: Lambda<S>,
{
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            tag: self.tag,
            _signature: PhantomData,
        }
    }
}

impl<F, S> Callback<S> for LambdaCallback<F, S>
where
    S: Signature,
    F: Lambda<S>,
{
    fn invoke(&self, args: S::Args) -> S::Output {
        self.func.call(args)
    }

    fn equals(&self, other: &dyn Callback<S>) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self.tag == other.tag)
    }

    fn clone_box(&self) -> BoxedCallback<S> {
        Box::new(self.clone())
    }

    fn kind(&self) -> CallbackKind {
        CallbackKind::Lambda
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<F, S> fmt::Debug for LambdaCallback<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaCallback")
            .field("closure", &std::any::type_name::<F>())
            .finish()
    }
}

/// Owns a closure plus the arguments to call it with. Exposed as
/// `Callback<fn() -> R>`.
pub struct LambdaBindCallback<F, S: Signature> {
    func: F,
    tag: TypeId,
    args: S::Args,
}

impl<F, S> LambdaBindCallback<F, S>
where
    S: Signature,
    S::Args: Clone + PartialEq,
    F: Lambda<S>,
{
    pub fn new(func: F, args: S::Args) -> Self {
        Self {
            func,
            tag: TypeId::of::<F>(),
            args,
        }
    }

    pub fn args(&self) -> &S::Args {
        &self.args
    }
}

impl<F, S> Clone for LambdaBindCallback<F, S>
where
    S: Signature,
    S::Args: Clone + PartialEq,
    F: Lambda<S>,
{
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            tag: self.tag,
            args: self.args.clone(),
        }
    }
}

impl<F, S> Callback<fn() -> S::Output> for LambdaBindCallback<F, S>
where
    S: Signature,
    S::Args: Clone + PartialEq,
    F: Lambda<S>,
{
    fn invoke(&self, _args: ()) -> S::Output {
        self.func.call(self.args.clone())
    }

    fn equals(&self, other: &dyn Callback<fn() -> S::Output>) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self.tag == other.tag && self.args == other.args)
    }

    fn clone_box(&self) -> BoxedCallback<fn() -> S::Output> {
        Box::new(self.clone())
    }

    fn kind(&self) -> CallbackKind {
        CallbackKind::LambdaBound
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<F, S: Signature> fmt::Debug for LambdaBindCallback<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaBindCallback")
            .field("closure", &std::any::type_name::<F>())
            .finish_non_exhaustive()
    }
}

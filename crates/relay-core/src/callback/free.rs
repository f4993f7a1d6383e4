//! Free-function callbacks, with and without bound arguments.

use std::any::Any;
use std::fmt;

use super::{BoxedCallback, Callback, CallbackKind, Signature};

/// Calls a plain function pointer with the runtime arguments.
pub struct FreeCallback<S: Signature> {
    func: S,
}

impl<S: Signature> FreeCallback<S> {
    pub fn new(func: S) -> Self {
        Self { func }
    }
}

impl<S: Signature> Clone for FreeCallback<S> {
    fn clone(&self) -> Self {
        Self::new(self.func)
    }
}

impl<S: Signature> Callback<S> for FreeCallback<S> {
    fn invoke(&self, args: S::Args) -> S::Output {
        self.func.call(args)
    }

    fn equals(&self, other: &dyn Callback<S>) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self.func.addr_eq(other.func))
    }

    fn clone_box(&self) -> BoxedCallback<S> {
        Box::new(self.clone())
    }

    fn kind(&self) -> CallbackKind {
        CallbackKind::Free
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<S: Signature> fmt::Debug for FreeCallback<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeCallback")
            .field("signature", &std::any::type_name::<S>())
            .finish()
    }
}

/// Calls a function pointer with arguments captured at construction.
///
/// The argument list is erased: a `FreeBindCallback<fn(i32, u8) -> R>` is a
/// `Callback<fn() -> R>`. Each invocation applies a clone of the stored tuple.
pub struct FreeBindCallback<F: Signature> {
    func: F,
    args: F::Args,
}

impl<F> FreeBindCallback<F>
where
    F: Signature,
    F::Args: Clone + PartialEq,
{
    pub fn new(func: F, args: F::Args) -> Self {
        Self { func, args }
    }

    pub fn args(&self) -> &F::Args {
        &self.args
    }
}

impl<F> Clone for FreeBindCallback<F>
where
    F: Signature,
    F::Args: Clone + PartialEq,
{
    fn clone(&self) -> Self {
        Self::new(self.func, self.args.clone())
    }
}

impl<F> Callback<fn() -> F::Output> for FreeBindCallback<F>
where
    F: Signature,
    F::Args: Clone + PartialEq,
{
    fn invoke(&self, _args: ()) -> F::Output {
        self.func.call(self.args.clone())
    }

    fn equals(&self, other: &dyn Callback<fn() -> F::Output>) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self.func.addr_eq(other.func) && self.args == other.args)
    }

    fn clone_box(&self) -> BoxedCallback<fn() -> F::Output> {
        Box::new(self.clone())
    }

    fn kind(&self) -> CallbackKind {
        CallbackKind::FreeBound
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<F: Signature> fmt::Debug for FreeBindCallback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeBindCallback")
            .field("signature", &std::any::type_name::<F>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::LambdaCallback;
    use rstest::rstest;
    use std::cell::RefCell;

    thread_local! {
        static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn drain_calls() -> Vec<String> {
        CALLS.with(|c| c.borrow_mut().drain(..).collect())
    }

    fn record(name: i32) {
        CALLS.with(|c| c.borrow_mut().push(format!("record({name})")));
    }

    fn record_other(name: i32) {
        CALLS.with(|c| c.borrow_mut().push(format!("record_other({name})")));
    }

    fn pair(a: u8, b: &'static str) -> String {
        format!("{a}:{b}")
    }

    #[test]
    fn free_callback_forwards_runtime_arguments() {
        drain_calls();
        let cb = FreeCallback::new(record as fn(i32));
        cb.invoke((7,));
        cb.invoke((8,));
        assert_eq!(drain_calls(), vec!["record(7)", "record(8)"]);
    }

    #[test]
    fn free_callback_equality_follows_pointer() {
        let a = FreeCallback::new(record as fn(i32));
        let b = FreeCallback::new(record as fn(i32));
        let c = FreeCallback::new(record_other as fn(i32));

        assert!(a.equals(&a));
        assert!(a.equals(&b) && b.equals(&a));
        assert!(!a.equals(&c));
    }

    #[test]
    fn free_callback_clone_is_equal_and_behaves_the_same() {
        drain_calls();
        let a = FreeCallback::new(record as fn(i32));
        let b = a.clone_box();
        assert!(a.equals(&*b));

        a.invoke((1,));
        b.invoke((1,));
        assert_eq!(drain_calls(), vec!["record(1)", "record(1)"]);
    }

    #[test]
    fn bound_callback_applies_stored_tuple() {
        let cb = FreeBindCallback::new(pair as fn(u8, &'static str) -> String, (3, "x"));
        assert_eq!(cb.invoke(()), "3:x");
        // 何度呼んでも同じ引数
        assert_eq!(cb.invoke(()), "3:x");
        assert_eq!(cb.args(), &(3, "x"));
    }

    #[rstest]
    #[case::same_args(record as fn(i32), 5, true)]
    #[case::different_args(record as fn(i32), 6, false)]
    #[case::different_function(record_other as fn(i32), 5, false)]
    fn bound_callback_equality(
        #[case] func: fn(i32),
        #[case] arg: i32,
        #[case] expected: bool,
    ) {
        let base = FreeBindCallback::new(record as fn(i32), (5,));
        let other = FreeBindCallback::new(func, (arg,));
        assert_eq!(base.equals(&other), expected);
        assert_eq!(other.equals(&base), expected);
    }

    #[test]
    fn cross_kind_comparison_is_false() {
        fn unit() {}

        let free = FreeCallback::new(unit as fn());
        let bound = FreeBindCallback::new(record as fn(i32), (1,));
        let lambda = LambdaCallback::<_, fn()>::new(unit as fn());

        assert!(!free.equals(&bound));
        assert!(!bound.equals(&free));
        assert!(!free.equals(&lambda));
        assert!(!lambda.equals(&free));
    }

    #[test]
    fn bound_callbacks_over_different_shapes_never_match() {
        fn takes_u8(_: u8) {}
        fn takes_i32(_: i32) {}

        let a = FreeBindCallback::new(takes_u8 as fn(u8), (1,));
        let b = FreeBindCallback::new(takes_i32 as fn(i32), (1,));
        assert!(!a.equals(&b));
    }
}

//! Signature - 呼び出し形状（引数タプル + 戻り値）の型レベル表現
//!
//! # 学習ポイント
//! - fn ポインタ型そのものをシグネチャのマーカーとして使う（`fn(i32) -> bool`）
//! - macro_rules! で arity ごとの impl を生成（可変長ジェネリクスの代わり）
//! - 引数はタプルに詰めて運び、呼び出し時に位置どおり展開する

use std::ptr::{self, NonNull};

/// A free-function pointer shape such as `fn(i32, String) -> bool`.
///
/// Used as the signature parameter of [`Callback`](super::Callback),
/// [`Delegate`](crate::Delegate) and [`Event`](crate::Event). Implemented for
/// `fn(..) -> R` with up to six arguments.
///
/// Argument and return types must be `'static`, so shapes with borrowed
/// parameters such as `fn(&str)` are not expressible. Pass owned values
/// (`String`, `Rc<str>`) instead.
pub trait Signature: Copy + 'static {
    /// Arguments packed as a tuple, in declaration order.
    type Args: 'static;
    type Output: 'static;

    /// Calls the pointer with `args` expanded positionally.
    fn call(self, args: Self::Args) -> Self::Output;

    /// Whether both pointers refer to the same function.
    ///
    /// Compares addresses. A function is not guaranteed a single address, so
    /// `#[inline]` or generic functions instantiated in different crates may
    /// compare unequal to themselves.
    fn addr_eq(self, other: Self) -> bool;
}

/// A method pointer shape: `fn(&mut T, ..) -> R` or `fn(&T, ..) -> R`.
///
/// ```ignore
/// let bump = Counter::bump as fn(&mut Counter, u32);
/// ```
pub trait Method<T: 'static>: Copy + 'static {
    type Args: 'static;
    type Output: 'static;

    /// The free-function shape left once the receiver is supplied.
    type Signature: Signature<Args = Self::Args, Output = Self::Output>;

    /// Calls the method on `this`.
    ///
    /// `&T` shapes only read through `this`; `&mut T` shapes write through it.
    ///
    /// # Safety
    ///
    /// `this` must point to a live `T` with no conflicting borrow for the
    /// duration of the call. For `&mut T` shapes it must also permit writes,
    /// i.e. come from a unique borrow such as `NonNull::from(&mut x)`.
    unsafe fn call(self, this: NonNull<T>, args: Self::Args) -> Self::Output;

    fn addr_eq(self, other: Self) -> bool;
}

/// A closure or functor value callable with the shape `S`.
///
/// `S` is inferred from the value's own `Fn` impl, so `make_lambda(|x: i32| x + 1)`
/// picks `fn(i32) -> i32` without annotations at the call site.
pub trait Lambda<S: Signature>: Clone + 'static {
    fn call(&self, args: S::Args) -> S::Output;
}

macro_rules! impl_shapes {
    ($($arg:ident),*) => {
        impl<R: 'static, $($arg: 'static),*> Signature for fn($($arg),*) -> R {
            type Args = ($($arg,)*);
            type Output = R;

            #[allow(non_snake_case)]
            fn call(self, ($($arg,)*): Self::Args) -> R {
                self($($arg),*)
            }

            fn addr_eq(self, other: Self) -> bool {
                ptr::fn_addr_eq(self, other)
            }
        }

        impl<T: 'static, R: 'static, $($arg: 'static),*> Method<T> for fn(&mut T, $($arg),*) -> R {
            type Args = ($($arg,)*);
            type Output = R;
            type Signature = fn($($arg),*) -> R;

            #[allow(non_snake_case)]
            unsafe fn call(self, this: NonNull<T>, ($($arg,)*): Self::Args) -> R {
                // SAFETY: the caller guarantees a live, writable, unaliased `T`.
                self(unsafe { &mut *this.as_ptr() }, $($arg),*)
            }

            fn addr_eq(self, other: Self) -> bool {
                ptr::fn_addr_eq(self, other)
            }
        }

        impl<T: 'static, R: 'static, $($arg: 'static),*> Method<T> for fn(&T, $($arg),*) -> R {
            type Args = ($($arg,)*);
            type Output = R;
            type Signature = fn($($arg),*) -> R;

            #[allow(non_snake_case)]
            unsafe fn call(self, this: NonNull<T>, ($($arg,)*): Self::Args) -> R {
                // SAFETY: the caller guarantees a live `T` with no unique borrow.
                self(unsafe { this.as_ref() }, $($arg),*)
            }

            fn addr_eq(self, other: Self) -> bool {
                ptr::fn_addr_eq(self, other)
            }
        }

        impl<F, R: 'static, $($arg: 'static),*> Lambda<fn($($arg),*) -> R> for F
        where
            F: Fn($($arg),*) -> R + Clone + 'static,
        {
            #[allow(non_snake_case)]
            fn call(&self, ($($arg,)*): ($($arg,)*)) -> R {
                self($($arg),*)
            }
        }
    };
}

impl_shapes!();
impl_shapes!(A1);
impl_shapes!(A1, A2);
impl_shapes!(A1, A2, A3);
impl_shapes!(A1, A2, A3, A4);
impl_shapes!(A1, A2, A3, A4, A5);
impl_shapes!(A1, A2, A3, A4, A5, A6);

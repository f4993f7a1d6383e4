//! Event - 順序付き・重複なしの複数 Callback 保持
//!
//! # 学習ポイント
//! - `Vec<Box<dyn Callback<S>>>` を「挿入順を保つ集合」として扱う
//! - 重複判定は `Callback::equals` のみ（線形走査）
//! - `+=` / `-=` を `AddAssign` / `SubAssign` で提供
//!
//! `invoke` は `&self` を借用したまま全件を呼ぶため、呼び出し中に
//! 購読リストが変わることはない（開始時点のスナップショットが全件呼ばれる）。

use std::fmt;
use std::ops::{AddAssign, SubAssign};

use crate::callback::{BoxedCallback, Callback, CallbackKind, Signature};
use crate::error::CallbackError;

/// Ordered, deduplicated set of callbacks invoked together.
///
/// ```ignore
/// let mut on_resize: Event<fn(u32, u32)> = Event::new();
/// on_resize += make_free(relayout as fn(u32, u32));
/// on_resize += make_lambda(|w: u32, h: u32| println!("{w}x{h}"));
/// on_resize.invoke((800, 600));
/// ```
pub struct Event<S: Signature> {
    callbacks: Vec<BoxedCallback<S>>,
}

impl<S: Signature> Event<S> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Appends `callback` unless an equal one is already subscribed.
    ///
    /// Returns whether it was appended.
    pub fn subscribe(&mut self, callback: BoxedCallback<S>) -> bool {
        if self.contains(&*callback) {
            tracing::debug!(kind = %callback.kind(), "already subscribed; ignoring");
            return false;
        }
        tracing::trace!(kind = %callback.kind(), position = self.callbacks.len(), "subscribed");
        self.callbacks.push(callback);
        true
    }

    /// Like [`subscribe`](Self::subscribe) but reports a duplicate as an error.
    pub fn try_subscribe(&mut self, callback: BoxedCallback<S>) -> Result<(), CallbackError> {
        let kind = callback.kind();
        if self.subscribe(callback) {
            Ok(())
        } else {
            Err(CallbackError::AlreadySubscribed(kind))
        }
    }

    /// Removes the first entry equal to `callback`.
    ///
    /// Returns whether anything was removed.
    pub fn unsubscribe(&mut self, callback: &dyn Callback<S>) -> bool {
        match self.position(callback) {
            Some(index) => {
                tracing::trace!(kind = %callback.kind(), position = index, "unsubscribed");
                self.callbacks.remove(index);
                true
            }
            None => {
                tracing::debug!(kind = %callback.kind(), "not subscribed; nothing to remove");
                false
            }
        }
    }

    /// Like [`unsubscribe`](Self::unsubscribe) but reports a miss as an error.
    pub fn try_unsubscribe(&mut self, callback: &dyn Callback<S>) -> Result<(), CallbackError> {
        if self.unsubscribe(callback) {
            Ok(())
        } else {
            Err(CallbackError::NotSubscribed(callback.kind()))
        }
    }

    /// Calls every subscriber in subscription order; results are discarded.
    ///
    /// The subscriber list cannot change while this runs. A callback that
    /// needs to subscribe or unsubscribe (itself included) should reach a
    /// shared `Rc<RefCell<Event<S>>>` and have the caller dispatch from a
    /// clone, so no borrow is held during the call:
    ///
    /// ```ignore
    /// let snapshot = bus.borrow().clone();
    /// snapshot.invoke(args);
    /// ```
    ///
    /// Calling `bus.borrow().invoke(..)` directly makes such a callback panic
    /// with `BorrowMutError`.
    pub fn invoke(&self, args: S::Args)
    where
        S::Args: Clone,
    {
        tracing::trace!(subscribers = self.callbacks.len(), "invoking event");
        for callback in &self.callbacks {
            callback.invoke(args.clone());
        }
    }

    pub fn contains(&self, callback: &dyn Callback<S>) -> bool {
        self.position(callback).is_some()
    }

    fn position(&self, callback: &dyn Callback<S>) -> Option<usize> {
        self.callbacks
            .iter()
            .position(|existing| existing.equals(callback))
    }

    /// Kinds of the subscribers, in invocation order.
    pub fn kinds(&self) -> Vec<CallbackKind> {
        self.callbacks.iter().map(|callback| callback.kind()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoxedCallback<S>> {
        self.callbacks.iter()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

impl<S: Signature> Default for Event<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signature> Clone for Event<S> {
    fn clone(&self) -> Self {
        Self {
            callbacks: self.callbacks.iter().map(|callback| callback.clone_box()).collect(),
        }
    }
}

impl<S: Signature> AddAssign<BoxedCallback<S>> for Event<S> {
    fn add_assign(&mut self, callback: BoxedCallback<S>) {
        self.subscribe(callback);
    }
}

impl<S: Signature> SubAssign<BoxedCallback<S>> for Event<S> {
    fn sub_assign(&mut self, callback: BoxedCallback<S>) {
        self.unsubscribe(&*callback);
    }
}

impl<S: Signature> fmt::Debug for Event<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("callbacks", &self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{make_free, make_free_bound, make_lambda, make_lambda_bound};
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    thread_local! {
        static TRACE: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn drain_trace() -> Vec<String> {
        TRACE.with(|t| t.borrow_mut().drain(..).collect())
    }

    fn push(name: &str) {
        TRACE.with(|t| t.borrow_mut().push(name.to_string()));
    }

    fn a() {
        push("a");
    }

    fn b() {
        push("b");
    }

    fn c() {
        push("c");
    }

    fn labelled(n: i32) {
        push(&format!("labelled({n})"));
    }

    thread_local! {
        static BUS: Rc<RefCell<Event<fn()>>> = Rc::new(RefCell::new(Event::new()));
    }

    fn once() {
        push("once");
        BUS.with(|bus| bus.borrow_mut().unsubscribe(&*make_free(once as fn())));
    }

    fn dispatch_bus() {
        let snapshot = BUS.with(|bus| bus.borrow().clone());
        snapshot.invoke(());
    }

    #[test]
    fn new_event_is_empty() {
        let event: Event<fn()> = Event::new();
        assert!(event.is_empty());
        assert_eq!(event.len(), 0);
        event.invoke(());
    }

    #[test]
    fn invoke_follows_subscription_order() {
        drain_trace();
        let mut event: Event<fn()> = Event::new();
        event.subscribe(make_free(a as fn()));
        event.subscribe(make_free(b as fn()));
        event.subscribe(make_free(c as fn()));

        event.invoke(());
        assert_eq!(drain_trace(), vec!["a", "b", "c"]);
    }

    #[test]
    fn subscribe_is_idempotent() {
        drain_trace();
        let mut event: Event<fn()> = Event::new();
        assert!(event.subscribe(make_free(a as fn())));
        assert!(event.subscribe(make_free(b as fn())));
        assert!(!event.subscribe(make_free(a as fn())));

        assert_eq!(event.len(), 2);
        event.invoke(());
        assert_eq!(drain_trace(), vec!["a", "b"]);
    }

    #[rstest]
    #[case::first(a as fn(), vec!["b", "c"])]
    #[case::middle(b as fn(), vec!["a", "c"])]
    #[case::last(c as fn(), vec!["a", "b"])]
    fn unsubscribe_removes_only_the_match(#[case] target: fn(), #[case] expected: Vec<&str>) {
        drain_trace();
        let mut event: Event<fn()> = Event::new();
        event += make_free(a as fn());
        event += make_free(b as fn());
        event += make_free(c as fn());

        assert!(event.unsubscribe(&*make_free(target)));
        event.invoke(());
        assert_eq!(drain_trace(), expected);
    }

    #[test]
    fn unsubscribe_missing_leaves_sequence_untouched() {
        let mut event: Event<fn()> = Event::new();
        event += make_free(a as fn());
        event += make_free_bound(labelled as fn(i32), (1,));

        assert!(!event.unsubscribe(&*make_free(b as fn())));
        assert!(!event.unsubscribe(&*make_free_bound(labelled as fn(i32), (2,))));
        assert_eq!(event.kinds(), vec![CallbackKind::Free, CallbackKind::FreeBound]);
    }

    #[test]
    fn bound_arguments_distinguish_subscribers() {
        drain_trace();
        let mut event: Event<fn()> = Event::new();
        event += make_free_bound(labelled as fn(i32), (1,));
        event += make_free_bound(labelled as fn(i32), (2,));
        event += make_free_bound(labelled as fn(i32), (1,));
        assert_eq!(event.len(), 2);

        event -= make_free_bound(labelled as fn(i32), (1,));
        event.invoke(());
        assert_eq!(drain_trace(), vec!["labelled(2)"]);
    }

    #[test]
    fn lambda_of_same_type_is_deduplicated_regardless_of_capture() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = |tag: &'static str| {
            let log = Rc::clone(&log);
            move |n: i32| log.borrow_mut().push(format!("{tag}:{n}"))
        };

        let mut event: Event<fn(i32)> = Event::new();
        assert!(event.subscribe(make_lambda(listener("first"))));
        assert!(!event.subscribe(make_lambda(listener("second"))));

        event.invoke((9,));
        assert_eq!(*log.borrow(), vec!["first:9"]);

        // 別のキャプチャでも同じ型なので外せる
        event -= make_lambda(listener("third"));
        assert!(event.is_empty());
    }

    #[test]
    fn try_variants_report_duplicates_and_misses() {
        let mut event: Event<fn()> = Event::new();
        assert_eq!(event.try_subscribe(make_free(a as fn())), Ok(()));

        let err = event.try_subscribe(make_free(a as fn())).unwrap_err();
        assert_eq!(err, CallbackError::AlreadySubscribed(CallbackKind::Free));
        assert_eq!(err.to_string(), "free callback is already subscribed");

        let missing = make_lambda_bound(|_: u8| (), (1,));
        let err = event.try_unsubscribe(&*missing).unwrap_err();
        assert_eq!(err, CallbackError::NotSubscribed(CallbackKind::LambdaBound));

        assert_eq!(event.try_unsubscribe(&*make_free(a as fn())), Ok(()));
        assert!(event.is_empty());
    }

    #[test]
    fn invoke_passes_same_arguments_to_everyone() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&seen);
        let second = Rc::clone(&seen);

        let mut event: Event<fn(String, u8)> = Event::new();
        event += make_lambda(move |s: String, n: u8| first.borrow_mut().push(format!("1:{s}:{n}")));
        event += make_lambda(move |s: String, n: u8| second.borrow_mut().push(format!("2:{s}:{n}")));

        event.invoke(("x".to_string(), 3));
        assert_eq!(*seen.borrow(), vec!["1:x:3", "2:x:3"]);
    }

    #[test]
    fn clone_copies_every_entry_in_order() {
        drain_trace();
        let mut original: Event<fn()> = Event::new();
        original += make_free(c as fn());
        original += make_free(a as fn());

        let copy = original.clone();
        original.clear();
        assert!(original.is_empty());

        copy.invoke(());
        assert_eq!(drain_trace(), vec!["c", "a"]);
        assert!(copy.iter().zip([c as fn(), a as fn()]).all(|(cb, f)| cb.equals(&*make_free(f))));
    }

    #[test]
    fn callback_can_unsubscribe_itself_through_snapshot() {
        drain_trace();
        BUS.with(|bus| {
            let mut bus = bus.borrow_mut();
            bus.clear();
            bus.subscribe(make_free(once as fn()));
            bus.subscribe(make_free(a as fn()));
        });

        // 呼び出し中に自分を外しても、その回は全件呼ばれる
        dispatch_bus();
        assert_eq!(drain_trace(), vec!["once", "a"]);
        assert_eq!(BUS.with(|bus| bus.borrow().kinds()), vec![CallbackKind::Free]);

        dispatch_bus();
        assert_eq!(drain_trace(), vec!["a"]);
    }

    #[test]
    fn debug_lists_kinds() {
        let mut event: Event<fn()> = Event::new();
        event += make_free(a as fn());
        event += make_lambda(|| ());
        assert_eq!(format!("{event:?}"), "Event { callbacks: [Free, Lambda] }");
    }
}

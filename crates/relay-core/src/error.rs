use thiserror::Error;

use crate::callback::CallbackKind;

/// Errors reported by the fallible front-ends of `Delegate` and `Event`.
///
/// The plain operations (`invoke`, `subscribe`, `unsubscribe`) never fail;
/// these variants only surface through the `try_*` variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("delegate has no callback bound")]
    Unbound,

    #[error("{0} callback is already subscribed")]
    AlreadySubscribed(CallbackKind),

    #[error("{0} callback is not subscribed")]
    NotSubscribed(CallbackKind),
}

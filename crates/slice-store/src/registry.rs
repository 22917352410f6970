//! Ordered subscriber registry and the notification loop shared by both stores.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{BoxError, SubscriberError, SubscriberFailure};

/// Handle returned by `subscribe`. Its only use is `unsubscribe`.
///
/// Ids are never reused within a store, so a stale handle can never remove
/// somebody else's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Subscribers in insertion order.
pub(crate) struct Registry<C> {
    entries: Vec<(SubscriptionId, C)>,
    next_id: u64,
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn insert(&mut self, callback: C) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Remove a subscriber. Returns false if the id was not registered.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<C: Clone> Registry<C> {
    /// Copy of the current subscriber list, taken before a notification loop.
    pub fn snapshot(&self) -> Vec<(SubscriptionId, C)> {
        self.entries.clone()
    }
}

/// Notify `subscribers` with `state`, in order.
///
/// A subscriber removed while the loop runs is skipped. Errors and panics are
/// collected so one failing callback never stops the rest.
pub(crate) fn notify<T, C>(
    label: &str,
    subscribers: Vec<(SubscriptionId, C)>,
    state: &T,
    is_active: impl Fn(SubscriptionId) -> bool,
    call: impl Fn(&C, &T) -> Result<(), BoxError>,
) -> Vec<SubscriberError> {
    let mut failures = Vec::new();

    for (id, callback) in subscribers {
        if !is_active(id) {
            log::trace!("[{}] skipping subscriber {} removed mid-loop", label, id);
            continue;
        }

        log::trace!("[{}] notifying subscriber {}", label, id);
        let failure = match panic::catch_unwind(AssertUnwindSafe(|| call(&callback, state))) {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => SubscriberFailure::Failed(err),
            Err(payload) => SubscriberFailure::Panicked(panic_message(payload.as_ref())),
        };

        log::warn!("[{}] subscriber {} failed: {}", label, id, failure);
        failures.push(SubscriberError { id, failure });
    }

    failures
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

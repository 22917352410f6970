//! Error types surfaced by reducers, subscribers and `dispatch`.

use thiserror::Error;

use crate::registry::SubscriptionId;

/// Boxed error accepted from fallible reducers and subscribers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised when reading an erased value as a concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The stored value is not of the requested type.
    #[error("payload type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The declared discriminator disagrees with the one implied by the payload.
    #[error("discriminator mismatch: declared {declared}, payload implies {implied}")]
    KindMismatch { declared: String, implied: String },
}

/// Errors a reducer may return instead of a next state.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// The reducer read the payload (or metadata) as the wrong type.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// The reducer refused the action.
    #[error("action rejected: {0}")]
    Rejected(String),

    /// Any other failure raised while computing the next state.
    #[error(transparent)]
    Other(BoxError),
}

impl ReduceError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }
}

/// How a single subscriber callback failed.
#[derive(Debug, Error)]
pub enum SubscriberFailure {
    /// The callback returned an error.
    #[error("{0}")]
    Failed(BoxError),

    /// The callback panicked; the panic message is kept when it is a string.
    #[error("panicked: {0}")]
    Panicked(String),
}

/// A subscriber that failed during a notification loop.
#[derive(Debug, Error)]
#[error("subscriber {id} failed: {failure}")]
pub struct SubscriberError {
    pub id: SubscriptionId,
    #[source]
    pub failure: SubscriberFailure,
}

/// Errors returned by `dispatch`.
///
/// Each variant maps to one failure kind so callers can decide whether to
/// retry, log or surface the problem.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The reducer failed; the store kept its previous state and nobody was notified.
    #[error("reducer failed: {0}")]
    Reducer(#[from] ReduceError),

    /// The state was replaced but one or more subscribers failed.
    /// Every other subscriber was still notified.
    #[error("{} subscriber(s) failed", .0.len())]
    Subscribers(Vec<SubscriberError>),

    /// Dispatches queued by subscribers during this call failed when they ran.
    #[error("{} deferred dispatch(es) failed", .0.len())]
    Deferred(Vec<DispatchError>),

    /// The caller's own dispatch failed and so did dispatches queued behind it.
    #[error("{own}; {} deferred dispatch(es) also failed", .deferred.len())]
    WithDeferred {
        own: Box<DispatchError>,
        deferred: Vec<DispatchError>,
    },

    /// Too many dispatches were queued behind the running one.
    #[error("pending dispatch queue is full ({capacity} actions)")]
    QueueFull { capacity: usize },

    /// The store behind a dispatcher has been dropped.
    #[error("store has been dropped")]
    StoreClosed,
}

impl DispatchError {
    /// True when the reducer failed because a payload was read as the wrong type.
    pub fn is_payload_mismatch(&self) -> bool {
        matches!(self, Self::Reducer(ReduceError::Payload(_)))
    }

    /// True when the store state was left untouched by this error.
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Self::Reducer(_) | Self::QueueFull { .. } | Self::StoreClosed
        )
    }
}

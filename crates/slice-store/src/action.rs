//! Action envelope.
//!
//! Each domain describes its payloads as one enum. The enum variant fixes
//! both the discriminator and the payload type, so a `Transit` action can
//! never carry a patient record. `Action<P>` wraps that enum together with
//! optional metadata and an error flag.
//!
//! For dispatch across unrelated domains there is the erased [`AnyAction`],
//! which checks payload types when they are read instead of at compile time.

mod erased;

pub use erased::{AnyAction, Value};

use std::any::Any;
use std::fmt;
use std::hash::Hash;

use crate::error::PayloadError;

/// A domain payload enum.
///
/// `Kind` is the domain's discriminator; every variant of the payload enum
/// maps to exactly one kind.
pub trait ActionPayload: fmt::Debug + 'static {
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

/// A typed action: payload, optional metadata and error flag.
#[derive(Debug, Clone)]
pub struct Action<P> {
    payload: P,
    meta: Option<Value>,
    error: bool,
}

impl<P: ActionPayload> Action<P> {
    /// Wrap a payload. Domains expose named factory functions on top of this.
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            meta: None,
            error: false,
        }
    }

    /// Wrap a payload that reports a failure rather than a state transition.
    pub fn failed(payload: P) -> Self {
        Self {
            error: true,
            ..Self::new(payload)
        }
    }

    /// Attach side-channel metadata. Reducers are free to ignore it.
    pub fn with_meta<M: Any + Send + Sync>(mut self, meta: M) -> Self {
        self.meta = Some(Value::new(meta));
        self
    }

    pub fn kind(&self) -> P::Kind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Read the metadata as `M`.
    ///
    /// Returns `Ok(None)` when no metadata is attached and an error when
    /// metadata of another type is.
    pub fn meta<M: Any>(&self) -> Result<Option<&M>, PayloadError> {
        self.meta.as_ref().map(Value::get::<M>).transpose()
    }

    /// Metadata without interpreting it.
    pub fn raw_meta(&self) -> Option<&Value> {
        self.meta.as_ref()
    }

    /// Move into the erased envelope for heterogeneous dispatch.
    pub fn erase(self) -> AnyAction
    where
        P: Send + Sync,
    {
        AnyAction::from_parts(
            Value::new(self.payload.kind()),
            Value::new(self.payload),
            self.meta,
            self.error,
        )
    }
}

impl<P: ActionPayload> From<P> for Action<P> {
    fn from(payload: P) -> Self {
        Self::new(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum CounterKind {
        Add,
        Reset,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Counter {
        Add(i64),
        Reset,
    }

    impl ActionPayload for Counter {
        type Kind = CounterKind;

        fn kind(&self) -> CounterKind {
            match self {
                Counter::Add(_) => CounterKind::Add,
                Counter::Reset => CounterKind::Reset,
            }
        }
    }

    #[derive(Debug, PartialEq)]
    struct TraceId(&'static str);

    #[test]
    fn test_defaults() {
        let action = Action::new(Counter::Add(2));
        assert_eq!(action.kind(), CounterKind::Add);
        assert_eq!(action.payload(), &Counter::Add(2));
        assert!(!action.is_error());
        assert!(action.raw_meta().is_none());
        assert_eq!(action.meta::<TraceId>(), Ok(None));
    }

    #[test]
    fn test_failed_sets_error_flag() {
        let action = Action::failed(Counter::Reset);
        assert!(action.is_error());
        assert_eq!(action.kind(), CounterKind::Reset);
    }

    #[test]
    fn test_meta_typed_read() {
        let action = Action::from(Counter::Reset).with_meta(TraceId("abc"));
        assert_eq!(action.meta::<TraceId>(), Ok(Some(&TraceId("abc"))));

        let err = action.meta::<u32>().unwrap_err();
        assert!(matches!(err, PayloadError::TypeMismatch { expected: "u32", .. }));
    }

    #[test]
    fn test_erase_keeps_envelope_fields() {
        let erased = Action::failed(Counter::Add(5))
            .with_meta(TraceId("xyz"))
            .erase();

        assert_eq!(erased.kind::<CounterKind>(), Ok(CounterKind::Add));
        assert_eq!(erased.payload::<Counter>(), Ok(&Counter::Add(5)));
        assert_eq!(erased.meta::<TraceId>(), Ok(Some(&TraceId("xyz"))));
        assert!(erased.is_error());
    }
}

//! Type-erased values and actions for boundary layers.

use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

use super::{Action, ActionPayload};
use crate::error::PayloadError;

/// A shared, type-erased value that remembers its type name.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: any::type_name::<V>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<V: Any>(&self) -> bool {
        (*self.inner).is::<V>()
    }

    /// Borrow the value as `V`, failing if it holds any other type.
    pub fn get<V: Any>(&self) -> Result<&V, PayloadError> {
        (*self.inner)
            .downcast_ref::<V>()
            .ok_or_else(|| PayloadError::TypeMismatch {
                expected: any::type_name::<V>(),
                found: self.type_name,
            })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.type_name).finish()
    }
}

/// An action whose discriminator and payload types are only known at runtime.
///
/// Construction performs no validation. Every read names the type it
/// expects and fails with [`PayloadError`] on a mismatch.
#[derive(Debug, Clone)]
pub struct AnyAction {
    kind: Value,
    payload: Value,
    meta: Option<Value>,
    error: bool,
}

impl AnyAction {
    pub fn new<K, V>(kind: K, payload: V) -> Self
    where
        K: Any + Send + Sync,
        V: Any + Send + Sync,
    {
        Self::from_parts(Value::new(kind), Value::new(payload), None, false)
    }

    pub(super) fn from_parts(kind: Value, payload: Value, meta: Option<Value>, error: bool) -> Self {
        Self {
            kind,
            payload,
            meta,
            error,
        }
    }

    pub fn with_meta<M: Any + Send + Sync>(mut self, meta: M) -> Self {
        self.meta = Some(Value::new(meta));
        self
    }

    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    /// Read the discriminator as `K`.
    pub fn kind<K: Any + Copy>(&self) -> Result<K, PayloadError> {
        self.kind.get::<K>().copied()
    }

    /// True when the discriminator belongs to the domain whose kind type is `K`.
    pub fn is_kind_of<K: Any>(&self) -> bool {
        self.kind.is::<K>()
    }

    pub fn kind_type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Borrow the payload as `V`.
    pub fn payload<V: Any>(&self) -> Result<&V, PayloadError> {
        self.payload.get::<V>()
    }

    pub fn meta<M: Any>(&self) -> Result<Option<&M>, PayloadError> {
        self.meta.as_ref().map(Value::get::<M>).transpose()
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Recover the typed action.
    ///
    /// Fails when the payload is not a `P`, or when the declared discriminator
    /// differs from the one the payload implies.
    pub fn to_action<P>(&self) -> Result<Action<P>, PayloadError>
    where
        P: ActionPayload + Clone,
    {
        let payload = self.payload::<P>()?;
        let declared = self.kind::<P::Kind>()?;
        let implied = payload.kind();
        if declared != implied {
            return Err(PayloadError::KindMismatch {
                declared: format!("{:?}", declared),
                implied: format!("{:?}", implied),
            });
        }

        Ok(Action {
            payload: payload.clone(),
            meta: self.meta.clone(),
            error: self.error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum LampKind {
        Switch,
        Dim,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Lamp {
        Switch(bool),
        Dim(u8),
    }

    impl ActionPayload for Lamp {
        type Kind = LampKind;

        fn kind(&self) -> LampKind {
            match self {
                Lamp::Switch(_) => LampKind::Switch,
                Lamp::Dim(_) => LampKind::Dim,
            }
        }
    }

    #[test]
    fn test_value_reports_mismatch() {
        let value = Value::new(42u16);
        assert_eq!(value.get::<u16>(), Ok(&42));
        assert!(value.is::<u16>());
        assert_eq!(
            value.get::<i64>(),
            Err(PayloadError::TypeMismatch {
                expected: "i64",
                found: "u16"
            })
        );
    }

    #[test]
    fn test_mismatch_is_deterministic() {
        let action = AnyAction::new(LampKind::Dim, "fifty percent");
        for _ in 0..3 {
            assert!(action.payload::<u8>().is_err());
        }
        assert_eq!(action.payload::<&str>(), Ok(&"fifty percent"));
    }

    #[test]
    fn test_to_action_round_trip() {
        let action = AnyAction::new(LampKind::Dim, Lamp::Dim(30)).with_error(true);
        let typed = action.to_action::<Lamp>().unwrap();
        assert_eq!(typed.payload(), &Lamp::Dim(30));
        assert!(typed.is_error());
    }

    #[test]
    fn test_to_action_rejects_inconsistent_kind() {
        let action = AnyAction::new(LampKind::Switch, Lamp::Dim(30));
        assert_eq!(
            action.to_action::<Lamp>().unwrap_err(),
            PayloadError::KindMismatch {
                declared: "Switch".to_string(),
                implied: "Dim".to_string(),
            }
        );
    }

    #[test]
    fn test_foreign_kind() {
        let action = AnyAction::new("navigation", Lamp::Switch(true));
        assert!(!action.is_kind_of::<LampKind>());
        assert_eq!(action.kind_type_name(), "&str");
        assert!(action.to_action::<Lamp>().is_err());
    }
}

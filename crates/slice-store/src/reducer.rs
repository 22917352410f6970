//! Reducers compute the next state from the previous state and an action.
//!
//! A reducer must be pure: the same `(state, action)` pair always gives the
//! same result, with no I/O and no shared mutable state. Any closure or fn
//! with the signature `Fn(T, &A) -> Result<T, ReduceError>` is a reducer;
//! infallible functions are wrapped with [`pure`].

use std::any;
use std::marker::PhantomData;

use crate::action::{Action, ActionPayload, AnyAction};
use crate::error::ReduceError;

pub trait Reducer<T, A> {
    fn reduce(&self, state: T, action: &A) -> Result<T, ReduceError>;
}

impl<T, A, F> Reducer<T, A> for F
where
    F: Fn(T, &A) -> Result<T, ReduceError>,
{
    fn reduce(&self, state: T, action: &A) -> Result<T, ReduceError> {
        self(state, action)
    }
}

/// Reducer that cannot fail. Built with [`pure`].
#[derive(Debug, Clone, Copy)]
pub struct Pure<F>(F);

pub fn pure<T, A, F>(reduce: F) -> Pure<F>
where
    F: Fn(T, &A) -> T,
{
    Pure(reduce)
}

impl<T, A, F> Reducer<T, A> for Pure<F>
where
    F: Fn(T, &A) -> T,
{
    fn reduce(&self, state: T, action: &A) -> Result<T, ReduceError> {
        Ok((self.0)(state, action))
    }
}

/// Returns every state unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl<T, A> Reducer<T, A> for PassThrough {
    fn reduce(&self, state: T, _action: &A) -> Result<T, ReduceError> {
        Ok(state)
    }
}

/// Typed reducer lifted to [`AnyAction`]. Built with [`erased`].
pub struct Erased<R, P> {
    inner: R,
    _payload: PhantomData<fn(P)>,
}

/// Lift a reducer over `Action<P>` so it accepts erased actions.
///
/// Actions from another domain (a different discriminator type) pass
/// through unchanged. An action with this domain's discriminator but the
/// wrong payload type fails with [`ReduceError::Payload`].
pub fn erased<T, P, R>(inner: R) -> Erased<R, P>
where
    P: ActionPayload + Clone,
    R: Reducer<T, Action<P>>,
{
    Erased {
        inner,
        _payload: PhantomData,
    }
}

impl<T, P, R> Reducer<T, AnyAction> for Erased<R, P>
where
    P: ActionPayload + Clone,
    R: Reducer<T, Action<P>>,
{
    fn reduce(&self, state: T, action: &AnyAction) -> Result<T, ReduceError> {
        if !action.is_kind_of::<P::Kind>() {
            log::trace!(
                "{} not handled by {} reducer, passing through",
                action.kind_type_name(),
                any::type_name::<P>()
            );
            return Ok(state);
        }

        let typed = action.to_action::<P>()?;
        self.inner.reduce(state, &typed)
    }
}

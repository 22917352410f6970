//! Reducer-driven observable state store
//!
//! A store holds one slice of application state. The state changes only
//! through `dispatch`, which feeds the current state and an action to a pure
//! reducer, adopts the result and then synchronously notifies subscribers.
//!
//! This crate provides:
//! - [`Action`]: typed action envelope (payload, metadata, error flag)
//! - [`AnyAction`]: erased envelope for heterogeneous dispatch
//! - [`Reducer`]: the `(state, action) -> state` contract
//! - [`Store`]: single-threaded store with an ordered subscriber registry
//! - [`sync::Store`]: thread-safe variant
//!
//! ```
//! use slice_store::{create_store, reducer, Action, ActionPayload};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum LightKind {
//!     Toggle,
//! }
//!
//! #[derive(Debug, Clone)]
//! enum Light {
//!     Toggle,
//! }
//!
//! impl ActionPayload for Light {
//!     type Kind = LightKind;
//!
//!     fn kind(&self) -> LightKind {
//!         LightKind::Toggle
//!     }
//! }
//!
//! fn reduce(on: bool, action: &Action<Light>) -> bool {
//!     match action.payload() {
//!         Light::Toggle => !on,
//!     }
//! }
//!
//! let store = create_store(reducer::pure(reduce), false);
//! let handle = store.subscribe(|on| println!("light is on: {}", on));
//! store.dispatch(Action::new(Light::Toggle)).unwrap();
//! assert!(store.state());
//! store.unsubscribe(handle);
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod reducer;
mod registry;
mod store;
pub mod sync;

pub use action::{Action, ActionPayload, AnyAction, Value};
pub use config::StoreConfig;
pub use error::{
    BoxError, DispatchError, PayloadError, ReduceError, SubscriberError, SubscriberFailure,
};
pub use reducer::{PassThrough, Reducer};
pub use registry::SubscriptionId;
pub use store::{create_store, Dispatcher, Store};

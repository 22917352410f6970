//! Single-threaded store.
//!
//! `Store` is a cheap handle: clones share the same state and subscribers.
//! Subscribers that need to dispatch back into the store should capture a
//! [`Dispatcher`] rather than a `Store` clone, so the store is not kept alive
//! by its own subscriber list.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::StoreConfig;
use crate::error::{BoxError, DispatchError};
use crate::reducer::Reducer;
use crate::registry::{self, Registry, SubscriptionId};

type Callback<T> = Rc<RefCell<dyn FnMut(&T) -> Result<(), BoxError>>>;

/// Holds one state value, replaced only by running the reducer in `dispatch`.
pub struct Store<T, A> {
    inner: Rc<Inner<T, A>>,
}

struct Inner<T, A> {
    config: StoreConfig,
    state: RefCell<T>,
    reducer: Box<dyn Reducer<T, A>>,
    subscribers: RefCell<Registry<Callback<T>>>,
    pending: RefCell<VecDeque<A>>,
    dispatching: Cell<bool>,
}

/// Create a store with default configuration.
pub fn create_store<T, A, R>(reducer: R, initial_state: T) -> Store<T, A>
where
    T: Clone + 'static,
    A: fmt::Debug + 'static,
    R: Reducer<T, A> + 'static,
{
    Store::new(reducer, initial_state)
}

impl<T, A> Store<T, A>
where
    T: Clone + 'static,
    A: fmt::Debug + 'static,
{
    /// The initial state is adopted as is; the reducer is not called.
    pub fn new<R>(reducer: R, initial_state: T) -> Self
    where
        R: Reducer<T, A> + 'static,
    {
        Self::with_config(reducer, initial_state, StoreConfig::default())
    }

    pub fn with_config<R>(reducer: R, initial_state: T, config: StoreConfig) -> Self
    where
        R: Reducer<T, A> + 'static,
    {
        log::debug!("[{}] store created", config.name);
        Self {
            inner: Rc::new(Inner {
                config,
                state: RefCell::new(initial_state),
                reducer: Box::new(reducer),
                subscribers: RefCell::new(Registry::new()),
                pending: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> T {
        self.inner.state.borrow().clone()
    }

    /// Run the reducer and, if it succeeds, notify every subscriber.
    ///
    /// Called from inside a subscriber of this store, the action is queued
    /// and `Ok(())` is returned right away. Queued actions run in FIFO order
    /// once the current notification loop has finished, and their failures
    /// are reported to the outermost caller as [`DispatchError::Deferred`],
    /// or as [`DispatchError::WithDeferred`] if that caller's own action
    /// failed too.
    pub fn dispatch(&self, action: A) -> Result<(), DispatchError> {
        let inner: &Inner<T, A> = &self.inner;
        if inner.dispatching.get() {
            return inner.enqueue(action);
        }

        inner.dispatching.set(true);
        let _cycle = CycleGuard(inner);

        let result = inner.run(action);
        let mut deferred = Vec::new();
        while let Some(next) = inner.next_pending() {
            if let Err(err) = inner.run(next) {
                deferred.push(err);
            }
        }

        settle(&inner.config.name, result, deferred)
    }

    /// Register a callback for every state produced by later dispatches.
    pub fn subscribe<F>(&self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        self.try_subscribe(move |state: &T| -> Result<(), BoxError> {
            callback(state);
            Ok(())
        })
    }

    /// Register a callback that may fail.
    ///
    /// Failures do not stop the notification loop; they are returned from
    /// `dispatch` as [`DispatchError::Subscribers`].
    pub fn try_subscribe<F, E>(&self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&T) -> Result<(), E> + 'static,
        E: Into<BoxError> + 'static,
    {
        let callback: Callback<T> = Rc::new(RefCell::new(move |state: &T| -> Result<(), BoxError> {
            callback(state).map_err(Into::into)
        }));
        let id = self.inner.subscribers.borrow_mut().insert(callback);
        log::debug!("[{}] subscriber {} added", self.inner.config.name, id);
        id
    }

    /// Remove a subscriber. Returns false if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.subscribers.borrow_mut().remove(id);
        if removed {
            log::debug!("[{}] subscriber {} removed", self.inner.config.name, id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// True while a dispatch cycle is running.
    pub fn is_dispatching(&self) -> bool {
        self.inner.dispatching.get()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Weak handle for dispatching from subscribers.
    pub fn dispatcher(&self) -> Dispatcher<T, A> {
        Dispatcher {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<T, A> Inner<T, A>
where
    T: Clone + 'static,
    A: fmt::Debug + 'static,
{
    fn run(&self, action: A) -> Result<(), DispatchError> {
        let label = self.config.name.as_str();
        log::debug!("[{}] dispatch {:?}", label, action);

        let current = self.state.borrow().clone();
        let next = self.reducer.reduce(current, &action).map_err(|err| {
            log::debug!("[{}] reducer failed, state kept: {}", label, err);
            DispatchError::Reducer(err)
        })?;
        *self.state.borrow_mut() = next;

        let subscribers = self.subscribers.borrow().snapshot();
        let state = self.state.borrow();
        let failures = registry::notify(
            label,
            subscribers,
            &*state,
            |id| self.subscribers.borrow().contains(id),
            |callback, state| (*callback.borrow_mut())(state),
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Subscribers(failures))
        }
    }

    fn enqueue(&self, action: A) -> Result<(), DispatchError> {
        let mut pending = self.pending.borrow_mut();
        if pending.len() >= self.config.max_pending {
            log::warn!(
                "[{}] pending queue full, refusing {:?}",
                self.config.name,
                action
            );
            return Err(DispatchError::QueueFull {
                capacity: self.config.max_pending,
            });
        }

        log::trace!("[{}] queued {:?}", self.config.name, action);
        pending.push_back(action);
        Ok(())
    }

    /// Next queued action, or `None` once the cycle is over.
    fn next_pending(&self) -> Option<A> {
        let next = self.pending.borrow_mut().pop_front();
        if next.is_none() {
            self.dispatching.set(false);
        }
        next
    }
}

/// Ends the dispatch cycle if a reducer panic unwinds through `dispatch`.
struct CycleGuard<'a, T, A>(&'a Inner<T, A>);

impl<T, A> Drop for CycleGuard<'_, T, A> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            return;
        }

        self.0.dispatching.set(false);
        if let Ok(mut pending) = self.0.pending.try_borrow_mut() {
            if !pending.is_empty() {
                log::warn!(
                    "[{}] dropping {} queued action(s) after panic",
                    self.0.config.name,
                    pending.len()
                );
                pending.clear();
            }
        }
    }
}

/// Combine the caller's own result with the results of queued dispatches.
pub(crate) fn settle(
    label: &str,
    own: Result<(), DispatchError>,
    deferred: Vec<DispatchError>,
) -> Result<(), DispatchError> {
    if deferred.is_empty() {
        return own;
    }
    for failure in &deferred {
        log::warn!("[{}] deferred dispatch failed: {}", label, failure);
    }

    match own {
        Ok(()) => Err(DispatchError::Deferred(deferred)),
        Err(err) => Err(DispatchError::WithDeferred {
            own: Box::new(err),
            deferred,
        }),
    }
}

impl<T, A> Clone for Store<T, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug, A> fmt::Debug for Store<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Store");
        debug.field("name", &self.inner.config.name);
        match self.inner.state.try_borrow() {
            Ok(state) => debug.field("state", &*state),
            Err(_) => debug.field("state", &"<updating>"),
        };
        debug
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

/// Weak handle to a [`Store`], for dispatching from inside subscribers.
pub struct Dispatcher<T, A> {
    inner: Weak<Inner<T, A>>,
}

impl<T, A> Dispatcher<T, A>
where
    T: Clone + 'static,
    A: fmt::Debug + 'static,
{
    /// Dispatch into the store, or fail with `StoreClosed` if it is gone.
    pub fn dispatch(&self, action: A) -> Result<(), DispatchError> {
        match self.inner.upgrade() {
            Some(inner) => Store { inner }.dispatch(action),
            None => {
                log::error!("Dispatcher: store dropped, discarding {:?}", action);
                Err(DispatchError::StoreClosed)
            }
        }
    }

    /// Current state, if the store is still alive.
    pub fn state(&self) -> Option<T> {
        self.inner.upgrade().map(|inner| inner.state.borrow().clone())
    }
}

impl<T, A> Clone for Dispatcher<T, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

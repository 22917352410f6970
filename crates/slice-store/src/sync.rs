//! Thread-safe store.
//!
//! Same contract as [`crate::Store`], shareable across threads. One mutex
//! guards the state, the subscriber list and the pending queue. The reducer
//! runs under that lock; subscribers are notified after it is released, so a
//! subscriber may call `dispatch`, `subscribe` or `state` without deadlocking.
//!
//! Only one dispatch cycle runs at a time, owned by the thread that started
//! it. A dispatch from a subscriber on the owning thread is queued and run
//! before that cycle ends. A dispatch from any other thread waits until the
//! cycle is over and then runs its own, so its caller gets its own result.
//! A subscriber must therefore not block on another thread that dispatches
//! into the same store.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};

use crate::config::StoreConfig;
use crate::error::{BoxError, DispatchError};
use crate::reducer::Reducer;
use crate::registry::{self, Registry, SubscriptionId};
use crate::store::settle;

type Callback<T> = Arc<Mutex<dyn FnMut(&T) -> Result<(), BoxError> + Send>>;

pub struct Store<T, A> {
    inner: Arc<Shared<T, A>>,
}

struct Shared<T, A> {
    config: StoreConfig,
    reducer: Box<dyn Reducer<T, A> + Send + Sync>,
    core: Mutex<Core<T, A>>,
    idle: Condvar,
}

struct Core<T, A> {
    state: T,
    subscribers: Registry<Callback<T>>,
    pending: VecDeque<A>,
    /// Thread running the current dispatch cycle.
    owner: Option<ThreadId>,
}

impl<T, A> Store<T, A>
where
    T: Clone + Send + 'static,
    A: fmt::Debug + Send + 'static,
{
    pub fn new<R>(reducer: R, initial_state: T) -> Self
    where
        R: Reducer<T, A> + Send + Sync + 'static,
    {
        Self::with_config(reducer, initial_state, StoreConfig::default())
    }

    pub fn with_config<R>(reducer: R, initial_state: T, config: StoreConfig) -> Self
    where
        R: Reducer<T, A> + Send + Sync + 'static,
    {
        log::debug!("[{}] shared store created", config.name);
        Self {
            inner: Arc::new(Shared {
                config,
                reducer: Box::new(reducer),
                core: Mutex::new(Core {
                    state: initial_state,
                    subscribers: Registry::new(),
                    pending: VecDeque::new(),
                    owner: None,
                }),
                idle: Condvar::new(),
            }),
        }
    }

    /// Snapshot of the current state. Waits only while a reducer is running.
    pub fn state(&self) -> T {
        self.inner.lock().state.clone()
    }

    /// See [`crate::Store::dispatch`]. Called from another thread while a
    /// cycle is running, this blocks until that cycle is over.
    pub fn dispatch(&self, action: A) -> Result<(), DispatchError> {
        let shared: &Shared<T, A> = &self.inner;
        let current = thread::current().id();
        {
            let mut core = shared.lock();
            loop {
                let owner = core.owner;
                match owner {
                    Some(owner) if owner == current => {
                        return shared.enqueue(&mut core, action);
                    }
                    Some(_) => core = shared.wait_idle(core),
                    None => break,
                }
            }
            core.owner = Some(current);
        }
        let _cycle = CycleGuard(shared);

        let result = shared.run(action);
        let mut deferred = Vec::new();
        while let Some(next) = shared.next_pending() {
            if let Err(err) = shared.run(next) {
                deferred.push(err);
            }
        }

        settle(&shared.config.name, result, deferred)
    }

    pub fn subscribe<F>(&self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.try_subscribe(move |state: &T| -> Result<(), BoxError> {
            callback(state);
            Ok(())
        })
    }

    pub fn try_subscribe<F, E>(&self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&T) -> Result<(), E> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        let callback: Callback<T> = Arc::new(Mutex::new(move |state: &T| -> Result<(), BoxError> {
            callback(state).map_err(Into::into)
        }));
        let id = self.inner.lock().subscribers.insert(callback);
        log::debug!("[{}] subscriber {} added", self.inner.config.name, id);
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.lock().subscribers.remove(id);
        if removed {
            log::debug!("[{}] subscriber {} removed", self.inner.config.name, id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    pub fn is_dispatching(&self) -> bool {
        self.inner.lock().owner.is_some()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn dispatcher(&self) -> Dispatcher<T, A> {
        Dispatcher {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<T, A> Shared<T, A> {
    /// A panicking reducer poisons the lock without touching the state, so
    /// poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Core<T, A>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_idle<'a>(&self, core: MutexGuard<'a, Core<T, A>>) -> MutexGuard<'a, Core<T, A>> {
        log::trace!("[{}] waiting for running dispatch cycle", self.config.name);
        self.idle
            .wait(core)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// End the cycle and wake threads waiting to start their own.
    fn finish_cycle(&self, core: &mut Core<T, A>) {
        core.owner = None;
        self.idle.notify_all();
    }
}

impl<T, A> Shared<T, A>
where
    T: Clone + Send + 'static,
    A: fmt::Debug + Send + 'static,
{
    fn run(&self, action: A) -> Result<(), DispatchError> {
        let label = self.config.name.as_str();
        log::debug!("[{}] dispatch {:?}", label, action);

        let (state, subscribers) = {
            let mut core = self.lock();
            let next = self
                .reducer
                .reduce(core.state.clone(), &action)
                .map_err(|err| {
                    log::debug!("[{}] reducer failed, state kept: {}", label, err);
                    DispatchError::Reducer(err)
                })?;
            core.state = next.clone();
            (next, core.subscribers.snapshot())
        };

        let failures = registry::notify(
            label,
            subscribers,
            &state,
            |id| self.lock().subscribers.contains(id),
            |callback, state| {
                let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
                (*callback)(state)
            },
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Subscribers(failures))
        }
    }

    fn enqueue(&self, core: &mut Core<T, A>, action: A) -> Result<(), DispatchError> {
        if core.pending.len() >= self.config.max_pending {
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
        core.pending.push_back(action);
        Ok(())
    }

    /// Pop the next queued action, ending the cycle under the same lock when
    /// the queue is empty so no enqueued action is ever stranded.
    fn next_pending(&self) -> Option<A> {
        let mut core = self.lock();
        let next = core.pending.pop_front();
        if next.is_none() {
            self.finish_cycle(&mut core);
        }
        next
    }
}

struct CycleGuard<'a, T, A>(&'a Shared<T, A>);

impl<T, A> Drop for CycleGuard<'_, T, A> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            return;
        }

        let mut core = self.0.lock();
        self.0.finish_cycle(&mut core);
        if !core.pending.is_empty() {
            log::warn!(
                "[{}] dropping {} queued action(s) after panic",
                self.0.config.name,
                core.pending.len()
            );
            core.pending.clear();
        }
    }
}

impl<T, A> Clone for Store<T, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug, A> fmt::Debug for Store<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("Store")
            .field("name", &self.inner.config.name)
            .field("state", &core.state)
            .field("subscribers", &core.subscribers.len())
            .finish()
    }
}

/// Weak handle to a [`Store`], safe to move into subscribers and threads.
pub struct Dispatcher<T, A> {
    inner: Weak<Shared<T, A>>,
}

impl<T, A> Dispatcher<T, A>
where
    T: Clone + Send + 'static,
    A: fmt::Debug + Send + 'static,
{
    pub fn dispatch(&self, action: A) -> Result<(), DispatchError> {
        match self.inner.upgrade() {
            Some(inner) => Store { inner }.dispatch(action),
            None => {
                log::error!("Dispatcher: store dropped, discarding {:?}", action);
                Err(DispatchError::StoreClosed)
            }
        }
    }

    pub fn state(&self) -> Option<T> {
        self.inner.upgrade().map(|inner| inner.lock().state.clone())
    }
}

impl<T, A> Clone for Dispatcher<T, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

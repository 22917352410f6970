use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use slice_store::reducer::pure;
use slice_store::{sync, DispatchError, ReduceError};

#[derive(Debug, Clone, PartialEq)]
enum Door {
    Open,
    Close,
    Lock,
}

/// Doors cannot be opened while locked.
fn door(locked_open: (bool, bool), action: &Door) -> Result<(bool, bool), ReduceError> {
    let (locked, open) = locked_open;
    match action {
        Door::Open if locked => Err(ReduceError::rejected("door is locked")),
        Door::Open => Ok((locked, true)),
        Door::Close => Ok((locked, false)),
        Door::Lock => Ok((true, open)),
    }
}

#[test]
fn test_reentrant_dispatch_does_not_deadlock() {
    let store = sync::Store::new(door, (false, false));
    let dispatcher = store.dispatcher();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    store.subscribe(move |state: &(bool, bool)| {
        sink.lock().unwrap().push(*state);
        if *state == (false, true) {
            dispatcher.dispatch(Door::Close).unwrap();
            dispatcher.dispatch(Door::Lock).unwrap();
        }
    });

    store.dispatch(Door::Open).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(false, true), (false, false), (true, false)]
    );
    assert_eq!(store.state(), (true, false));
}

#[test]
fn test_atomicity_on_failure() {
    let store = sync::Store::new(door, (true, false));
    let calls = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&calls);
    store.subscribe(move |_| *sink.lock().unwrap() += 1);

    let err = store.dispatch(Door::Open).unwrap_err();

    assert!(matches!(err, DispatchError::Reducer(ReduceError::Rejected(_))));
    assert_eq!(store.state(), (true, false));
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn test_unsubscribe_finality() {
    let store = sync::Store::new(pure(|count: u32, _: &()| count + 1), 0);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let handle = store.subscribe(move |count: &u32| sink.lock().unwrap().push(*count));

    store.dispatch(()).unwrap();
    assert!(store.unsubscribe(handle));
    assert!(!store.unsubscribe(handle));
    store.dispatch(()).unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![1]);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_subscriber_failures_are_aggregated() {
    let store = sync::Store::new(pure(|count: u32, _: &()| count + 1), 0);
    store.try_subscribe(|_: &u32| Err::<(), _>("first"));
    store.subscribe(|_| panic!("second"));
    let reached = Arc::new(Mutex::new(false));
    let sink = Arc::clone(&reached);
    store.subscribe(move |_| *sink.lock().unwrap() = true);

    match store.dispatch(()) {
        Err(DispatchError::Subscribers(failures)) => assert_eq!(failures.len(), 2),
        other => panic!("expected subscriber failures, got {:?}", other),
    }
    assert!(*reached.lock().unwrap());

    // A panicking subscriber must not wedge the store.
    assert!(matches!(
        store.dispatch(()),
        Err(DispatchError::Subscribers(_))
    ));
    assert_eq!(store.state(), 2);
}

#[test]
fn test_notifications_match_dispatch_count_across_threads() {
    let store = sync::Store::new(pure(|count: u64, by: &u64| count + by), 0);
    let notified = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&notified);
    store.subscribe(move |_| *sink.lock().unwrap() += 1);

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let dispatcher = store.dispatcher();
            thread::spawn(move || {
                for _ in 0..50 {
                    dispatcher.dispatch(1).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(store.state(), 400);
    assert_eq!(*notified.lock().unwrap(), 400);
}

fn no_negatives(total: i32, delta: &i32) -> Result<i32, ReduceError> {
    if *delta < 0 {
        return Err(ReduceError::rejected("negative"));
    }
    Ok(total + delta)
}

#[test]
fn test_dispatch_from_other_thread_gets_own_result() {
    let store = sync::Store::new(no_negatives, 0);
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    store.subscribe(move |total: &i32| {
        if *total == 1 {
            entered_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        }
    });

    let first = store.clone();
    let busy = thread::spawn(move || first.dispatch(1));
    entered_rx.recv().unwrap();

    let second = store.clone();
    let waiting = thread::spawn(move || {
        let rejected = second.dispatch(-5);
        let accepted = second.dispatch(10);
        (rejected, accepted, second.state())
    });

    thread::sleep(Duration::from_millis(50));
    assert_eq!(store.state(), 1);
    release_tx.send(()).unwrap();

    assert!(busy.join().unwrap().is_ok());
    let (rejected, accepted, state_after) = waiting.join().unwrap();
    assert!(matches!(
        rejected,
        Err(DispatchError::Reducer(ReduceError::Rejected(_)))
    ));
    assert!(accepted.is_ok());
    assert_eq!(state_after, 11);
    assert!(!store.is_dispatching());
}

/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Blocking consumption of a demand-paced publish stream.

A [`BlockingPublishes`] subscribes once to the asynchronous client's publish stream and hands
incoming publishes to threads blocked in one of its receive calls.  The stream is only ever
granted one unit of demand at a time: a grant happens on attachment and again each time a publish
is handed to a receiver, so at most one publish sits buffered while no one is receiving.
 */

use crate::client::asynchronous::*;
use crate::error::{GneissError, GneissResult};
use crate::mqtt::PublishPacket;

use log::*;
use std::collections::VecDeque;
use std::panic::Location;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

enum WaiterOutcome {
    Pending,
    Publish(PublishPacket),
    Failure(GneissError),
    Consumed,
}

impl WaiterOutcome {
    fn is_pending(&self) -> bool {
        matches!(self, WaiterOutcome::Pending)
    }
}

/// One thread's outstanding request for a publish.  The outcome is written at most once; whichever
/// writer finds the outcome still pending wins and every other writer is told it lost.
struct PublishWaiter {
    result_lock: Mutex<WaiterOutcome>,
    result_signal: Condvar,
}

impl PublishWaiter {

    fn new() -> PublishWaiter {
        PublishWaiter {
            result_lock: Mutex::new(WaiterOutcome::Pending),
            result_signal: Condvar::new(),
        }
    }

    fn lock_outcome(&self) -> MutexGuard<'_, WaiterOutcome> {
        self.result_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Hands the publish back if the waiter already has an outcome.
    fn deliver(&self, publish: PublishPacket) -> Result<(), PublishPacket> {
        let mut outcome = self.lock_outcome();
        if !outcome.is_pending() {
            return Err(publish);
        }

        *outcome = WaiterOutcome::Publish(publish);
        self.result_signal.notify_all();
        Ok(())
    }

    fn fail(&self, error: GneissError) -> bool {
        let mut outcome = self.lock_outcome();
        if !outcome.is_pending() {
            return false;
        }

        *outcome = WaiterOutcome::Failure(error);
        self.result_signal.notify_all();
        true
    }

    /// Blocks until an outcome is written or the timeout elapses.  Whatever is found is taken and
    /// replaced with `Consumed`, so a timed out waiter can no longer be written to.
    fn wait(&self, timeout: Option<Duration>) -> GneissResult<Option<PublishPacket>> {
        let current_value = self.lock_outcome();
        let mut current_value = match timeout {
            None => {
                self.result_signal.wait_while(current_value, |outcome| outcome.is_pending())
                    .unwrap_or_else(PoisonError::into_inner)
            }
            Some(timeout) => {
                self.result_signal.wait_timeout_while(current_value, timeout, |outcome| outcome.is_pending())
                    .unwrap_or_else(PoisonError::into_inner).0
            }
        };

        match std::mem::replace(&mut *current_value, WaiterOutcome::Consumed) {
            WaiterOutcome::Pending => { Ok(None) }
            WaiterOutcome::Publish(publish) => { Ok(Some(publish)) }
            WaiterOutcome::Failure(error) => { Err(error) }
            WaiterOutcome::Consumed => { Err(GneissError::new_wait_interrupted()) }
        }
    }
}

enum DemandState {
    Unattached,
    Attached(Arc<dyn PublishSubscription + Send + Sync>),
    Cancelled,
}

struct QueueState {
    waiters: VecDeque<Arc<PublishWaiter>>,

    // never non-empty while waiters is non-empty
    queued_publish: Option<PublishPacket>,

    cancelled: bool,

    terminal_error: Option<GneissError>,
}

enum Poll {
    Ready(PublishPacket),
    Waiting(Arc<PublishWaiter>),
    Empty,
}

/// Subscriber side of a blocking publish stream.  Lock order is queue state, then waiter outcome.
/// Demand is never requested and subscriptions are never cancelled while either lock is held,
/// because producers are free to call back into the subscriber from inside those calls.
pub(crate) struct PublishQueue {
    demand: Mutex<DemandState>,
    state: Mutex<QueueState>,
}

impl PublishQueue {

    pub(crate) fn new() -> PublishQueue {
        PublishQueue {
            demand: Mutex::new(DemandState::Unattached),
            state: Mutex::new(QueueState {
                waiters: VecDeque::new(),
                queued_publish: None,
                cancelled: false,
                terminal_error: None,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_demand(&self) -> MutexGuard<'_, DemandState> {
        self.demand.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request_next(&self) {
        let subscription = match &*self.lock_demand() {
            DemandState::Attached(subscription) => { subscription.clone() }
            _ => { return; }
        };

        trace!("PublishQueue - requesting one more publish");
        subscription.request(1);
    }

    fn try_take(&self, register_waiter: bool) -> GneissResult<Poll> {
        let (poll, replenish) = {
            let mut state = self.lock_state();
            if state.cancelled {
                return Err(GneissError::new_cancelled());
            }

            if let Some(publish) = state.queued_publish.take() {
                (Poll::Ready(publish), state.terminal_error.is_none())
            } else if let Some(error) = &state.terminal_error {
                return Err(error.clone());
            } else if register_waiter {
                let waiter = Arc::new(PublishWaiter::new());
                state.waiters.push_back(waiter.clone());
                trace!("PublishQueue - registered waiter, {} now waiting", state.waiters.len());
                (Poll::Waiting(waiter), false)
            } else {
                (Poll::Empty, false)
            }
        };

        if replenish {
            self.request_next();
        }

        Ok(poll)
    }

    fn forget_waiter(&self, waiter: &Arc<PublishWaiter>) {
        let mut state = self.lock_state();
        state.waiters.retain(|queued| !Arc::ptr_eq(queued, waiter));
    }

    pub(crate) fn receive(&self, timeout: Option<Duration>) -> GneissResult<Option<PublishPacket>> {
        match self.try_take(true)? {
            Poll::Ready(publish) => { Ok(Some(publish)) }
            Poll::Empty => { Ok(None) }
            Poll::Waiting(waiter) => {
                let result = waiter.wait(timeout);
                if !matches!(result, Ok(Some(_))) {
                    self.forget_waiter(&waiter);
                }

                result
            }
        }
    }

    pub(crate) fn receive_now(&self) -> GneissResult<Option<PublishPacket>> {
        match self.try_take(false)? {
            Poll::Ready(publish) => { Ok(Some(publish)) }
            _ => { Ok(None) }
        }
    }

    pub(crate) fn close(&self) {
        let previous = std::mem::replace(&mut *self.lock_demand(), DemandState::Cancelled);
        if let DemandState::Attached(subscription) = previous {
            debug!("PublishQueue - closing, cancelling publish stream");
            subscription.cancel();
        }

        let mut state = self.lock_state();
        if state.cancelled {
            return;
        }

        state.cancelled = true;
        state.queued_publish = None;
        for waiter in state.waiters.drain(..) {
            waiter.fail(GneissError::new_cancelled());
        }
    }

    #[cfg(test)]
    pub(crate) fn waiter_count(&self) -> usize {
        self.lock_state().waiters.len()
    }
}

impl PublishSubscriber for PublishQueue {
    fn on_subscribe(&self, subscription: Arc<dyn PublishSubscription + Send + Sync>) {
        let accepted = {
            let mut demand = self.lock_demand();
            match *demand {
                DemandState::Unattached => {
                    *demand = DemandState::Attached(subscription.clone());
                    true
                }
                DemandState::Attached(_) => {
                    warn!("PublishQueue - rejecting a second publish stream attachment");
                    false
                }
                DemandState::Cancelled => {
                    debug!("PublishQueue - publish stream attached after close");
                    false
                }
            }
        };

        if accepted {
            subscription.request(1);
        } else {
            subscription.cancel();
        }
    }

    fn on_next(&self, publish: PublishPacket) {
        let mut publish = publish;
        let handed_off = {
            let mut state = self.lock_state();
            if state.cancelled {
                trace!("PublishQueue - dropping publish received after close");
                return;
            }

            loop {
                match state.waiters.pop_front() {
                    Some(waiter) => {
                        match waiter.deliver(publish) {
                            Ok(()) => {
                                trace!("PublishQueue - publish handed to waiter");
                                break true;
                            }
                            Err(returned) => {
                                publish = returned;
                            }
                        }
                    }
                    None => {
                        if state.queued_publish.is_some() {
                            error!("PublishQueue - publish stream emitted without outstanding demand; dropping {}", publish);
                        } else {
                            state.queued_publish = Some(publish);
                        }
                        break false;
                    }
                }
            }
        };

        if handed_off {
            self.request_next();
        }
    }

    fn on_error(&self, error: GneissError) {
        debug!("PublishQueue - publish stream failed: {}", error);
        let mut state = self.lock_state();
        for waiter in state.waiters.drain(..) {
            waiter.fail(error.clone());
        }

        if state.terminal_error.is_none() {
            state.terminal_error = Some(error);
        }
    }

    fn on_complete(&self) {
        error!("PublishQueue - publish stream completed; publish streams must stay open for the lifetime of the client");
        self.on_error(GneissError::new_protocol_error("publish stream completed"));
    }
}

/// Blocking handle to a stream of incoming publishes, returned by
/// [`BlockingClient::publishes`](crate::client::synchronous::BlockingClient::publishes).
///
/// Any number of threads may receive concurrently; each publish goes to exactly one of them, in the
/// order the threads started waiting.  Dropping the handle closes it.
pub struct BlockingPublishes {
    queue: Arc<PublishQueue>,
}

impl BlockingPublishes {

    pub(crate) fn new(stream: Box<dyn PublishStream + Send>) -> BlockingPublishes {
        let queue = Arc::new(PublishQueue::new());
        stream.subscribe(queue.clone());

        BlockingPublishes {
            queue
        }
    }

    /// Blocking.  Waits, without limit, for the next publish.
    ///
    /// Fails with `Cancelled` once the handle is closed, or with the stream's failure once the
    /// publish stream has ended.
    #[track_caller]
    pub fn receive(&self) -> GneissResult<PublishPacket> {
        let call_site = Location::caller();

        self.queue.receive(None)
            .and_then(|publish| publish.ok_or_else(|| GneissError::new_wait_interrupted()))
            .map_err(|error| error.anchored_at(call_site))
    }

    /// Blocking.  Waits up to `timeout` for the next publish.  Returns `Ok(None)` if nothing
    /// arrived in time; a publish that arrives afterwards is kept for the next receive.
    #[track_caller]
    pub fn receive_with_timeout(&self, timeout: Duration) -> GneissResult<Option<PublishPacket>> {
        let call_site = Location::caller();

        self.queue.receive(Some(timeout)).map_err(|error| error.anchored_at(call_site))
    }

    /// Non-blocking.  Returns the buffered publish, if there is one.
    ///
    /// Once the publish stream has failed and nothing is buffered, returns the stream's failure
    /// rather than `Ok(None)`.
    #[track_caller]
    pub fn receive_now(&self) -> GneissResult<Option<PublishPacket>> {
        let call_site = Location::caller();

        self.queue.receive_now().map_err(|error| error.anchored_at(call_site))
    }

    /// Stops the publish stream and releases every blocked receiver with a `Cancelled` error.
    /// Idempotent; may be called from any thread.
    pub fn close(&self) {
        self.queue.close();
    }
}

impl Drop for BlockingPublishes {
    fn drop(&mut self) {
        self.queue.close();
    }
}

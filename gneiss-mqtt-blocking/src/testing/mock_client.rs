/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::client::*;
use crate::client::asynchronous::*;
use crate::config::*;
use crate::error::{GneissError, GneissResult};
use crate::mqtt::*;

use futures::channel::oneshot;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

enum StreamSignal {
    Publish(PublishPacket),
    Error(GneissError),
    Complete,
}

struct ProducerState {
    subscriber: Option<Arc<dyn PublishSubscriber + Send + Sync>>,
    pending: VecDeque<StreamSignal>,
    demand: u64,
    requested: u64,
    cancel_count: usize,
    cancelled: bool,
    emitting: bool,
}

/// Publish stream producer that honors demand: queued publishes are only emitted while the
/// subscriber has outstanding demand.  Terminal signals are emitted regardless of demand.
/// Signals are always emitted outside the producer's lock, since subscribers request more demand
/// from inside their callbacks.
pub(crate) struct MockPublishProducer {
    state: Mutex<ProducerState>,
}

struct MockPublishSubscription {
    producer: Arc<MockPublishProducer>,
}

impl PublishSubscription for MockPublishSubscription {
    fn request(&self, count: u64) {
        {
            let mut state = self.producer.state.lock().unwrap();
            state.demand += count;
            state.requested += count;
        }

        self.producer.pump();
    }

    fn cancel(&self) {
        let mut state = self.producer.state.lock().unwrap();
        state.cancelled = true;
        state.cancel_count += 1;
    }
}

struct MockPublishStream {
    producer: Arc<MockPublishProducer>,
}

impl PublishStream for MockPublishStream {
    fn subscribe(self: Box<Self>, subscriber: Arc<dyn PublishSubscriber + Send + Sync>) {
        self.producer.attach(subscriber);
    }
}

impl MockPublishProducer {

    pub(crate) fn new() -> Arc<MockPublishProducer> {
        Arc::new(MockPublishProducer {
            state: Mutex::new(ProducerState {
                subscriber: None,
                pending: VecDeque::new(),
                demand: 0,
                requested: 0,
                cancel_count: 0,
                cancelled: false,
                emitting: false,
            }),
        })
    }

    pub(crate) fn stream(self: &Arc<Self>) -> Box<dyn PublishStream + Send> {
        Box::new(MockPublishStream {
            producer: self.clone(),
        })
    }

    pub(crate) fn attach(self: &Arc<Self>, subscriber: Arc<dyn PublishSubscriber + Send + Sync>) {
        self.state.lock().unwrap().subscriber = Some(subscriber.clone());

        subscriber.on_subscribe(Arc::new(MockPublishSubscription {
            producer: self.clone(),
        }));

        self.pump();
    }

    fn enqueue(&self, signal: StreamSignal) {
        self.state.lock().unwrap().pending.push_back(signal);
        self.pump();
    }

    pub(crate) fn push(&self, publish: PublishPacket) {
        self.enqueue(StreamSignal::Publish(publish));
    }

    pub(crate) fn fail(&self, error: GneissError) {
        self.enqueue(StreamSignal::Error(error));
    }

    pub(crate) fn complete(&self) {
        self.enqueue(StreamSignal::Complete);
    }

    /// Emits a publish immediately, ignoring both demand and cancellation.
    pub(crate) fn push_without_demand(&self, publish: PublishPacket) {
        let subscriber = self.state.lock().unwrap().subscriber.clone();
        if let Some(subscriber) = subscriber {
            subscriber.on_next(publish);
        }
    }

    pub(crate) fn requested(&self) -> u64 {
        self.state.lock().unwrap().requested
    }

    pub(crate) fn cancel_count(&self) -> usize {
        self.state.lock().unwrap().cancel_count
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    fn next_signal(&self) -> Option<(Arc<dyn PublishSubscriber + Send + Sync>, StreamSignal)> {
        let mut state = self.state.lock().unwrap();
        let ready = match state.pending.front() {
            Some(StreamSignal::Publish(_)) => { state.demand > 0 }
            Some(_) => { true }
            None => { false }
        };

        if state.cancelled || state.subscriber.is_none() || !ready {
            state.emitting = false;
            return None;
        }

        let subscriber = state.subscriber.clone()?;
        let signal = state.pending.pop_front()?;
        if let StreamSignal::Publish(_) = signal {
            state.demand -= 1;
        }

        Some((subscriber, signal))
    }

    fn pump(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.emitting {
                return;
            }

            state.emitting = true;
        }

        while let Some((subscriber, signal)) = self.next_signal() {
            match signal {
                StreamSignal::Publish(publish) => { subscriber.on_next(publish); }
                StreamSignal::Error(error) => { subscriber.on_error(error); }
                StreamSignal::Complete => { subscriber.on_complete(); }
            }
        }
    }
}

/// Record of an operation submitted to a MockAsyncClient
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum MockCall {
    Connect(ConnectPacket),
    Subscribe(SubscribePacket),
    Publishes(PublishFilter),
    Unsubscribe(UnsubscribePacket),
    Publish(PublishPacket),
    Reauth,
    Disconnect(DisconnectPacket),
}

struct MockResults {
    connect: ConnectResult,
    subscribe: SubscribeResult,
    unsubscribe: UnsubscribeResult,
    publish: Option<PublishResult>,
    reauth: CompletionResult,
    disconnect: CompletionResult,
    abandon_operations: bool,
}

/// Asynchronous client whose operations resolve from a tokio runtime thread with preconfigured
/// results.  Publishes succeed with a QoS-appropriate response unless a publish result is set.
pub(crate) struct MockAsyncClient {
    config: ClientConfig,
    runtime: tokio::runtime::Runtime,
    results: Mutex<MockResults>,
    calls: Mutex<Vec<MockCall>>,
    producers: Mutex<Vec<Arc<MockPublishProducer>>>,
}

impl MockAsyncClient {

    pub(crate) fn new(config: ClientConfig) -> Arc<MockAsyncClient> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        Arc::new(MockAsyncClient {
            config,
            runtime,
            results: Mutex::new(MockResults {
                connect: Ok(ConnackPacket::default()),
                subscribe: Ok(SubackPacket::default()),
                unsubscribe: Ok(UnsubackPacket::default()),
                publish: None,
                reauth: Ok(()),
                disconnect: Ok(()),
                abandon_operations: false,
            }),
            calls: Mutex::new(Vec::new()),
            producers: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn set_connect_result(&self, result: ConnectResult) {
        self.results.lock().unwrap().connect = result;
    }

    pub(crate) fn set_subscribe_result(&self, result: SubscribeResult) {
        self.results.lock().unwrap().subscribe = result;
    }

    pub(crate) fn set_unsubscribe_result(&self, result: UnsubscribeResult) {
        self.results.lock().unwrap().unsubscribe = result;
    }

    pub(crate) fn set_publish_result(&self, result: PublishResult) {
        self.results.lock().unwrap().publish = Some(result);
    }

    pub(crate) fn set_reauth_result(&self, result: CompletionResult) {
        self.results.lock().unwrap().reauth = result;
    }

    pub(crate) fn set_disconnect_result(&self, result: CompletionResult) {
        self.results.lock().unwrap().disconnect = result;
    }

    /// Operations submitted from now on never resolve; their result channel is dropped instead.
    pub(crate) fn abandon_operations(&self) {
        self.results.lock().unwrap().abandon_operations = true;
    }

    pub(crate) fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn producer(&self, index: usize) -> Arc<MockPublishProducer> {
        self.producers.lock().unwrap()[index].clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn resolve<T: Send + 'static>(&self, result: GneissResult<T>) -> Pin<Box<dyn Future<Output = GneissResult<T>> + Send>> {
        let abandon = self.results.lock().unwrap().abandon_operations;
        let (sender, receiver) = oneshot::channel();
        self.runtime.spawn(async move {
            if abandon {
                drop(sender);
            } else {
                let _ = sender.send(result);
            }
        });

        Box::pin(async move {
            match receiver.await {
                Ok(result) => { result }
                Err(canceled) => { Err(GneissError::from(canceled)) }
            }
        })
    }
}

fn default_publish_response(publish: &PublishPacket) -> PublishResponse {
    match publish.qos {
        QualityOfService::AtMostOnce => { PublishResponse::Qos0 }
        QualityOfService::AtLeastOnce => { PublishResponse::Qos1(PubackPacket::default()) }
        QualityOfService::ExactlyOnce => { PublishResponse::Qos2(Qos2Response::Pubcomp(PubcompPacket::default())) }
    }
}

impl AsyncClient for MockAsyncClient {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn connect(&self, packet: ConnectPacket) -> AsyncConnectResult {
        self.record(MockCall::Connect(packet));
        let result = self.results.lock().unwrap().connect.clone();
        self.resolve(result)
    }

    fn subscribe(&self, packet: SubscribePacket, _: Option<SubscribeOptions>) -> AsyncSubscribeResult {
        self.record(MockCall::Subscribe(packet));
        let result = self.results.lock().unwrap().subscribe.clone();
        self.resolve(result)
    }

    fn publishes(&self, filter: PublishFilter) -> Box<dyn PublishStream + Send> {
        self.record(MockCall::Publishes(filter));
        let producer = MockPublishProducer::new();
        self.producers.lock().unwrap().push(producer.clone());
        producer.stream()
    }

    fn unsubscribe(&self, packet: UnsubscribePacket, _: Option<UnsubscribeOptions>) -> AsyncUnsubscribeResult {
        self.record(MockCall::Unsubscribe(packet));
        let result = self.results.lock().unwrap().unsubscribe.clone();
        self.resolve(result)
    }

    fn publish(&self, packet: PublishPacket, _: Option<PublishOptions>) -> AsyncPublishResult {
        self.record(MockCall::Publish(packet.clone()));
        let configured = self.results.lock().unwrap().publish.clone();
        let result = configured.unwrap_or_else(|| {
            let response = default_publish_response(&packet);
            Ok(PublishOutcome::new(packet, response))
        });

        self.resolve(result)
    }

    fn reauth(&self) -> AsyncCompletionResult {
        self.record(MockCall::Reauth);
        let result = self.results.lock().unwrap().reauth.clone();
        self.resolve(result)
    }

    fn disconnect(&self, packet: DisconnectPacket) -> AsyncCompletionResult {
        self.record(MockCall::Disconnect(packet));
        let result = self.results.lock().unwrap().disconnect.clone();
        self.resolve(result)
    }
}

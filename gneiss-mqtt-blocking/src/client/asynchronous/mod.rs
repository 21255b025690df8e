/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing the boundary between the blocking client and an asynchronous MQTT client.

An asynchronous client performs all protocol work (connection management, encoding, retries, session
state) off the calling thread.  This crate consumes it through the [`AsyncClient`] trait: every
operation returns a future that resolves exactly once, and incoming publishes are exposed as a
demand-paced [`PublishStream`] that emits at most one publish per unit of requested demand.
 */

use super::*;
use super::synchronous::BlockingClient;
use crate::config::ClientConfig;
use crate::error::{GneissError, GneissResult};

use std::future::Future;
use std::pin::Pin;

/// Result type of a Connect operation
pub type ConnectResult = GneissResult<ConnackPacket>;

/// Result type of a Publish operation
pub type PublishResult = GneissResult<PublishOutcome>;

/// Result type of a Subscribe operation
pub type SubscribeResult = GneissResult<SubackPacket>;

/// Result type of an Unsubscribe operation
pub type UnsubscribeResult = GneissResult<UnsubackPacket>;

/// Result type of operations that only signal completion (reauthentication, disconnect)
pub type CompletionResult = GneissResult<()>;

/// Return type of a Connect operation for the asynchronous client.  Await on this value to
/// receive the operation's result, but note that the operation will complete independently of
/// the use of `.await`.
pub type AsyncConnectResult = Pin<Box<dyn Future<Output = ConnectResult> + Send>>;

/// Return type of a Publish operation for the asynchronous client.  Await on this value to
/// receive the operation's result, but note that the operation will complete independently of
/// the use of `.await` (you don't need to await for the operation to be performed, you only need
/// to await to get the final result of performing it).
pub type AsyncPublishResult = Pin<Box<dyn Future<Output = PublishResult> + Send>>;

/// Return type of a Subscribe operation for the asynchronous client.  Await on this value to
/// receive the operation's result, but note that the operation will complete independently of
/// the use of `.await` (you don't need to await for the operation to be performed, you only need
/// to await to get the final result of performing it).
pub type AsyncSubscribeResult = Pin<Box<dyn Future<Output = SubscribeResult> + Send>>;

/// Return type of an Unsubscribe operation for the asynchronous client.  Await on this value to
/// receive the operation's result, but note that the operation will complete independently of
/// the use of `.await` (you don't need to await for the operation to be performed, you only need
/// to await to get the final result of performing it).
pub type AsyncUnsubscribeResult = Pin<Box<dyn Future<Output = UnsubscribeResult> + Send>>;

/// Return type of the completion-only operations (reauthentication, disconnect) for the
/// asynchronous client.
pub type AsyncCompletionResult = Pin<Box<dyn Future<Output = CompletionResult> + Send>>;

/// Permission, held by a publish stream's consumer, to ask the producer for more publishes.
///
/// Handed to the subscriber exactly once, through [`PublishSubscriber::on_subscribe`].
pub trait PublishSubscription {

    /// Grants the producer permission to emit `count` more publishes.  Demand is cumulative.
    ///
    /// A producer may emit synchronously from within this call, so callers must not hold any lock
    /// that the subscriber's callbacks also take.
    fn request(&self, count: u64);

    /// Tells the producer to stop.  No further callbacks should be made after cancellation, although
    /// callbacks already in flight may still arrive.
    fn cancel(&self);
}

/// Receiving side of a publish stream.
///
/// Callbacks are invoked from the asynchronous client's worker thread and are serialized
/// with respect to one another.
pub trait PublishSubscriber {

    /// Invoked when a producer attaches to the subscriber.  Nothing is emitted until the
    /// subscriber requests demand through the subscription.
    fn on_subscribe(&self, subscription: Arc<dyn PublishSubscription + Send + Sync>);

    /// Invoked with the next publish.  Producers may only invoke this with outstanding demand.
    fn on_next(&self, publish: PublishPacket);

    /// Invoked when the stream fails.  Terminal.
    fn on_error(&self, error: GneissError);

    /// Invoked when the stream ends.  Terminal.
    fn on_complete(&self);
}

/// A demand-paced stream of incoming publishes.  Nothing happens until a subscriber is attached.
pub trait PublishStream {

    /// Attaches a subscriber to the stream, consuming the stream.
    fn subscribe(self: Box<Self>, subscriber: Arc<dyn PublishSubscriber + Send + Sync>);
}

/// Interface for an async network client that functions as a thin wrapper over the MQTT5 protocol.
///
/// There are no mutable functions in the client API, so you can safely share it amongst threads,
/// runtimes/tasks, etc...
///
/// Every operation returns a future that resolves exactly once, either with the operation's
/// result or with an error.  Operations are submitted when invoked, not when awaited.
pub trait AsyncClient {

    /// Returns the configuration the client was created with.
    fn config(&self) -> &ClientConfig;

    /// Submits a Connect operation.  Resolves with the broker's CONNACK.
    fn connect(&self, packet: ConnectPacket) -> AsyncConnectResult;

    /// Submits a Subscribe operation to the client's operation queue.  The subscribe will be sent to
    /// the broker when it reaches the head of the queue and the client is connected.
    fn subscribe(&self, packet: SubscribePacket, options: Option<SubscribeOptions>) -> AsyncSubscribeResult;

    /// Creates a stream of the incoming publishes selected by the filter.
    fn publishes(&self, filter: PublishFilter) -> Box<dyn PublishStream + Send>;

    /// Submits an Unsubscribe operation to the client's operation queue.  The unsubscribe will be sent to
    /// the broker when it reaches the head of the queue and the client is connected.
    fn unsubscribe(&self, packet: UnsubscribePacket, options: Option<UnsubscribeOptions>) -> AsyncUnsubscribeResult;

    /// Submits a Publish operation to the client's operation queue.  The publish will be sent to
    /// the broker when it reaches the head of the queue and the client is connected.
    fn publish(&self, packet: PublishPacket, options: Option<PublishOptions>) -> AsyncPublishResult;

    /// Starts a reauthentication exchange on the current connection.
    fn reauth(&self) -> AsyncCompletionResult;

    /// Sends the disconnect packet and closes the current connection.
    fn disconnect(&self, packet: DisconnectPacket) -> AsyncCompletionResult;
}

/// A cloneable, shareable handle to an asynchronous client.
///
/// All clones refer to the same underlying client and connection.
#[derive(Clone)]
pub struct AsyncClientHandle {
    client: Arc<dyn AsyncClient + Send + Sync>
}

impl AsyncClientHandle {

    /// Wraps an asynchronous client implementation in a shareable handle
    pub fn new(client: Arc<dyn AsyncClient + Send + Sync>) -> Self {
        Self { client }
    }

    /// Creates a blocking view of the same underlying client
    pub fn to_blocking(&self) -> BlockingClient {
        BlockingClient::new(self.clone())
    }
}

impl AsyncClient for AsyncClientHandle {
    fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    fn connect(&self, packet: ConnectPacket) -> AsyncConnectResult {
        self.client.connect(packet)
    }

    fn subscribe(&self, packet: SubscribePacket, options: Option<SubscribeOptions>) -> AsyncSubscribeResult {
        self.client.subscribe(packet, options)
    }

    fn publishes(&self, filter: PublishFilter) -> Box<dyn PublishStream + Send> {
        self.client.publishes(filter)
    }

    fn unsubscribe(&self, packet: UnsubscribePacket, options: Option<UnsubscribeOptions>) -> AsyncUnsubscribeResult {
        self.client.unsubscribe(packet, options)
    }

    fn publish(&self, packet: PublishPacket, options: Option<PublishOptions>) -> AsyncPublishResult {
        self.client.publish(packet, options)
    }

    fn reauth(&self) -> AsyncCompletionResult {
        self.client.reauth()
    }

    fn disconnect(&self, packet: DisconnectPacket) -> AsyncCompletionResult {
        self.client.disconnect(packet)
    }
}

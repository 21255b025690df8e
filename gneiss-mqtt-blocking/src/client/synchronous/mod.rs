/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing the blocking view of an asynchronous MQTT client
 */

pub mod publishes;

use crate::client::asynchronous::*;
use crate::config::ClientConfig;
use crate::error::{GneissError, GneissResult};
use crate::mqtt::*;
use crate::validate::*;
use super::*;

use futures::executor::block_on;
use log::*;
use std::future::Future;
use std::panic::Location;
use std::pin::Pin;

pub use publishes::BlockingPublishes;

/// Blocks the calling thread until the operation resolves, validates the result, and anchors any
/// failure to the blocking call that is waiting on it.
fn wait_for_operation<T, R>(
    operation_name: &str,
    operation: Pin<Box<dyn Future<Output = GneissResult<T>> + Send>>,
    validator: impl FnOnce(T) -> GneissResult<R>,
    call_site: &'static Location<'static>) -> GneissResult<R> {

    let result = block_on(operation).and_then(validator);
    match &result {
        Ok(_) => { debug!("BlockingClient - {} operation completed", operation_name); }
        Err(error) => { debug!("BlockingClient - {} operation failed: {}", operation_name, error); }
    }

    result.map_err(|error| error.anchored_at(call_site))
}

/// A blocking network client that functions as a thin wrapper over an asynchronous MQTT5 client.
///
/// Every operation is submitted to the asynchronous client and the calling thread is suspended
/// until the operation's single result is available.  All protocol work happens off the calling
/// thread.  Failures are reported as if they happened at the blocking call: see
/// [`GneissError::call_site`].
///
/// There are no mutable functions in the client API, so you can safely share it amongst threads.
/// Clones share the same underlying client and connection.
#[derive(Clone)]
pub struct BlockingClient {
    client: AsyncClientHandle
}

impl BlockingClient {

    /// Creates a blocking view of an asynchronous client
    pub fn new(client: AsyncClientHandle) -> Self {
        BlockingClient {
            client
        }
    }

    /// Blocking.  Connects to the configured broker.  When no packet is supplied, the CONNECT is built
    /// from the client configuration's connect options.
    #[track_caller]
    pub fn connect(&self, packet: Option<ConnectPacket>) -> GneissResult<ConnackPacket> {
        let call_site = Location::caller();
        let packet = packet.unwrap_or_else(|| self.client.config().connect_options().to_connect_packet());

        debug!("BlockingClient - submitting connect: {}", packet);
        wait_for_operation("Connect", self.client.connect(packet), Ok, call_site)
    }

    /// Blocking.  Subscribes to one or more topic filters.
    ///
    /// Fails with `SubackFailure`, carrying the full Suback, if any subscription was rejected.
    #[track_caller]
    pub fn subscribe(&self, packet: SubscribePacket, options: Option<SubscribeOptions>) -> GneissResult<SubackPacket> {
        let call_site = Location::caller();

        debug!("BlockingClient - submitting subscribe: {}", packet);
        wait_for_operation("Subscribe", self.client.subscribe(packet, options), validate_suback, call_site)
    }

    /// Creates a blocking handle to the incoming publishes selected by the filter.  Does not block.
    pub fn publishes(&self, filter: PublishFilter) -> BlockingPublishes {
        debug!("BlockingClient - creating publish stream with filter {}", filter);
        BlockingPublishes::new(self.client.publishes(filter))
    }

    /// Blocking.  Unsubscribes from one or more topic filters.
    ///
    /// Fails with `UnsubackFailure`, carrying the full Unsuback, if any topic filter was rejected.
    #[track_caller]
    pub fn unsubscribe(&self, packet: UnsubscribePacket, options: Option<UnsubscribeOptions>) -> GneissResult<UnsubackPacket> {
        let call_site = Location::caller();

        debug!("BlockingClient - submitting unsubscribe: {}", packet);
        wait_for_operation("Unsubscribe", self.client.unsubscribe(packet, options), validate_unsuback, call_site)
    }

    /// Blocking.  Publishes a message and waits for the publish to complete at its QoS level.
    ///
    /// A missing packet fails with `InvalidArgument` before anything is submitted.  A failure carried
    /// by the publish outcome is returned as an error.
    #[track_caller]
    pub fn publish(&self, packet: Option<PublishPacket>, options: Option<PublishOptions>) -> GneissResult<PublishOutcome> {
        let call_site = Location::caller();
        let Some(packet) = packet else {
            return Err(GneissError::new_invalid_argument("publish packet must not be null").anchored_at(call_site));
        };

        debug!("BlockingClient - submitting publish: {}", packet);
        wait_for_operation("Publish", self.client.publish(packet, options), validate_publish_outcome, call_site)
    }

    /// Blocking.  Reauthenticates the current connection.
    #[track_caller]
    pub fn reauth(&self) -> GneissResult<()> {
        let call_site = Location::caller();

        debug!("BlockingClient - submitting reauth");
        wait_for_operation("Reauth", self.client.reauth(), Ok, call_site)
    }

    /// Blocking.  Disconnects from the broker.  When no packet is supplied, a normal disconnection is sent.
    #[track_caller]
    pub fn disconnect(&self, packet: Option<DisconnectPacket>) -> GneissResult<()> {
        let call_site = Location::caller();
        let packet = packet.unwrap_or_default();

        debug!("BlockingClient - submitting disconnect: {}", packet);
        wait_for_operation("Disconnect", self.client.disconnect(packet), Ok, call_site)
    }

    /// Returns the configuration of the underlying client
    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    /// Returns the asynchronous view of the underlying client
    pub fn to_async(&self) -> AsyncClientHandle {
        self.client.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfigBuilder, ConnectOptionsBuilder};
    use crate::testing::mock_client::*;
    use assert_matches::assert_matches;
    use std::error::Error;
    use std::fmt;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug)]
    struct QuotaRejection;

    impl fmt::Display for QuotaRejection {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "quota exceeded")
        }
    }

    impl Error for QuotaRejection {}

    fn create_client() -> (Arc<MockAsyncClient>, BlockingClient) {
        let connect_options = ConnectOptionsBuilder::new()
            .with_client_id("blocking-test")
            .with_keep_alive_interval_seconds(Some(30))
            .build();
        let config = ClientConfigBuilder::new("localhost", 1883)
            .with_connect_options(connect_options)
            .build();

        let mock = MockAsyncClient::new(config);
        let client = AsyncClientHandle::new(mock.clone()).to_blocking();

        (mock, client)
    }

    fn create_subscribe() -> SubscribePacket {
        SubscribePacket::builder()
            .with_subscription(Subscription::builder("a/b".to_string(), QualityOfService::AtLeastOnce).build())
            .with_subscription(Subscription::builder("c/d".to_string(), QualityOfService::AtMostOnce).build())
            .build()
    }

    #[test]
    fn connect_without_packet_uses_configured_options() {
        let (mock, client) = create_client();
        let connack = ConnackPacket {
            session_present: true,
            ..Default::default()
        };
        mock.set_connect_result(Ok(connack.clone()));

        assert_eq!(connack, client.connect(None).unwrap());

        let calls = mock.calls();
        assert_matches!(&calls[0], MockCall::Connect(packet) => {
            assert_eq!(Some("blocking-test".to_string()), packet.client_id);
            assert_eq!(30, packet.keep_alive_interval_seconds);
        });
    }

    #[test]
    fn connect_with_packet_forwards_it_unchanged() {
        let (mock, client) = create_client();
        let packet = ConnectPacket {
            client_id: Some("explicit".to_string()),
            ..Default::default()
        };

        client.connect(Some(packet.clone())).unwrap();
        assert_eq!(vec![MockCall::Connect(packet)], mock.calls());
    }

    #[test]
    fn connect_failure_is_anchored_at_caller() {
        let (mock, client) = create_client();
        let failure = GneissError::new_connection_establishment_failure("connection refused");
        let origin = failure.origin();
        mock.set_connect_result(Err(failure));

        let line = line!() + 1;
        let error = client.connect(None).unwrap_err();

        assert_matches!(error, GneissError::ConnectionEstablishmentFailure(_));
        assert_eq!(origin, error.origin());
        let call_site = error.call_site().unwrap();
        assert_eq!(file!(), call_site.file());
        assert_eq!(line, call_site.line());
        assert_eq!("connection refused", error.source().unwrap().to_string());
    }

    #[test]
    fn subscribe_with_success_codes_returns_suback() {
        let (mock, client) = create_client();
        let suback = SubackPacket {
            packet_id: 1,
            reason_codes: vec![SubackReasonCode::GrantedQos1, SubackReasonCode::GrantedQos0],
            ..Default::default()
        };
        mock.set_subscribe_result(Ok(suback.clone()));

        assert_eq!(suback, client.subscribe(create_subscribe(), None).unwrap());
        assert_eq!(vec![MockCall::Subscribe(create_subscribe())], mock.calls());
    }

    #[test]
    fn subscribe_with_error_code_fails_with_suback() {
        let (mock, client) = create_client();
        let suback = SubackPacket {
            packet_id: 1,
            reason_codes: vec![SubackReasonCode::GrantedQos1, SubackReasonCode::NotAuthorized],
            ..Default::default()
        };
        mock.set_subscribe_result(Ok(suback.clone()));

        let line = line!() + 1;
        let error = client.subscribe(create_subscribe(), Some(SubscribeOptionsBuilder::new().with_timeout(Duration::from_secs(5)).build())).unwrap_err();

        assert_eq!(line, error.call_site().unwrap().line());
        assert_matches!(error, GneissError::SubackFailure(context) => {
            assert_eq!(suback, context.suback);
        });
    }

    #[test]
    fn unsubscribe_with_error_code_fails_with_unsuback() {
        let (mock, client) = create_client();
        let unsuback = UnsubackPacket {
            packet_id: 2,
            reason_codes: vec![UnsubackReasonCode::Success, UnsubackReasonCode::TopicNameInvalid],
            ..Default::default()
        };
        mock.set_unsubscribe_result(Ok(unsuback.clone()));

        let unsubscribe = UnsubscribePacket::builder().with_topic_filter("a/b".to_string()).with_topic_filter("#/#".to_string()).build();
        assert_matches!(client.unsubscribe(unsubscribe, None), Err(GneissError::UnsubackFailure(context)) => {
            assert_eq!(unsuback, context.unsuback);
        });
    }

    #[test]
    fn unsubscribe_with_success_codes_returns_unsuback() {
        let (mock, client) = create_client();
        let unsuback = UnsubackPacket {
            packet_id: 2,
            reason_codes: vec![UnsubackReasonCode::Success],
            ..Default::default()
        };
        mock.set_unsubscribe_result(Ok(unsuback.clone()));

        let unsubscribe = UnsubscribePacket::builder().with_topic_filter("a/b".to_string()).build();
        assert_eq!(unsuback, client.unsubscribe(unsubscribe, None).unwrap());
    }

    #[test]
    fn publish_without_packet_fails_before_submission() {
        let (mock, client) = create_client();

        let line = line!() + 1;
        let error = client.publish(None, None).unwrap_err();

        assert_matches!(error, GneissError::InvalidArgument(_));
        assert_eq!(line, error.call_site().unwrap().line());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn publish_returns_outcome() {
        let (mock, client) = create_client();
        let publish = PublishPacket::builder("a/b".to_string(), QualityOfService::AtLeastOnce)
            .with_payload("hello".as_bytes().to_vec())
            .build();

        let outcome = client.publish(Some(publish.clone()), Some(PublishOptionsBuilder::new().build())).unwrap();

        assert_eq!(publish, outcome.publish);
        assert_matches!(outcome.response, Some(PublishResponse::Qos1(_)));
        assert!(outcome.error.is_none());
        assert_eq!(vec![MockCall::Publish(publish)], mock.calls());
    }

    #[test]
    fn publish_outcome_failure_is_wrapped() {
        let (mock, client) = create_client();
        let publish = PublishPacket::builder("a/b".to_string(), QualityOfService::AtLeastOnce).build();
        mock.set_publish_result(Ok(PublishOutcome::new_failed(publish.clone(), Arc::new(QuotaRejection))));

        let error = client.publish(Some(publish), None).unwrap_err();

        assert_matches!(error, GneissError::PublishFailure(_));
        assert!(error.call_site().is_some());
        assert_eq!("quota exceeded", error.source().unwrap().to_string());
    }

    #[test]
    fn publish_outcome_crate_error_keeps_variant() {
        let (mock, client) = create_client();
        let publish = PublishPacket::builder("a/b".to_string(), QualityOfService::ExactlyOnce).build();
        mock.set_publish_result(Ok(PublishOutcome::new_failed(publish.clone(), Arc::new(GneissError::new_ack_timeout()))));

        assert_matches!(client.publish(Some(publish), None), Err(GneissError::AckTimeout(_)));
    }

    #[test]
    fn reauth_and_disconnect_complete() {
        let (mock, client) = create_client();

        client.reauth().unwrap();
        client.disconnect(None).unwrap();

        assert_eq!(vec![MockCall::Reauth, MockCall::Disconnect(DisconnectPacket::default())], mock.calls());
    }

    #[test]
    fn disconnect_failure_keeps_variant() {
        let (mock, client) = create_client();
        mock.set_disconnect_result(Err(GneissError::new_client_closed()));

        let disconnect = DisconnectPacket {
            reason_code: DisconnectReasonCode::DisconnectWithWillMessage,
            ..Default::default()
        };
        assert_matches!(client.disconnect(Some(disconnect)), Err(GneissError::ClientClosed(_)));
    }

    #[test]
    fn reauth_failure_is_anchored_at_caller() {
        let (mock, client) = create_client();
        mock.set_reauth_result(Err(GneissError::new_other_error("reauthentication not supported by broker")));

        let line = line!() + 1;
        let error = client.reauth().unwrap_err();

        assert_matches!(error, GneissError::OtherError(_));
        assert_eq!(line, error.call_site().unwrap().line());
    }

    #[test]
    fn abandoned_operation_is_channel_failure() {
        let (mock, client) = create_client();
        mock.abandon_operations();

        assert_matches!(client.reauth(), Err(GneissError::OperationChannelFailure(_)));
        assert_matches!(client.subscribe(create_subscribe(), None), Err(GneissError::OperationChannelFailure(_)));
    }

    #[test]
    fn publishes_forwards_filter_and_delivers() {
        let (mock, client) = create_client();
        let publishes = client.publishes(PublishFilter::Subscribed);
        let publish = PublishPacket::builder("a/b".to_string(), QualityOfService::AtMostOnce).build();

        mock.producer(0).push(publish.clone());

        assert_eq!(publish, publishes.receive().unwrap());
        assert_eq!(vec![MockCall::Publishes(PublishFilter::Subscribed)], mock.calls());

        publishes.close();
        assert_eq!(1, mock.producer(0).cancel_count());
    }

    #[test]
    fn views_share_the_underlying_client() {
        let (mock, client) = create_client();

        assert_eq!("localhost", client.config().endpoint());
        assert_eq!(1883, client.config().port());

        let async_client = client.to_async();
        block_on(async_client.reauth()).unwrap();
        client.to_async().to_blocking().reauth().unwrap();

        assert_eq!(vec![MockCall::Reauth, MockCall::Reauth], mock.calls());
    }
}

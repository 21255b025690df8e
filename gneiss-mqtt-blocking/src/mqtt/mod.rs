/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing a set of structured data types that model the MQTT5 specification.

Only the packets that cross the blocking boundary are modeled: requests submitted by the user
and the acknowledgements and publishes handed back by the asynchronous client.  Encoding and
decoding belong to the asynchronous client.
 */

pub mod utils;

use utils::impl_reason_code;

/// Common classification shared by all MQTT5 reason code enumerations.
///
/// Every MQTT5 reason code with a numeric value of 0x80 or above denotes a failure.
pub trait ReasonCode {

    /// Returns the protocol-defined numeric value of the reason code
    fn code(&self) -> u8;

    /// Returns whether or not the reason code denotes a failure
    fn is_error(&self) -> bool {
        self.code() >= 0x80
    }
}

/// MQTT message delivery quality of service.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901234) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum QualityOfService {

    /// The message is delivered according to the capabilities of the underlying network. No response is sent by the
    /// receiver and no retry is performed by the sender. The message arrives at the receiver either once or not at all.
    #[default]
    AtMostOnce = 0,

    /// A level of service that ensures that the message arrives at the receiver at least once.
    AtLeastOnce = 1,

    /// A level of service that ensures that the message arrives at the receiver exactly once.
    ExactlyOnce = 2,
}

/// Optional property describing a PUBLISH payload's format.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901111) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PayloadFormatIndicator {

    /// The payload is arbitrary binary data
    #[default]
    Bytes = 0,

    /// The payload is a well-formed utf-8 string value.
    Utf8 = 1,
}

/// Configures how retained messages should be handled when subscribing with a topic filter that matches topics with
/// associated retained messages.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901169) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RetainHandlingType {

    /// The server should always send all retained messages on topics that match a subscription's filter.
    #[default]
    SendOnSubscribe = 0,

    /// The server should send retained messages on topics that match the subscription's filter, but only for the
    /// first matching subscription, per session.
    SendOnSubscribeIfNew = 1,

    /// Subscriptions must not trigger any retained message publishes from the server.
    DontSend = 2,
}

/// Server return code for connection attempts.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901079) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ConnectReasonCode {

    /// Returned when the connection is accepted.
    #[default]
    Success = 0,

    /// Returned when the server has a failure but does not want to specify a reason or none
    /// of the other reason codes apply.
    UnspecifiedError = 128,

    /// Returned when data in the CONNECT packet could not be correctly parsed by the server.
    MalformedPacket = 129,

    /// Returned when data in the CONNECT packet does not conform to the MQTT5 specification requirements.
    ProtocolError = 130,

    /// Returned when the CONNECT packet is valid but was not accepted by the server.
    ImplementationSpecificError = 131,

    /// Returned when the server does not support MQTT5 protocol version specified in the connection.
    UnsupportedProtocolVersion = 132,

    /// Returned when the client identifier in the CONNECT packet is a valid string but not one that
    /// is allowed on the server.
    ClientIdentifierNotValid = 133,

    /// Returned when the server does not accept the username and/or password specified by the client
    /// in the connection packet.
    BadUsernameOrPassword = 134,

    /// Returned when the client is not authorized to connect to the server.
    NotAuthorized = 135,

    /// Returned when the MQTT5 server is not available.
    ServerUnavailable = 136,

    /// Returned when the server is too busy to make a connection. It is recommended that the client try again later.
    ServerBusy = 137,

    /// Returned when the client has been banned from the server.
    Banned = 138,

    /// Returned when the authentication method used in the connection is either not supported on the server or it does
    /// not match the authentication method currently in use in the CONNECT packet.
    BadAuthenticationMethod = 140,

    /// Returned when the connection packet exceeded the maximum permissible size on the server.
    PacketTooLarge = 149,

    /// Returned when the quota limits set on the server have been met and/or exceeded.
    QuotaExceeded = 151,

    /// Returned when the server is telling the client to temporarily use another server instead of the one they
    /// are trying to connect to.
    UseAnotherServer = 156,

    /// Returned when the server is telling the client to permanently use another server instead of the one they
    /// are trying to connect to.
    ServerMoved = 157,

    /// Returned when the server connection rate limit has been exceeded.
    ConnectionRateExceeded = 159,
}

impl_reason_code!(ConnectReasonCode);

/// Reason code inside PUBACK packets that indicates the result of the associated PUBLISH request.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901124) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PubackReasonCode {

    /// Returned when the (QoS 1) publish was accepted by the recipient.
    #[default]
    Success = 0,

    /// Returned when the (QoS 1) publish was accepted but there were no matching subscribers.
    NoMatchingSubscribers = 16,

    /// Returned when the (QoS 1) publish was not accepted and the receiver does not want to specify a reason or none
    /// of the other reason codes apply.
    UnspecifiedError = 128,

    /// Returned when the (QoS 1) PUBLISH was valid but the receiver was not willing to accept it.
    ImplementationSpecificError = 131,

    /// Returned when the (QoS 1) PUBLISH was not authorized by the receiver.
    NotAuthorized = 135,

    /// Returned when the (QoS 1) PUBLISH topic name was valid but not accepted by the receiver.
    TopicNameInvalid = 144,

    /// Returned when the (QoS 1) PUBLISH packet identifier is already in use.
    PacketIdentifierInUse = 145,

    /// Returned when the (QoS 1) PUBLISH was not accepted because a quota was exceeded.
    QuotaExceeded = 151,

    /// Returned when the (QoS 1) PUBLISH payload did not match its payload format indicator.
    PayloadFormatInvalid = 153,
}

impl_reason_code!(PubackReasonCode);

/// Reason code inside PUBREC packets that indicates the result of the associated QoS 2 PUBLISH request.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901134) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PubrecReasonCode {

    /// Returned when the (QoS 2) publish was accepted by the recipient.
    #[default]
    Success = 0,

    /// Returned when the (QoS 2) publish was accepted but there were no matching subscribers.
    NoMatchingSubscribers = 16,

    /// Returned when the (QoS 2) publish was not accepted and the receiver does not want to specify a reason or none
    /// of the other reason codes apply.
    UnspecifiedError = 128,

    /// Returned when the (QoS 2) PUBLISH was valid but the receiver was not willing to accept it.
    ImplementationSpecificError = 131,

    /// Returned when the (QoS 2) PUBLISH was not authorized by the receiver.
    NotAuthorized = 135,

    /// Returned when the (QoS 2) PUBLISH topic name was valid but not accepted by the receiver.
    TopicNameInvalid = 144,

    /// Returned when the (QoS 2) PUBLISH packet identifier is already in use.
    PacketIdentifierInUse = 145,

    /// Returned when the (QoS 2) PUBLISH was not accepted because a quota was exceeded.
    QuotaExceeded = 151,

    /// Returned when the (QoS 2) PUBLISH payload did not match its payload format indicator.
    PayloadFormatInvalid = 153,
}

impl_reason_code!(PubrecReasonCode);

/// Reason code inside PUBCOMP packets that indicates the result of the associated PUBREL packet.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901154) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PubcompReasonCode {

    /// Returned when the associated PUBREL was successfully handled by the recipient.
    #[default]
    Success = 0,

    /// Returned when the associated PUBREL referenced a packet identifier that the recipient was not tracking.
    PacketIdentifierNotFound = 146,
}

impl_reason_code!(PubcompReasonCode);

/// Reason code inside DISCONNECT packets.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901208) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DisconnectReasonCode {

    /// Close the connection normally. Do not send the Will message.
    #[default]
    NormalDisconnection = 0,

    /// The client wishes to disconnect but requires that the server also publishes its Will message.
    DisconnectWithWillMessage = 4,

    /// The connection is closed but the sender does not want to specify a reason or none of the other reason codes
    /// apply.
    UnspecifiedError = 128,

    /// The connection is closed because a received packet does not conform to the MQTT5 specification.
    ProtocolError = 130,

    /// The packet received is valid but cannot be processed by the current implementation.
    ImplementationSpecificError = 131,

    /// The request is not authorized.
    NotAuthorized = 135,

    /// The server is shutting down.
    ServerShuttingDown = 139,

    /// The connection is closed because no packet has been received for 1.5 times the keepalive time.
    KeepAliveTimeout = 141,

    /// Another connection using the same client id has connected, causing this connection to be closed.
    SessionTakenOver = 142,

    /// The connection is closed for administrative reasons.
    AdministrativeAction = 152,
}

impl_reason_code!(DisconnectReasonCode);

/// Reason codes inside SUBACK packet payloads that specify the results for each subscription in the associated
/// SUBSCRIBE packet.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901178) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubackReasonCode {

    /// Returned when the subscription was accepted and the maximum QOS sent will be QOS 0.
    #[default]
    GrantedQos0 = 0,

    /// Returned when the subscription was accepted and the maximum QOS sent will be QOS 1.
    GrantedQos1 = 1,

    /// Returned when the subscription was accepted and the maximum QOS sent will be QOS 2.
    GrantedQos2 = 2,

    /// Returned when the subscription was not accepted but the server does not want to specify a reason or none
    /// of the other reason codes apply.
    UnspecifiedError = 128,

    /// Returned when the subscription was valid but the server did not accept it.
    ImplementationSpecificError = 131,

    /// Returned when the client was not authorized to make the subscription on the server.
    NotAuthorized = 135,

    /// Returned when the subscription topic filter was correctly formed but not allowed for the client.
    TopicFilterInvalid = 143,

    /// Returned when the packet identifier was already in use on the server.
    PacketIdentifierInUse = 145,

    /// Returned when a subscribe-related quota set on the server was exceeded.
    QuotaExceeded = 151,

    /// Returned when the subscription's topic filter was a shared subscription and the server does not support
    /// shared subscriptions.
    SharedSubscriptionsNotSupported = 158,

    /// Returned when the SUBSCRIBE packet contained a subscription identifier and the server does not support
    /// subscription identifiers.
    SubscriptionIdentifiersNotSupported = 161,

    /// Returned when the subscription's topic filter contains a wildcard but the server does not support
    /// wildcard subscriptions.
    WildcardSubscriptionsNotSupported = 162,
}

impl_reason_code!(SubackReasonCode);

/// Reason codes inside UNSUBACK packet payloads that specify the results for each topic filter in the associated
/// UNSUBSCRIBE packet.
///
/// Enum values match [MQTT5 spec](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901194) encoding values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UnsubackReasonCode {

    /// Returned when the unsubscribe was successful and the client is no longer subscribed to the topic filter on the server.
    #[default]
    Success = 0,

    /// Returned when the topic filter did not match one of the client's existing subscriptions on the server.
    NoSubscriptionExisted = 17,

    /// Returned when the unsubscribe of the topic filter was not accepted and the server does not want to specify a
    /// reason or none of the other reason codes apply.
    UnspecifiedError = 128,

    /// Returned when the topic filter was valid but the server does not accept an unsubscribe for it.
    ImplementationSpecificError = 131,

    /// Returned when the client was not authorized to unsubscribe from that topic filter on the server.
    NotAuthorized = 135,

    /// Returned when the topic filter was correctly formed but is not allowed for the client on the server.
    TopicNameInvalid = 144,

    /// Returned when the packet identifier was already in use on the server.
    PacketIdentifierInUse = 145,
}

impl_reason_code!(UnsubackReasonCode);

/// Data model for MQTT5 user properties.
///
/// A user property is a name-value pair of utf-8 strings that can be added to mqtt5 packets. Names are
/// not unique; a given name value can appear more than once in a packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserProperty {

    /// User property name
    pub name: String,

    /// User property value
    pub value: String,
}

/// Specifies a single subscription within a Subscribe operation
///
/// See [MQTT5 Subscription Options](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901169)
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Subscription {
    pub(crate) topic_filter: String,
    pub(crate) qos: QualityOfService,
    pub(crate) no_local: bool,
    pub(crate) retain_as_published: bool,
    pub(crate) retain_handling_type: RetainHandlingType,
}

impl Subscription {

    /// Creates a new builder for a Subscription
    pub fn builder(topic_filter: String, qos: QualityOfService) -> SubscriptionBuilder {
        SubscriptionBuilder::new(topic_filter, qos)
    }

    /// Returns the topic filter to subscribe to
    pub fn topic_filter(&self) -> &str { self.topic_filter.as_str() }

    /// Returns the maximum QoS on which the subscriber will accept publish messages.  Negotiated QoS may be different.
    pub fn qos(&self) -> QualityOfService { self.qos }

    /// Returns if the server should not send publishes to a client when that client was the one who sent the publish?
    pub fn no_local(&self) -> bool { self.no_local }

    /// Returns if messages sent due to this subscription should keep the retain flag preserved on the message
    pub fn retain_as_published(&self) -> bool { self.retain_as_published }

    /// Returns if retained messages on matching topics should be sent in reaction to this subscription
    pub fn retain_handling_type(&self) -> RetainHandlingType { self.retain_handling_type }
}

/// Builder type for Subscription instances
pub struct SubscriptionBuilder {
    subscription: Subscription
}

impl SubscriptionBuilder {
    pub(crate) fn new(topic_filter: String, qos: QualityOfService) -> Self {
        SubscriptionBuilder {
            subscription: Subscription {
                topic_filter,
                qos,
                ..Default::default()
            }
        }
    }

    /// Sets if the server should not send publishes to a client when that client was the one who sent the publish?
    pub fn with_no_local(mut self, no_local: bool) -> Self {
        self.subscription.no_local = no_local;
        self
    }

    /// Sets if messages sent due to this subscription should keep the retain flag preserved on the message
    pub fn with_retain_as_published(mut self, retain_as_published: bool) -> Self {
        self.subscription.retain_as_published = retain_as_published;
        self
    }

    /// Sets if retained messages on matching topics should be sent in reaction to this subscription
    pub fn with_retain_handling_type(mut self, retain_handling_type: RetainHandlingType) -> Self {
        self.subscription.retain_handling_type = retain_handling_type;
        self
    }

    /// Builds a new Subscription.  Consumes the builder in the process.
    pub fn build(self) -> Subscription {
        self.subscription
    }
}

/// Data model of an [MQTT5 CONNECT](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901033) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnectPacket {

    /// The maximum time interval, in seconds, that is permitted to elapse between the point at which the client
    /// finishes transmitting one MQTT packet and the point it starts sending the next.
    pub keep_alive_interval_seconds: u16,

    /// Whether or not the server should discard any existing session state for this client id.
    pub clean_start: bool,

    /// A unique string identifying the client to the server.  If absent, the broker assigns one.
    pub client_id: Option<String>,

    /// A string value that the server may use for client authentication and authorization.
    pub username: Option<String>,

    /// Opaque binary data that the server may use for client authentication and authorization.
    pub password: Option<Vec<u8>>,

    /// A time interval, in seconds, that the client requests the server to persist this connection's MQTT session
    /// state for.
    pub session_expiry_interval_seconds: Option<u32>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

/// Data model of an [MQTT5 CONNACK](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901074) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnackPacket {

    /// True if the client rejoined an existing session on the server, false otherwise.
    pub session_present: bool,

    /// Indicates either success or the reason for failure for the connection attempt.
    pub reason_code: ConnectReasonCode,

    /// A time interval, in seconds, that the server will persist this connection's MQTT session state for.
    pub session_expiry_interval: Option<u32>,

    /// Client identifier assigned by the server, if the CONNECT did not specify one.
    pub assigned_client_identifier: Option<String>,

    /// Server-requested override of the keep alive interval, in seconds.
    pub server_keep_alive: Option<u16>,

    /// Additional diagnostic information about the result of the connection attempt.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

/// Data model of an [MQTT5 PUBLISH](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901100) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PublishPacket {

    /// Sent publishes - The topic this message should be published to.
    ///
    /// Received publishes - The topic this message was published to.
    pub topic: String,

    /// The MQTT quality of service associated with this PUBLISH packet.
    pub qos: QualityOfService,

    /// True if this is a retransmission of a particular QoS 1 or 2 publish.
    pub duplicate: bool,

    /// True if this was a retained message, false otherwise.
    pub retain: bool,

    /// The payload of the publish message.
    pub payload: Option<Vec<u8>>,

    /// Property specifying the format of the payload data.  The mqtt5 client does not enforce or use this
    /// value in a meaningful way.
    pub payload_format: Option<PayloadFormatIndicator>,

    /// Sent publishes - indicates the maximum amount of time allowed to elapse for message delivery before the server
    /// should instead delete the message (relative to a recipient).
    pub message_expiry_interval_seconds: Option<u32>,

    /// Opaque topic string intended to assist with request/response implementations.
    pub response_topic: Option<String>,

    /// Opaque binary data used to correlate between publish messages, as a potential method for request-response
    /// implementation.
    pub correlation_data: Option<Vec<u8>>,

    /// Sent publishes - ignored
    ///
    /// Received publishes - the subscription identifiers of all the subscriptions this message matched.
    pub subscription_identifiers: Option<Vec<u32>>,

    /// Property specifying the content type of the payload.  Not internally meaningful to MQTT5.
    pub content_type: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

impl PublishPacket {

    /// Creates a new builder for a PublishPacket
    pub fn builder(topic: String, qos: QualityOfService) -> PublishPacketBuilder {
        PublishPacketBuilder::new(topic, qos)
    }
}

/// Builder type for PublishPacket instances
pub struct PublishPacketBuilder {
    packet: PublishPacket
}

impl PublishPacketBuilder {
    pub(crate) fn new(topic: String, qos: QualityOfService) -> Self {
        PublishPacketBuilder {
            packet: PublishPacket {
                topic,
                qos,
                ..Default::default()
            }
        }
    }

    /// Sets if this should be a retained message.
    pub fn with_retain(mut self, retain: bool) -> Self {
        self.packet.retain = retain;
        self
    }

    /// Sets the payload of the publish message.
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.packet.payload = Some(payload);
        self
    }

    /// Sets the property specifying the format of the payload data.
    pub fn with_payload_format(mut self, payload_format: PayloadFormatIndicator) -> Self {
        self.packet.payload_format = Some(payload_format);
        self
    }

    /// Sets the maximum amount of time allowed to elapse for message delivery before the server
    /// should instead delete the message (relative to a recipient).
    pub fn with_message_expiry_interval_seconds(mut self, message_expiry_interval_seconds: u32) -> Self {
        self.packet.message_expiry_interval_seconds = Some(message_expiry_interval_seconds);
        self
    }

    /// Sets an opaque topic string intended to assist with request/response implementations.
    pub fn with_response_topic(mut self, response_topic: String) -> Self {
        self.packet.response_topic = Some(response_topic);
        self
    }

    /// Sets opaque binary data used to correlate between publish messages.
    pub fn with_correlation_data(mut self, correlation_data: Vec<u8>) -> Self {
        self.packet.correlation_data = Some(correlation_data);
        self
    }

    /// Sets the content type of the payload.
    pub fn with_content_type(mut self, content_type: String) -> Self {
        self.packet.content_type = Some(content_type);
        self
    }

    /// Adds a user property to the publish.
    pub fn with_user_property(mut self, property: UserProperty) -> Self {
        self.packet.user_properties.get_or_insert_with(Vec::new).push(property);
        self
    }

    /// Builds a new PublishPacket.  Consumes the builder in the process.
    pub fn build(self) -> PublishPacket {
        self.packet
    }
}

/// Data model of an [MQTT5 PUBACK](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901121) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PubackPacket {

    /// Id of the QoS 1 publish this packet is acknowledging
    pub packet_id: u16,

    /// Success indicator or failure reason for the associated PUBLISH packet.
    pub reason_code: PubackReasonCode,

    /// Additional diagnostic information about the result of the PUBLISH attempt.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

/// Data model of an [MQTT5 PUBREC](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901131) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PubrecPacket {

    /// Id of the QoS 2 publish this packet is acknowledging
    pub packet_id: u16,

    /// Success indicator or failure reason for the associated QoS 2 PUBLISH packet.
    pub reason_code: PubrecReasonCode,

    /// Additional diagnostic information about the result of the PUBLISH attempt.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

/// Data model of an [MQTT5 PUBCOMP](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901151) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PubcompPacket {

    /// Id of the QoS 2 publish this packet corresponds to
    pub packet_id: u16,

    /// Success indicator or failure reason for the final step of a QoS 2 PUBLISH delivery.
    pub reason_code: PubcompReasonCode,

    /// Additional diagnostic information about the final step of a QoS 2 PUBLISH delivery.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

/// Data model of an [MQTT5 SUBSCRIBE](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901161) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubscribePacket {

    /// List of topic filter subscriptions that the client wishes to listen to
    pub subscriptions: Vec<Subscription>,

    /// A positive integer to associate with all subscriptions in this request.  Publish packets that match
    /// a subscription in this request should include this identifier in the resulting message.
    pub subscription_identifier: Option<u32>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

impl SubscribePacket {

    /// Creates a new builder for a SubscribePacket
    pub fn builder() -> SubscribePacketBuilder {
        SubscribePacketBuilder {
            packet: SubscribePacket::default()
        }
    }
}

/// Builder type for SubscribePacket instances
pub struct SubscribePacketBuilder {
    packet: SubscribePacket
}

impl SubscribePacketBuilder {

    /// Adds a subscription to the request
    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.packet.subscriptions.push(subscription);
        self
    }

    /// Sets the subscription identifier to associate with all subscriptions in the request
    pub fn with_subscription_identifier(mut self, subscription_identifier: u32) -> Self {
        self.packet.subscription_identifier = Some(subscription_identifier);
        self
    }

    /// Adds a user property to the request
    pub fn with_user_property(mut self, property: UserProperty) -> Self {
        self.packet.user_properties.get_or_insert_with(Vec::new).push(property);
        self
    }

    /// Builds a new SubscribePacket.  Consumes the builder in the process.
    pub fn build(self) -> SubscribePacket {
        self.packet
    }
}

/// Data model of an [MQTT5 SUBACK](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901171) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubackPacket {

    /// Id of the subscribe this packet is acknowledging
    pub packet_id: u16,

    /// Additional diagnostic information about the result of the SUBSCRIBE attempt.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,

    /// A list of reason codes indicating the result of each individual subscription entry in the
    /// associated SUBSCRIBE packet.
    pub reason_codes: Vec<SubackReasonCode>,
}

/// Data model of an [MQTT5 UNSUBSCRIBE](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901179) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnsubscribePacket {

    /// List of topic filters that the client wishes to unsubscribe from.
    pub topic_filters: Vec<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

impl UnsubscribePacket {

    /// Creates a new builder for an UnsubscribePacket
    pub fn builder() -> UnsubscribePacketBuilder {
        UnsubscribePacketBuilder {
            packet: UnsubscribePacket::default()
        }
    }
}

/// Builder type for UnsubscribePacket instances
pub struct UnsubscribePacketBuilder {
    packet: UnsubscribePacket
}

impl UnsubscribePacketBuilder {

    /// Adds a topic filter to unsubscribe from
    pub fn with_topic_filter(mut self, topic_filter: String) -> Self {
        self.packet.topic_filters.push(topic_filter);
        self
    }

    /// Adds a user property to the request
    pub fn with_user_property(mut self, property: UserProperty) -> Self {
        self.packet.user_properties.get_or_insert_with(Vec::new).push(property);
        self
    }

    /// Builds a new UnsubscribePacket.  Consumes the builder in the process.
    pub fn build(self) -> UnsubscribePacket {
        self.packet
    }
}

/// Data model of an [MQTT5 UNSUBACK](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901187) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnsubackPacket {

    /// Id of the unsubscribe this packet is acknowledging
    pub packet_id: u16,

    /// Additional diagnostic information about the result of the UNSUBSCRIBE attempt.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,

    /// A list of reason codes indicating the result of unsubscribing from each individual topic filter entry in the
    /// associated UNSUBSCRIBE packet.
    pub reason_codes: Vec<UnsubackReasonCode>,
}

/// Data model of an [MQTT5 DISCONNECT](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901205) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DisconnectPacket {

    /// Value indicating the reason that the sender is closing the connection
    pub reason_code: DisconnectReasonCode,

    /// Requests a change to the session expiry interval negotiated at connection time as part of the disconnect.
    pub session_expiry_interval_seconds: Option<u32>,

    /// Additional diagnostic information about the reason that the sender is closing the connection
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,

    /// Property indicating an alternate server that the client may temporarily or permanently attempt
    /// to connect to instead of the configured endpoint.  Will only be set if the reason code indicates another
    /// server may be used (ServerMoved, UseAnotherServer).
    pub server_reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_code_error_classification() {
        assert!(!SubackReasonCode::GrantedQos2.is_error());
        assert!(SubackReasonCode::UnspecifiedError.is_error());
        assert!(SubackReasonCode::WildcardSubscriptionsNotSupported.is_error());

        assert!(!UnsubackReasonCode::NoSubscriptionExisted.is_error());
        assert!(UnsubackReasonCode::NotAuthorized.is_error());

        assert!(!PubackReasonCode::NoMatchingSubscribers.is_error());
        assert!(PubcompReasonCode::PacketIdentifierNotFound.is_error());
        assert!(!DisconnectReasonCode::DisconnectWithWillMessage.is_error());
    }

    #[test]
    fn publish_builder_accumulates_user_properties() {
        let publish = PublishPacket::builder("a/b".to_string(), QualityOfService::AtLeastOnce)
            .with_payload("hello".as_bytes().to_vec())
            .with_user_property(UserProperty { name: "one".to_string(), value: "1".to_string() })
            .with_user_property(UserProperty { name: "two".to_string(), value: "2".to_string() })
            .build();

        assert_eq!("a/b", publish.topic);
        assert_eq!(QualityOfService::AtLeastOnce, publish.qos);
        assert_eq!(Some("hello".as_bytes().to_vec()), publish.payload);
        assert_eq!(2, publish.user_properties.unwrap().len());
    }
}

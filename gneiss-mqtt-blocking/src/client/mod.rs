/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing the public MQTT client views and associated types necessary to invoke operations on them.

The [`asynchronous`] module describes the engine boundary: the operations an asynchronous MQTT client
exposes and the demand-paced publish stream it produces.  The [`synchronous`] module layers blocking
calls on top of that boundary.
 */

#![warn(missing_docs)]

pub mod asynchronous;
pub mod synchronous;

use crate::mqtt::*;

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

/// Additional client options applicable to an MQTT Publish operation
#[derive(Debug, Default, Clone)]
pub struct PublishOptions {
    pub(crate) timeout: Option<Duration>,
}

impl PublishOptions {

    /// Returns the amount of time the client will wait for the operation's acknowledgement before
    /// failing it, if set
    pub fn timeout(&self) -> Option<Duration> { self.timeout }
}

/// Builder type for the set of additional client options applicable to an MQTT Publish operation
#[derive(Default)]
pub struct PublishOptionsBuilder {
    options: PublishOptions
}

impl PublishOptionsBuilder {

    /// Creates a new builder object for PublishOptions
    pub fn new() -> Self {
        PublishOptionsBuilder {
            ..Default::default()
        }
    }

    /// Sets the operation timeout for a Publish operation.  Operation timeouts only measure the
    /// time between when the operation is written to the socket and when the corresponding ACK
    /// packet is received from the broker.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Creates a new PublishOptions object from what was configured on the builder.
    pub fn build(self) -> PublishOptions {
        self.options
    }
}

/// Additional client options applicable to an MQTT Subscribe operation
#[derive(Debug, Default, Clone)]
pub struct SubscribeOptions {
    pub(crate) timeout: Option<Duration>,
}

impl SubscribeOptions {

    /// Returns the amount of time the client will wait for the operation's acknowledgement before
    /// failing it, if set
    pub fn timeout(&self) -> Option<Duration> { self.timeout }
}

/// Builder type for the set of additional client options applicable to an MQTT Subscribe operation
#[derive(Default)]
pub struct SubscribeOptionsBuilder {
    options: SubscribeOptions
}

impl SubscribeOptionsBuilder {

    /// Creates a new builder object for SubscribeOptions
    pub fn new() -> Self {
        SubscribeOptionsBuilder {
            ..Default::default()
        }
    }

    /// Sets the operation timeout for a Subscribe operation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Creates a new SubscribeOptions object from what was configured on the builder.
    pub fn build(self) -> SubscribeOptions {
        self.options
    }
}

/// Additional client options applicable to an MQTT Unsubscribe operation
#[derive(Debug, Default, Clone)]
pub struct UnsubscribeOptions {
    pub(crate) timeout: Option<Duration>,
}

impl UnsubscribeOptions {

    /// Returns the amount of time the client will wait for the operation's acknowledgement before
    /// failing it, if set
    pub fn timeout(&self) -> Option<Duration> { self.timeout }
}

/// Builder type for the set of additional client options applicable to an MQTT Unsubscribe operation
#[derive(Default)]
pub struct UnsubscribeOptionsBuilder {
    options: UnsubscribeOptions
}

impl UnsubscribeOptionsBuilder {

    /// Creates a new builder object for UnsubscribeOptions
    pub fn new() -> Self {
        UnsubscribeOptionsBuilder {
            ..Default::default()
        }
    }

    /// Sets the operation timeout for an Unsubscribe operation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Creates a new UnsubscribeOptions object from what was configured on the builder.
    pub fn build(self) -> UnsubscribeOptions {
        self.options
    }
}

/// Union type representing the possible ways a QoS 2 publish can be acknowledged
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Qos2Response {

    /// The publish was rejected by the broker with a PUBREC failure
    Pubrec(PubrecPacket),

    /// The publish completed the full QoS 2 exchange
    Pubcomp(PubcompPacket),
}

impl Display for Qos2Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Qos2Response::Pubrec(pubrec) => {
                write!(f, "Pubrec ( {} )", pubrec)
            }
            Qos2Response::Pubcomp(pubcomp) => {
                write!(f, "Pubcomp ( {} )", pubcomp)
            }
        }
    }
}

/// Union type representing the acknowledgement of a publish, as determined by its QoS level
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PublishResponse {

    /// QoS 0 publishes complete when written; there is no acknowledgement
    Qos0,

    /// QoS 1 publishes complete on receipt of a PUBACK
    Qos1(PubackPacket),

    /// QoS 2 publishes complete on receipt of a PUBCOMP or a failing PUBREC
    Qos2(Qos2Response),
}

impl Display for PublishResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PublishResponse::Qos0 => {
                write!(f, "PublishResponse Qos0")
            }
            PublishResponse::Qos1(puback) => {
                write!(f, "PublishResponse Qos1 ( {} )", puback)
            }
            PublishResponse::Qos2(qos2response) => {
                write!(f, "PublishResponse Qos2 ( {} )", qos2response)
            }
        }
    }
}

/// Terminal result of a single publish as reported by the asynchronous client.
///
/// An outcome can carry a failure alongside the publish it refers to.  The blocking client
/// converts a carried failure into an error before returning.
#[derive(Clone, Debug)]
pub struct PublishOutcome {

    /// The publish that this outcome refers to
    pub publish: PublishPacket,

    /// The acknowledgement of the publish, if one was received
    pub response: Option<PublishResponse>,

    /// Failure encountered while carrying out the publish, if any
    pub error: Option<Arc<dyn Error + Send + Sync>>,
}

impl PublishOutcome {

    /// Creates a successful outcome for a publish
    pub fn new(publish: PublishPacket, response: PublishResponse) -> Self {
        PublishOutcome {
            publish,
            response: Some(response),
            error: None,
        }
    }

    /// Creates an outcome for a publish that failed
    pub fn new_failed(publish: PublishPacket, error: Arc<dyn Error + Send + Sync>) -> Self {
        PublishOutcome {
            publish,
            response: None,
            error: Some(error),
        }
    }
}

impl Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublishOutcome {{ publish: {}", self.publish)?;
        if let Some(response) = &self.response {
            write!(f, " response: {}", response)?;
        }
        if let Some(error) = &self.error {
            write!(f, " error: {}", error)?;
        }
        write!(f, " }}")
    }
}

/// Selects which incoming publishes a publish stream should carry.
///
/// Interpretation belongs to the asynchronous client; the blocking client forwards the filter unchanged.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PublishFilter {

    /// Every incoming publish
    #[default]
    All,

    /// Incoming publishes that match one of the client's subscriptions
    Subscribed,

    /// Incoming publishes that do not match any of the client's subscriptions
    Unsolicited,

    /// Incoming publishes not already consumed by some other publish stream
    Remaining,
}

impl Display for PublishFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PublishFilter::All => { "All" }
            PublishFilter::Subscribed => { "Subscribed" }
            PublishFilter::Unsolicited => { "Unsolicited" }
            PublishFilter::Remaining => { "Remaining" }
        };

        write!(f, "{}", name)
    }
}

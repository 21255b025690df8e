/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
A module containing the core crate error enumeration, context structures, and conversion
definitions.

Every error remembers the source location it was constructed at.  Errors that are produced by
the asynchronous client and then surfaced through a blocking call additionally record the
location of that blocking call, so that a failure discovered on a background thread still
points back at the code that was waiting on it.
 */

use crate::mqtt::{SubackPacket, UnsubackPacket};

use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

type ErrorSource = Arc<dyn Error + Send + Sync + 'static>;

/// Source locations associated with an error value
#[derive(Clone, Copy, Debug)]
pub struct ErrorSite {
    origin: &'static Location<'static>,
    call_site: Option<&'static Location<'static>>,
}

impl ErrorSite {

    #[track_caller]
    fn here() -> Self {
        ErrorSite {
            origin: Location::caller(),
            call_site: None,
        }
    }
}

/// Additional details about an InvalidArgument error variant
#[derive(Clone, Debug)]
pub struct InvalidArgumentContext {
    site: ErrorSite,
    source: ErrorSource
}

/// Additional details about a SubackFailure error variant
#[derive(Clone, Debug)]
pub struct SubackFailureContext {
    site: ErrorSite,

    /// the complete acknowledgement, including the per-subscription reason codes
    pub suback: SubackPacket,
}

/// Additional details about an UnsubackFailure error variant
#[derive(Clone, Debug)]
pub struct UnsubackFailureContext {
    site: ErrorSite,

    /// the complete acknowledgement, including the per-topic-filter reason codes
    pub unsuback: UnsubackPacket,
}

/// Additional details about a PublishFailure error variant
#[derive(Clone, Debug)]
pub struct PublishFailureContext {
    site: ErrorSite,
    source: ErrorSource
}

/// Additional details about a ProtocolError error variant
#[derive(Clone, Debug)]
pub struct ProtocolErrorContext {
    site: ErrorSite,
    source: ErrorSource
}

/// Additional details about a Cancelled error variant
#[derive(Clone, Debug)]
pub struct CancelledContext {
    site: ErrorSite,
}

/// Additional details about a WaitInterrupted error variant
#[derive(Clone, Debug)]
pub struct WaitInterruptedContext {
    site: ErrorSite,
}

/// Additional details about an OperationChannelFailure error variant
#[derive(Clone, Debug)]
pub struct OperationChannelFailureContext {
    site: ErrorSite,
    source: ErrorSource
}

/// Additional details about a ConnectionEstablishmentFailure error variant
#[derive(Clone, Debug)]
pub struct ConnectionEstablishmentFailureContext {
    site: ErrorSite,
    source: ErrorSource
}

/// Additional details about a ConnectionClosed error variant
#[derive(Clone, Debug)]
pub struct ConnectionClosedContext {
    site: ErrorSite,
    source: ErrorSource
}

/// Additional details about an AckTimeout error variant
#[derive(Clone, Debug)]
pub struct AckTimeoutContext {
    site: ErrorSite,
}

/// Additional details about a ClientClosed error variant
#[derive(Clone, Debug)]
pub struct ClientClosedContext {
    site: ErrorSite,
}

/// Additional details about an InternalStateError error variant
#[derive(Clone, Debug)]
pub struct InternalStateErrorContext {
    site: ErrorSite,
    source: ErrorSource
}

/// Additional details about an OtherError error variant
#[derive(Clone, Debug)]
pub struct OtherErrorContext {
    site: ErrorSite,
    source: ErrorSource
}

/// Basic error type for the entire gneiss-mqtt-blocking crate.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum GneissError {

    /// A blocking operation was invoked with an argument it cannot accept.  Always raised
    /// before any work is handed to the asynchronous client.
    InvalidArgument(InvalidArgumentContext),

    /// A Suback was received but at least one of its reason codes is an error code.  The
    /// context holds the full packet so that per-subscription results can be inspected.
    SubackFailure(SubackFailureContext),

    /// An Unsuback was received but at least one of its reason codes is an error code.  The
    /// context holds the full packet so that per-topic-filter results can be inspected.
    UnsubackFailure(UnsubackFailureContext),

    /// The asynchronous client attached a failure to a publish outcome that is not itself a
    /// crate error.  The source contains the original failure.
    PublishFailure(PublishFailureContext),

    /// Generic error emitted when a collaborator violates the protocol in a way that cannot be
    /// safely ignored or recovered from.  The publish stream ending is reported this way.
    ProtocolError(ProtocolErrorContext),

    /// Error applied to every receive attempt, pending or future, on a publish queue that
    /// has been closed.
    Cancelled(CancelledContext),

    /// A blocking wait ended without any outcome having been determined.
    WaitInterrupted(WaitInterruptedContext),

    /// Failure encountered while sending/receiving on an MQTT operation-related channel
    OperationChannelFailure(OperationChannelFailureContext),

    /// Error emitted by the client when a connection attempt fails.  Failure is defined as
    /// "the attempt is finished for any reason prior to receipt of a successful Connack packet."
    ConnectionEstablishmentFailure(ConnectionEstablishmentFailureContext),

    /// Error emitted when a successfully established connection subsequently gets closed for
    /// some reason.
    ConnectionClosed(ConnectionClosedContext),

    /// Error applied to user-submitted operations that indicates the operation failed because
    /// we did not receive an Ack packet within the operation's timeout interval.
    AckTimeout(AckTimeoutContext),

    /// Error applied to all unfinished client operations when the client is closed by the user.
    ClientClosed(ClientClosedContext),

    /// Error emitted by the client when something happens that should never happen.  Always indicates
    /// a bug in the client.
    InternalStateError(InternalStateErrorContext),

    /// Error to be used when no other error variant is appropriate.
    OtherError(OtherErrorContext),
}

impl GneissError {

    #[track_caller]
    pub(crate) fn new_invalid_argument(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        GneissError::InvalidArgument(
            InvalidArgumentContext {
                site: ErrorSite::here(),
                source: Arc::from(source.into())
            }
        )
    }

    #[track_caller]
    pub(crate) fn new_suback_failure(suback: SubackPacket) -> Self {
        GneissError::SubackFailure(
            SubackFailureContext {
                site: ErrorSite::here(),
                suback
            }
        )
    }

    #[track_caller]
    pub(crate) fn new_unsuback_failure(unsuback: UnsubackPacket) -> Self {
        GneissError::UnsubackFailure(
            UnsubackFailureContext {
                site: ErrorSite::here(),
                unsuback
            }
        )
    }

    #[track_caller]
    pub(crate) fn new_publish_failure(source: ErrorSource) -> Self {
        GneissError::PublishFailure(
            PublishFailureContext {
                site: ErrorSite::here(),
                source
            }
        )
    }

    /// Constructs a new ProtocolError variant.  Used by asynchronous client implementations
    /// when the broker or a stream misbehaves.
    #[track_caller]
    pub fn new_protocol_error(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        GneissError::ProtocolError(
            ProtocolErrorContext {
                site: ErrorSite::here(),
                source: Arc::from(source.into())
            }
        )
    }

    #[track_caller]
    pub(crate) fn new_cancelled() -> Self {
        GneissError::Cancelled(
            CancelledContext {
                site: ErrorSite::here(),
            }
        )
    }

    #[track_caller]
    pub(crate) fn new_wait_interrupted() -> Self {
        GneissError::WaitInterrupted(
            WaitInterruptedContext {
                site: ErrorSite::here(),
            }
        )
    }

    /// Constructs a new OperationChannelFailure variant from the underlying channel error
    #[track_caller]
    pub fn new_operation_channel_failure(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        GneissError::OperationChannelFailure(
            OperationChannelFailureContext {
                site: ErrorSite::here(),
                source: Arc::from(source.into())
            }
        )
    }

    /// Constructs a new ConnectionEstablishmentFailure variant
    #[track_caller]
    pub fn new_connection_establishment_failure(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        GneissError::ConnectionEstablishmentFailure(
            ConnectionEstablishmentFailureContext {
                site: ErrorSite::here(),
                source: Arc::from(source.into())
            }
        )
    }

    /// Constructs a new ConnectionClosed variant
    #[track_caller]
    pub fn new_connection_closed(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        GneissError::ConnectionClosed(
            ConnectionClosedContext {
                site: ErrorSite::here(),
                source: Arc::from(source.into())
            }
        )
    }

    /// Constructs a new AckTimeout variant
    #[track_caller]
    pub fn new_ack_timeout() -> Self {
        GneissError::AckTimeout(
            AckTimeoutContext {
                site: ErrorSite::here(),
            }
        )
    }

    /// Constructs a new ClientClosed variant
    #[track_caller]
    pub fn new_client_closed() -> Self {
        GneissError::ClientClosed(
            ClientClosedContext {
                site: ErrorSite::here(),
            }
        )
    }

    /// Constructs a new InternalStateError variant
    #[track_caller]
    pub fn new_internal_state_error(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        GneissError::InternalStateError(
            InternalStateErrorContext {
                site: ErrorSite::here(),
                source: Arc::from(source.into())
            }
        )
    }

    /// Constructs a new OtherError variant from an existing error.  Use this to wrap errors that
    /// do not fall into any appropriate existing category.
    #[track_caller]
    pub fn new_other_error(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        GneissError::OtherError(
            OtherErrorContext {
                site: ErrorSite::here(),
                source: Arc::from(source.into())
            }
        )
    }

    fn site(&self) -> &ErrorSite {
        match self {
            GneissError::InvalidArgument(context) => { &context.site }
            GneissError::SubackFailure(context) => { &context.site }
            GneissError::UnsubackFailure(context) => { &context.site }
            GneissError::PublishFailure(context) => { &context.site }
            GneissError::ProtocolError(context) => { &context.site }
            GneissError::Cancelled(context) => { &context.site }
            GneissError::WaitInterrupted(context) => { &context.site }
            GneissError::OperationChannelFailure(context) => { &context.site }
            GneissError::ConnectionEstablishmentFailure(context) => { &context.site }
            GneissError::ConnectionClosed(context) => { &context.site }
            GneissError::AckTimeout(context) => { &context.site }
            GneissError::ClientClosed(context) => { &context.site }
            GneissError::InternalStateError(context) => { &context.site }
            GneissError::OtherError(context) => { &context.site }
        }
    }

    fn site_mut(&mut self) -> &mut ErrorSite {
        match self {
            GneissError::InvalidArgument(context) => { &mut context.site }
            GneissError::SubackFailure(context) => { &mut context.site }
            GneissError::UnsubackFailure(context) => { &mut context.site }
            GneissError::PublishFailure(context) => { &mut context.site }
            GneissError::ProtocolError(context) => { &mut context.site }
            GneissError::Cancelled(context) => { &mut context.site }
            GneissError::WaitInterrupted(context) => { &mut context.site }
            GneissError::OperationChannelFailure(context) => { &mut context.site }
            GneissError::ConnectionEstablishmentFailure(context) => { &mut context.site }
            GneissError::ConnectionClosed(context) => { &mut context.site }
            GneissError::AckTimeout(context) => { &mut context.site }
            GneissError::ClientClosed(context) => { &mut context.site }
            GneissError::InternalStateError(context) => { &mut context.site }
            GneissError::OtherError(context) => { &mut context.site }
        }
    }

    /// Source location at which this error was constructed.  For failures reported by the
    /// asynchronous client this is somewhere on the client's own threads.
    pub fn origin(&self) -> &'static Location<'static> {
        self.site().origin
    }

    /// Source location of the blocking call that surfaced this error, if it crossed over from
    /// the asynchronous client to a waiting caller.
    pub fn call_site(&self) -> Option<&'static Location<'static>> {
        self.site().call_site
    }

    /// Re-anchors the error to a blocking call.  Variant, message, and source chain are kept
    /// as they are; only the call site changes.
    pub(crate) fn anchored_at(mut self, call_site: &'static Location<'static>) -> Self {
        self.site_mut().call_site = Some(call_site);
        self
    }
}

impl Error for GneissError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GneissError::InvalidArgument(context) => {
                Some(context.source.as_ref())
            }
            GneissError::PublishFailure(context) => {
                Some(context.source.as_ref())
            }
            GneissError::ProtocolError(context) => {
                Some(context.source.as_ref())
            }
            GneissError::OperationChannelFailure(context) => {
                Some(context.source.as_ref())
            }
            GneissError::ConnectionEstablishmentFailure(context) => {
                Some(context.source.as_ref())
            }
            GneissError::ConnectionClosed(context) => {
                Some(context.source.as_ref())
            }
            GneissError::InternalStateError(context) => {
                Some(context.source.as_ref())
            }
            GneissError::OtherError(context) => {
                Some(context.source.as_ref())
            }
            _ => { None }
        }
    }
}

impl fmt::Display for GneissError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GneissError::InvalidArgument(_) => {
                write!(f, "invalid argument passed to a blocking operation; source contains further details")
            }
            GneissError::SubackFailure(_) | GneissError::UnsubackFailure(_) => {
                write!(f, "acknowledgement contains at least one error code")
            }
            GneissError::PublishFailure(_) => {
                write!(f, "publish failed; source contains further details")
            }
            GneissError::ProtocolError(_) => {
                write!(f, "behavior disallowed by the mqtt protocol; source contains further details")
            }
            GneissError::Cancelled(_) => {
                write!(f, "the publish queue was closed")
            }
            GneissError::WaitInterrupted(_) => {
                write!(f, "blocking wait was interrupted before a result was available")
            }
            GneissError::OperationChannelFailure(_) => {
                write!(f, "failure encountered while sending/receiving on an MQTT operation-related channel")
            }
            GneissError::ConnectionEstablishmentFailure(_) => {
                write!(f, "failed to establish an MQTT connection to the broker")
            }
            GneissError::ConnectionClosed(_) => {
                write!(f, "client connection was closed; source contains further details")
            }
            GneissError::AckTimeout(_) => {
                write!(f, "the operation's timeout triggered prior to receiving an ack from the broker")
            }
            GneissError::ClientClosed(_) => {
                write!(f, "the operation was incomplete prior to the client being closed")
            }
            GneissError::InternalStateError(_) => {
                write!(f, "client reached an invalid internal state; almost certainly a client bug")
            }
            GneissError::OtherError(_) => {
                write!(f, "fallback error type; source contains further details")
            }
        }
    }
}

impl From<futures::channel::oneshot::Canceled> for GneissError {
    #[track_caller]
    fn from(err: futures::channel::oneshot::Canceled) -> Self {
        GneissError::new_operation_channel_failure(err)
    }
}

/// Crate-wide result type for functions that can fail
pub type GneissResult<T> = Result<T, GneissError>;

/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Blocking calls over an asynchronous MQTT5 client.

The asynchronous client (see [`client::asynchronous::AsyncClient`]) performs all protocol work off
the calling thread.  [`BlockingClient`] wraps it so that connect, subscribe, publish, unsubscribe,
reauth, and disconnect become ordinary blocking calls, and so that incoming publishes can be
consumed with blocking, timed, or non-blocking receive calls on a [`BlockingPublishes`] handle.

Acknowledgements that contain error reason codes are reported as errors.  Errors that originate on
the asynchronous client's threads are anchored to the blocking call that surfaced them.
 */

pub mod client;
pub mod config;
pub mod error;
mod logging;
pub mod mqtt;
mod validate;

#[cfg(test)]
mod testing;

/* Re-export the types most callers need at the root level */
pub use client::asynchronous::{AsyncClient, AsyncClientHandle};
pub use client::synchronous::{BlockingClient, BlockingPublishes};
pub use client::{PublishFilter, PublishOutcome, PublishResponse, Qos2Response};
pub use error::{GneissError, GneissResult};

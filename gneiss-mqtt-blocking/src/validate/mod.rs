/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Validation of the results the asynchronous client hands back to blocking callers.

Acknowledgements that carry error reason codes and publish outcomes that carry failures are
turned into errors here so that a successful blocking call always means a successful operation.
 */

use crate::client::PublishOutcome;
use crate::error::{GneissError, GneissResult};
use crate::mqtt::*;

use log::*;

fn first_error_code<T: ReasonCode>(reason_codes: &[T]) -> Option<(usize, &T)> {
    reason_codes.iter().enumerate().find(|(_, reason_code)| reason_code.is_error())
}

pub(crate) fn validate_suback(suback: SubackPacket) -> GneissResult<SubackPacket> {
    if let Some((index, reason_code)) = first_error_code(&suback.reason_codes) {
        debug!("Suback validation - subscription {} failed with {}", index, reason_code);
        return Err(GneissError::new_suback_failure(suback));
    }

    Ok(suback)
}

pub(crate) fn validate_unsuback(unsuback: UnsubackPacket) -> GneissResult<UnsubackPacket> {
    if let Some((index, reason_code)) = first_error_code(&unsuback.reason_codes) {
        debug!("Unsuback validation - topic filter {} failed with {}", index, reason_code);
        return Err(GneissError::new_unsuback_failure(unsuback));
    }

    Ok(unsuback)
}

pub(crate) fn validate_publish_outcome(outcome: PublishOutcome) -> GneissResult<PublishOutcome> {
    if let Some(error) = &outcome.error {
        debug!("Publish outcome validation - publish to \"{}\" failed: {}", outcome.publish.topic, error);
        if let Some(gneiss_error) = error.as_ref().downcast_ref::<GneissError>() {
            return Err(gneiss_error.clone());
        }

        return Err(GneissError::new_publish_failure(error.clone()));
    }

    Ok(outcome)
}

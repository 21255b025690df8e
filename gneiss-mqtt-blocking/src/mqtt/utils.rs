/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing miscellaneous conversion helpers related to the MQTT specification.
 */

use crate::mqtt::*;

use std::fmt;

macro_rules! impl_reason_code {
    ($reason_code_type: ident) => {
        impl $crate::mqtt::ReasonCode for $reason_code_type {
            fn code(&self) -> u8 {
                *self as u8
            }
        }

        impl $reason_code_type {

            /// Returns whether or not the reason code denotes success
            pub fn is_success(&self) -> bool {
                !$crate::mqtt::ReasonCode::is_error(self)
            }
        }

        impl std::fmt::Display for $reason_code_type {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{:?} ({})", self, *self as u8)
            }
        }
    };
}

pub(crate) use impl_reason_code;

pub(crate) fn quality_of_service_to_str(qos: QualityOfService) -> &'static str {
    match qos {
        QualityOfService::AtMostOnce => { "AtMostOnce (0)" }
        QualityOfService::AtLeastOnce => { "AtLeastOnce (1)" }
        QualityOfService::ExactlyOnce => { "ExactlyOnce (2)" }
    }
}

pub(crate) fn payload_format_indicator_to_str(format: PayloadFormatIndicator) -> &'static str {
    match format {
        PayloadFormatIndicator::Bytes => { "Bytes (0)" }
        PayloadFormatIndicator::Utf8 => { "Utf8 (1)" }
    }
}

pub(crate) fn retain_handling_type_to_str(retain_handling_type: RetainHandlingType) -> &'static str {
    match retain_handling_type {
        RetainHandlingType::SendOnSubscribe => { "SendOnSubscribe (0)" }
        RetainHandlingType::SendOnSubscribeIfNew => { "SendOnSubscribeIfNew (1)" }
        RetainHandlingType::DontSend => { "DontSend (2)" }
    }
}

impl fmt::Display for QualityOfService {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", quality_of_service_to_str(*self))
    }
}

impl fmt::Display for PayloadFormatIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", payload_format_indicator_to_str(*self))
    }
}

impl fmt::Display for RetainHandlingType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", retain_handling_type_to_str(*self))
    }
}

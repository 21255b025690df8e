/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::mqtt::*;
use std::fmt;
use std::fmt::Write;

impl fmt::Display for UserProperty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}) ", self.name, self.value)
    }
}

pub(crate) fn create_user_properties_log_string(properties: &Vec<UserProperty>) -> String {
    let mut val : String = "[ ".to_string();
    for property in properties {
        write!(&mut val, " (\"{}\",\"{}\")", property.name, property.value).ok();
    }
    write!(&mut val, " ]").ok();
    val
}

macro_rules! log_primitive_value {
    ($integral_value: expr, $formatter: expr, $log_field: expr) => {
        write!($formatter, " {}:{}", $log_field, $integral_value)?;
    };
}


macro_rules! log_optional_primitive_value {
    ($optional_integral_value: expr, $formatter: expr, $log_field: expr, $value: ident) => {
        if let Some($value) = &$optional_integral_value {
            write!($formatter, " {}:{}", $log_field, $value)?;
        }
    };
}


macro_rules! log_enum {
    ($enum_value: expr, $formatter: expr, $log_field: expr, $converter: ty) => {
        write!($formatter, " {}:{}", $log_field, <$converter>::to_string(&$enum_value))?;
    };
}


macro_rules! log_optional_enum {
    ($optional_enum_value: expr, $formatter: expr, $log_field: expr, $value:ident, $converter: ty) => {
        if let Some($value) = &$optional_enum_value {
            write!($formatter, " {}:{}", $log_field, <$converter>::to_string(&*$value))?;
        }
    };
}


macro_rules! log_string {
    ($value: expr, $formatter: expr, $log_field: expr) => {
        write!($formatter, " {}:\"{}\"", $log_field, $value)?;
    };
}


macro_rules! log_optional_string {
    ($optional_string: expr, $formatter: expr, $log_field: expr, $value:ident) => {
        if let Some($value) = &$optional_string {
            write!($formatter, " {}:\"{}\"", $log_field, $value)?;
        }
    };
}


macro_rules! log_optional_string_sensitive {
    ($optional_string: expr, $formatter: expr, $log_field: expr) => {
        if $optional_string.is_some() {
            write!($formatter, " {}:<...redacted>", $log_field)?;
        }
    };
}


macro_rules! log_optional_binary_data {
    ($optional_data: expr, $formatter: expr, $log_field: expr, $value:ident) => {
        if let Some($value) = &$optional_data {
            write!($formatter, " {}:<{} Bytes>",  $log_field, $value.len())?;
        }
    };
}


macro_rules! log_user_properties {
    ($user_properties: expr, $formatter: expr, $log_field: expr, $value:ident) => {
        if let Some($value) = &$user_properties {
            write!($formatter, " {}:{}", $log_field, create_user_properties_log_string($value))?;
        }
    };
}


macro_rules! define_ack_packet_display_trait {
    ($packet_type: ident, $packet_name: expr, $reason_code_type: ident) => {
        impl fmt::Display for $packet_type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{} {{", $packet_name)?;
                log_primitive_value!(self.packet_id, f, "packet_id");
                log_enum!(self.reason_code, f, "reason_code", $reason_code_type);
                log_optional_string!(self.reason_string, f, "reason_string", value);
                log_user_properties!(self.user_properties, f, "user_properties", value);
                write!(f, " }}")
            }
        }
    };
}

define_ack_packet_display_trait!(PubackPacket, "PubackPacket", PubackReasonCode);
define_ack_packet_display_trait!(PubrecPacket, "PubrecPacket", PubrecReasonCode);
define_ack_packet_display_trait!(PubcompPacket, "PubcompPacket", PubcompReasonCode);

macro_rules! define_multi_ack_packet_display_trait {
    ($packet_type: ident, $packet_name: expr) => {
        impl fmt::Display for $packet_type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{} {{", $packet_name)?;
                log_primitive_value!(self.packet_id, f, "packet_id");
                log_optional_string!(self.reason_string, f, "reason_string", value);
                log_user_properties!(self.user_properties, f, "user_properties", value);
                write!(f, " reason_codes: [")?;
                for (i, reason_code) in self.reason_codes.iter().enumerate() {
                    write!(f, " {}:{}", i, reason_code)?;
                }
                write!(f, " ]")?;
                write!(f, " }}")
            }
        }
    };
}

define_multi_ack_packet_display_trait!(SubackPacket, "SubackPacket");
define_multi_ack_packet_display_trait!(UnsubackPacket, "UnsubackPacket");

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        log_string!(self.topic_filter, f, "topic_filter");
        log_enum!(self.qos, f, "qos", QualityOfService);
        log_primitive_value!(self.no_local, f, "no_local");
        log_primitive_value!(self.retain_as_published, f, "retain_as_published");
        log_enum!(self.retain_handling_type, f, "retain_handling_type", RetainHandlingType);
        write!(f, " )")
    }
}

impl fmt::Display for ConnectPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConnectPacket {{")?;
        log_primitive_value!(self.keep_alive_interval_seconds, f, "keep_alive_interval_seconds");
        log_primitive_value!(self.clean_start, f, "clean_start");
        log_optional_string!(self.client_id, f, "client_id", value);
        log_optional_string_sensitive!(self.username, f, "username");
        log_optional_string_sensitive!(self.password, f, "password");
        log_optional_primitive_value!(self.session_expiry_interval_seconds, f, "session_expiry_interval_seconds", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " }}")
    }
}

impl fmt::Display for ConnackPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConnackPacket {{")?;
        log_primitive_value!(self.session_present, f, "session_present");
        log_enum!(self.reason_code, f, "reason_code", ConnectReasonCode);
        log_optional_primitive_value!(self.session_expiry_interval, f, "session_expiry_interval", value);
        log_optional_string!(self.assigned_client_identifier, f, "assigned_client_identifier", value);
        log_optional_primitive_value!(self.server_keep_alive, f, "server_keep_alive", value);
        log_optional_string!(self.reason_string, f, "reason_string", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " }}")
    }
}

impl fmt::Display for PublishPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublishPacket {{")?;
        log_string!(self.topic, f, "topic");
        log_enum!(self.qos, f, "qos", QualityOfService);
        log_primitive_value!(self.duplicate, f, "duplicate");
        log_primitive_value!(self.retain, f, "retain");
        log_optional_binary_data!(self.payload, f, "payload", value);
        log_optional_enum!(self.payload_format, f, "payload_format", value, PayloadFormatIndicator);
        log_optional_primitive_value!(self.message_expiry_interval_seconds, f, "message_expiry_interval_seconds", value);
        log_optional_string!(self.response_topic, f, "response_topic", value);
        log_optional_binary_data!(self.correlation_data, f, "correlation_data", value);
        if let Some(identifiers) = &self.subscription_identifiers {
            write!(f, " subscription_identifiers:{:?}", identifiers)?;
        }
        log_optional_string!(self.content_type, f, "content_type", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " }}")
    }
}

impl fmt::Display for SubscribePacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SubscribePacket {{")?;
        write!(f, " subscriptions: [")?;
        for (i, subscription) in self.subscriptions.iter().enumerate() {
            write!(f, " {}:{}", i, subscription)?;
        }
        write!(f, " ]")?;
        log_optional_primitive_value!(self.subscription_identifier, f, "subscription_identifier", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " }}")
    }
}

impl fmt::Display for UnsubscribePacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UnsubscribePacket {{")?;
        write!(f, " topic_filters: [")?;
        for (i, topic_filter) in self.topic_filters.iter().enumerate() {
            write!(f, " {}:\"{}\"", i, topic_filter)?;
        }
        write!(f, " ]")?;
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " }}")
    }
}

impl fmt::Display for DisconnectPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DisconnectPacket {{")?;
        log_enum!(self.reason_code, f, "reason_code", DisconnectReasonCode);
        log_optional_primitive_value!(self.session_expiry_interval_seconds, f, "session_expiry_interval_seconds", value);
        log_optional_string!(self.reason_string, f, "reason_string", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        log_optional_string!(self.server_reference, f, "server_reference", value);
        write!(f, " }}")
    }
}

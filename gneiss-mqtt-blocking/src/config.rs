/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing types for configuring an MQTT client.
 */

use crate::mqtt::*;

pub(crate) const DEFAULT_KEEP_ALIVE_SECONDS : u16 = 1200;

/// Configuration options that will determine packet field values for the CONNECT packet sent out
/// when a connect request does not supply its own packet.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConnectOptions {

    pub(crate) keep_alive_interval_seconds: Option<u16>,

    pub(crate) clean_start: bool,

    pub(crate) client_id: Option<String>,

    pub(crate) username: Option<String>,

    pub(crate) password: Option<Vec<u8>>,

    pub(crate) session_expiry_interval_seconds: Option<u32>,

    pub(crate) user_properties: Option<Vec<UserProperty>>,
}

impl ConnectOptions {

    /// Creates a new builder object for ConnectOptions
    pub fn builder() -> ConnectOptionsBuilder {
        ConnectOptionsBuilder::new()
    }

    pub(crate) fn to_connect_packet(&self) -> ConnectPacket {
        ConnectPacket {
            keep_alive_interval_seconds: self.keep_alive_interval_seconds.unwrap_or(0),
            clean_start: self.clean_start,
            client_id: self.client_id.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            session_expiry_interval_seconds: self.session_expiry_interval_seconds,
            user_properties: self.user_properties.clone(),
        }
    }

    /// Returns the MQTT client id currently configured in these options
    pub fn client_id(&self) -> &Option<String> { &self.client_id }

    /// Returns the keep alive interval, in seconds, currently configured in these options
    pub fn keep_alive_interval_seconds(&self) -> Option<u16> { self.keep_alive_interval_seconds }
}

impl Default for ConnectOptions {

    /// Creates a ConnectOptions object with default values.
    ///
    /// In particular, MQTT keep alive is set to a "reasonable" default value rather than
    /// set to zero, which means don't use keep alive.  It is strongly recommended to never set
    /// keep alive to zero.
    fn default() -> Self {
        ConnectOptions {
            keep_alive_interval_seconds: Some(DEFAULT_KEEP_ALIVE_SECONDS),
            clean_start: true,
            client_id: None,
            username: None,
            password: None,
            session_expiry_interval_seconds: None,
            user_properties: None,
        }
    }
}

/// A builder for connection-related options on the client.
#[derive(Debug, Default)]
pub struct ConnectOptionsBuilder {
    options: ConnectOptions
}

impl ConnectOptionsBuilder {

    /// Creates a new builder object for ConnectOptions
    pub fn new() -> Self {
        ConnectOptionsBuilder {
            ..Default::default()
        }
    }

    /// Creates a new builder object for ConnectOptions using an existing ConnectOptions
    /// value as a starting point.
    pub fn new_from_existing(options: ConnectOptions) -> Self {
        ConnectOptionsBuilder {
            options
        }
    }

    /// Sets the maximum time interval, in seconds, that is permitted to elapse between the point at which the client
    /// finishes transmitting one MQTT packet and the point it starts sending the next.
    ///
    /// See [MQTT5 Keep Alive](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901045)
    ///
    /// If the final negotiated value is 0, then that means no keep alive will be used.
    pub fn with_keep_alive_interval_seconds(&mut self, keep_alive: Option<u16>) -> &mut Self {
        self.options.keep_alive_interval_seconds = keep_alive;
        self
    }

    /// Sets whether or not the server should discard any existing session state for this client id.
    pub fn with_clean_start(&mut self, clean_start: bool) -> &mut Self {
        self.options.clean_start = clean_start;
        self
    }

    /// Sets a unique string identifying the client to the server.  Used to restore session state between connections.
    ///
    /// If left empty, the broker will auto-assign a unique client id.
    pub fn with_client_id(&mut self, client_id: &str) -> &mut Self {
        self.options.client_id = Some(client_id.to_string());
        self
    }

    /// Sets a string value that the server may use for client authentication and authorization.
    pub fn with_username(&mut self, username: &str) -> &mut Self {
        self.options.username = Some(username.to_string());
        self
    }

    /// Sets opaque binary data that the server may use for client authentication and authorization.
    pub fn with_password(&mut self, password: &[u8]) -> &mut Self {
        self.options.password = Some(password.to_vec());
        self
    }

    /// Sets the time interval, in seconds, that the client requests the server to persist this connection's MQTT
    /// session state for.
    pub fn with_session_expiry_interval_seconds(&mut self, session_expiry_interval_seconds: u32) -> &mut Self {
        self.options.session_expiry_interval_seconds = Some(session_expiry_interval_seconds);
        self
    }

    /// Sets the set of MQTT5 user properties to include with every CONNECT packet built from these options.
    pub fn with_user_properties(&mut self, user_properties: Vec<UserProperty>) -> &mut Self {
        self.options.user_properties = Some(user_properties);
        self
    }

    /// Builds a new ConnectOptions object for client construction
    pub fn build(&self) -> ConnectOptions {
        self.options.clone()
    }
}

/// Read-only configuration of an MQTT client: where it connects and what it sends when it does.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClientConfig {
    pub(crate) endpoint: String,
    pub(crate) port: u16,
    pub(crate) connect_options: ConnectOptions,
}

impl ClientConfig {

    /// Creates a new builder object for ClientConfig
    pub fn builder(endpoint: &str, port: u16) -> ClientConfigBuilder {
        ClientConfigBuilder::new(endpoint, port)
    }

    /// Returns the endpoint (hostname or address) the client connects to
    pub fn endpoint(&self) -> &str { self.endpoint.as_str() }

    /// Returns the port the client connects to
    pub fn port(&self) -> u16 { self.port }

    /// Returns the options used to build a CONNECT packet when a connect request does not
    /// supply one
    pub fn connect_options(&self) -> &ConnectOptions { &self.connect_options }
}

/// A builder for client configuration.
pub struct ClientConfigBuilder {
    config: ClientConfig
}

impl ClientConfigBuilder {

    /// Creates a new builder object for ClientConfig
    pub fn new(endpoint: &str, port: u16) -> Self {
        ClientConfigBuilder {
            config: ClientConfig {
                endpoint: endpoint.to_string(),
                port,
                connect_options: ConnectOptions::default(),
            }
        }
    }

    /// Sets the options used to build a CONNECT packet when a connect request does not supply one
    pub fn with_connect_options(&mut self, connect_options: ConnectOptions) -> &mut Self {
        self.config.connect_options = connect_options;
        self
    }

    /// Builds a new ClientConfig
    pub fn build(&self) -> ClientConfig {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_connect_packet_uses_default_keep_alive() {
        let packet = ConnectOptions::default().to_connect_packet();

        assert_eq!(DEFAULT_KEEP_ALIVE_SECONDS, packet.keep_alive_interval_seconds);
        assert!(packet.clean_start);
        assert_eq!(None, packet.client_id);
    }

    #[test]
    fn connect_packet_reflects_builder_settings() {
        let options = ConnectOptionsBuilder::new()
            .with_keep_alive_interval_seconds(None)
            .with_clean_start(false)
            .with_client_id("blocking-client")
            .with_username("user")
            .with_password("secret".as_bytes())
            .with_session_expiry_interval_seconds(3600)
            .build();

        let packet = options.to_connect_packet();
        assert_eq!(0, packet.keep_alive_interval_seconds);
        assert!(!packet.clean_start);
        assert_eq!(Some("blocking-client".to_string()), packet.client_id);
        assert_eq!(Some("user".to_string()), packet.username);
        assert_eq!(Some("secret".as_bytes().to_vec()), packet.password);
        assert_eq!(Some(3600), packet.session_expiry_interval_seconds);
    }

    #[test]
    fn client_config_builder() {
        let connect_options = ConnectOptionsBuilder::new().with_client_id("abc").build();
        let config = ClientConfigBuilder::new("localhost", 1883)
            .with_connect_options(connect_options.clone())
            .build();

        assert_eq!("localhost", config.endpoint());
        assert_eq!(1883, config.port());
        assert_eq!(&connect_options, config.connect_options());
    }
}

//! Configuration types for the Econt API client.
//!
//! This module provides the configuration types used to construct an
//! [`EcontClient`](crate::EcontClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`EcontConfig`]: The configuration struct holding credentials and settings
//! - [`EcontConfigBuilder`]: A builder for constructing [`EcontConfig`] instances
//! - [`Username`] and [`Password`]: Validated credential newtypes
//! - [`Credentials`]: The combined `user:pass` secret
//! - [`Environment`]: Live or demo endpoint selection
//!
//! # Example
//!
//! ```rust
//! use econt_api::{EcontConfig, Environment, Password, Username};
//!
//! let config = EcontConfig::builder()
//!     .username(Username::new("my-user").unwrap())
//!     .password(Password::new("my-password").unwrap())
//!     .environment(Environment::Demo)
//!     .build()
//!     .unwrap();
//! assert!(config.environment().is_demo());
//! ```

mod environment;
mod newtypes;

pub use environment::{Environment, DEMO_URL, LIVE_URL};
pub use newtypes::{Credentials, Password, Username};

use chrono::FixedOffset;

use crate::error::ConfigError;
use crate::utils::datetime::Timezone;

/// Username of the public demo account.
pub const DEMO_USERNAME: &str = "iasp-dev";

/// Password of the public demo account.
pub const DEMO_PASSWORD: &str = "1Asp-dev";

/// Configuration for the Econt API client.
///
/// # Thread Safety
///
/// `EcontConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use econt_api::EcontConfig;
///
/// let config = EcontConfig::demo();
/// assert_eq!(config.credentials().username().as_ref(), "iasp-dev");
/// assert!(config.environment().is_demo());
/// ```
#[derive(Clone, Debug)]
pub struct EcontConfig {
    credentials: Credentials,
    environment: Environment,
    user_agent_prefix: Option<String>,
    timezone: Timezone,
}

impl EcontConfig {
    /// Creates a new builder for constructing an `EcontConfig`.
    #[must_use]
    pub fn builder() -> EcontConfigBuilder {
        EcontConfigBuilder::new()
    }

    /// Returns a configuration for the public demo account.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            credentials: Credentials::new(
                Username::new_unchecked(DEMO_USERNAME),
                Password::new_unchecked(DEMO_PASSWORD),
            ),
            environment: Environment::Demo,
            user_agent_prefix: None,
            timezone: Timezone::default(),
        }
    }

    /// Returns the credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the zone used to interpret dates without an offset.
    #[must_use]
    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }
}

// Verify EcontConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EcontConfig>();
};

/// Builder for constructing [`EcontConfig`] instances.
///
/// Required fields are `username` and `password`.
///
/// # Defaults
///
/// - `environment`: [`Environment::Live`]
/// - `user_agent_prefix`: `None`
/// - `timezone`: `Europe/Sofia`
#[derive(Debug, Default)]
pub struct EcontConfigBuilder {
    username: Option<Username>,
    password: Option<Password>,
    environment: Option<Environment>,
    user_agent_prefix: Option<String>,
    timezone: Option<Timezone>,
}

impl EcontConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the username (required).
    #[must_use]
    pub fn username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    /// Sets the password (required).
    #[must_use]
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Sets the environment.
    #[must_use]
    pub const fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Shorthand for selecting the demo or live environment.
    #[must_use]
    pub const fn demo(self, demo: bool) -> Self {
        self.environment(Environment::from_demo(demo))
    }

    /// Sets a prefix prepended to the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the zone used to interpret dates without an offset.
    #[must_use]
    pub fn timezone(mut self, zone: impl Into<Timezone>) -> Self {
        self.timezone = Some(zone.into());
        self
    }

    /// Reads dates without an offset at a constant `offset`, ignoring
    /// daylight saving time.
    #[must_use]
    pub const fn fixed_offset(mut self, offset: FixedOffset) -> Self {
        self.timezone = Some(Timezone::Fixed(offset));
        self
    }

    /// Builds the [`EcontConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `username` or
    /// `password` are not set.
    pub fn build(self) -> Result<EcontConfig, ConfigError> {
        let username = self
            .username
            .ok_or(ConfigError::MissingRequiredField { field: "username" })?;
        let password = self
            .password
            .ok_or(ConfigError::MissingRequiredField { field: "password" })?;

        Ok(EcontConfig {
            credentials: Credentials::new(username, password),
            environment: self.environment.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            timezone: self.timezone.unwrap_or_default(),
        })
    }
}

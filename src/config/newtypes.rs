//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around credential strings that
//! validate their contents on construction.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// A validated Econt account username.
///
/// # Example
///
/// ```rust
/// use econt_api::Username;
///
/// let username = Username::new("iasp-dev").unwrap();
/// assert_eq!(username.as_ref(), "iasp-dev");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Creates a new validated username.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUsername`] if the username is empty.
    pub fn new(username: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        if username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(Self(username))
    }

    pub(crate) fn new_unchecked(username: &'static str) -> Self {
        Self(username.to_string())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Username {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated Econt account password.
///
/// The `Debug` implementation masks the value, displaying only
/// `Password(*****)`.
///
/// # Example
///
/// ```rust
/// use econt_api::Password;
///
/// let password = Password::new("1Asp-dev").unwrap();
/// assert_eq!(format!("{:?}", password), "Password(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a new validated password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        Ok(Self(password))
    }

    pub(crate) fn new_unchecked(password: &'static str) -> Self {
        Self(password.to_string())
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}

/// Username and password combined into the single `user:pass` secret sent
/// with every request.
///
/// # Example
///
/// ```rust
/// use econt_api::{Credentials, Password, Username};
///
/// let credentials = Credentials::new(
///     Username::new("user").unwrap(),
///     Password::new("pass").unwrap(),
/// );
/// assert_eq!(credentials.authorization_header(), "Basic dXNlcjpwYXNz");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    secret: String,
}

impl Credentials {
    /// Combines a username and password.
    #[must_use]
    pub fn new(username: Username, password: Password) -> Self {
        let secret = format!("{}:{}", username.as_ref(), password.as_ref());
        Self { username, secret }
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Basic {}", STANDARD.encode(self.secret.as_bytes()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"*****")
            .finish()
    }
}

//! Econt API environment definitions.
//!
//! This module provides the [`Environment`] enum selecting one of the two
//! fixed service endpoints.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Base URL of the production service.
pub const LIVE_URL: &str = "https://ee.econt.com/services";

/// Base URL of the demo service.
pub const DEMO_URL: &str = "https://demo.econt.com/ee/services";

/// The Econt environment requests are sent to.
///
/// # Example
///
/// ```rust
/// use econt_api::Environment;
///
/// let environment: Environment = "demo".parse().unwrap();
/// assert_eq!(environment, Environment::Demo);
/// assert_eq!(environment.base_url(), "https://demo.econt.com/ee/services");
/// assert_eq!(format!("{}", Environment::Live), "live");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The production endpoint.
    #[default]
    Live,
    /// The demo endpoint with test data.
    Demo,
}

impl Environment {
    /// Returns the environment for a demo flag.
    #[must_use]
    pub const fn from_demo(demo: bool) -> Self {
        if demo {
            Self::Demo
        } else {
            Self::Live
        }
    }

    /// Returns `true` for [`Environment::Demo`].
    #[must_use]
    pub const fn is_demo(self) -> bool {
        matches!(self, Self::Demo)
    }

    /// Returns the fixed base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Live => LIVE_URL,
            Self::Demo => DEMO_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Demo => f.write_str("demo"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" | "production" => Ok(Self::Live),
            "demo" => Ok(Self::Demo),
            _ => Err(ConfigError::InvalidEnvironment {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_live() {
        assert_eq!(Environment::default(), Environment::Live);
        assert!(!Environment::default().is_demo());
    }

    #[test]
    fn test_base_urls() {
        assert_eq!(Environment::Live.base_url(), "https://ee.econt.com/services");
        assert_eq!(
            Environment::Demo.base_url(),
            "https://demo.econt.com/ee/services"
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("DEMO".parse::<Environment>().unwrap(), Environment::Demo);
        assert_eq!(" Live ".parse::<Environment>().unwrap(), Environment::Live);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let result = "staging".parse::<Environment>();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvironment { name }) if name == "staging"
        ));
    }

    #[test]
    fn test_from_demo_flag() {
        assert_eq!(Environment::from_demo(true), Environment::Demo);
        assert_eq!(Environment::from_demo(false), Environment::Live);
    }
}

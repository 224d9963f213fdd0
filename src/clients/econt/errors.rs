//! Error type of the Econt client façade.
//!
//! # Error Handling
//!
//! - [`EcontError::InvalidResource`]: An unknown resource name was requested
//! - [`EcontError::Http`]: A request failed; the HTTP status is preserved
//! - [`EcontError::Model`]: A response could not be hydrated into models
//! - [`EcontError::InvalidArgument`]: A resource method received unusable input
//! - [`EcontError::NotImplemented`]: The operation is not supported yet
//! - [`EcontError::Config`]: The client configuration is invalid
//!
//! # Example
//!
//! ```rust,ignore
//! use econt_api::{EcontClient, EcontConfig, EcontError};
//!
//! let client = EcontClient::new(EcontConfig::demo())?;
//! match client.nomenclatures()?.get_countries().await {
//!     Ok(countries) => println!("{} countries", countries.len()),
//!     Err(EcontError::Http { status: Some(401), .. }) => println!("Bad credentials"),
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::HttpError;
use crate::error::ConfigError;
use crate::models::ModelError;

/// Error type for [`EcontClient`](crate::EcontClient) and its resources.
///
/// # Example
///
/// ```rust
/// use econt_api::clients::EcontError;
///
/// let error = EcontError::InvalidResource {
///     resource: "parcels".to_string(),
///     available: vec!["profiles", "shipments"],
/// };
/// assert_eq!(
///     error.to_string(),
///     "Tried to make invalid resource [parcels]. Available: profiles, shipments."
/// );
/// assert_eq!(error.code(), Some(422));
/// ```
#[derive(Debug, Error)]
pub enum EcontError {
    /// The resource name is not in the registry.
    #[error("Tried to make invalid resource [{resource}]. Available: {}.", available.join(", "))]
    InvalidResource {
        /// The requested name.
        resource: String,
        /// The registered resource names.
        available: Vec<&'static str>,
    },

    /// A request to the API failed.
    #[error("{source}")]
    Http {
        /// The HTTP status code, if a response was received.
        status: Option<u16>,
        /// The transport error.
        #[source]
        source: HttpError,
    },

    /// A response could not be mapped to models.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// An argument was rejected before any request was made.
    #[error("{0}")]
    InvalidArgument(String),

    /// The operation is not implemented.
    #[error("{0} is not implemented.")]
    NotImplemented(&'static str),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EcontError {
    /// Returns the HTTP status code of a failed request, or `422` for an
    /// invalid resource.
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        match self {
            Self::InvalidResource { .. } => Some(422),
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the underlying HTTP error, if any.
    #[must_use]
    pub const fn http_error(&self) -> Option<&HttpError> {
        match self {
            Self::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<HttpError> for EcontError {
    fn from(source: HttpError) -> Self {
        Self::Http {
            status: source.status(),
            source,
        }
    }
}

//! Model-layer error types.

use thiserror::Error;

use crate::clients::JsonDecodeError;

/// Errors raised while hydrating, casting or validating models.
///
/// # Example
///
/// ```rust
/// use econt_api::models::ModelError;
///
/// let error = ModelError::MissingRequired {
///     model: "ThreeWayParameters",
///     missing: vec!["requester_name", "requester_phone"],
/// };
/// assert_eq!(
///     error.to_string(),
///     "Missing required attributes for model [ThreeWayParameters]. Missing attributes: [requester_name, requester_phone]."
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// One or more required attributes are absent or `null`.
    #[error("Missing required attributes for model [{model}]. Missing attributes: [{}].", missing.join(", "))]
    MissingRequired {
        /// The model type.
        model: &'static str,
        /// The missing attribute names, in declaration order.
        missing: Vec<&'static str>,
    },

    /// A cast descriptor was not recognized.
    #[error("Invalid cast type [{cast}] for model [{model}].")]
    InvalidCast {
        /// The unrecognized descriptor.
        cast: String,
        /// The model type declaring the cast.
        model: &'static str,
    },

    /// An `enum` cast named no enum type.
    #[error("Tried to cast attribute {model}::{attribute} to enum, but no enum type was provided.")]
    MissingEnumType {
        /// The model type.
        model: &'static str,
        /// The attribute being cast.
        attribute: String,
    },

    /// A value matched no case of its enum.
    #[error("Value [{value}] of attribute {model}::{attribute} is not a case of enum [{enum_name}].")]
    InvalidEnumValue {
        /// The model type.
        model: &'static str,
        /// The attribute being cast.
        attribute: String,
        /// The enum type.
        enum_name: &'static str,
        /// The offending value, JSON encoded.
        value: String,
    },

    /// A nested model cast received something other than a JSON object.
    #[error("Attribute {model}::{attribute} cannot be cast to model [{target}]: expected an object.")]
    NotAnObject {
        /// The model type.
        model: &'static str,
        /// The attribute being cast.
        attribute: String,
        /// The target model type.
        target: &'static str,
    },

    /// A value could not be encoded as JSON.
    #[error("Error encoding econt model [{model}] to JSON: {message}")]
    JsonEncoding {
        /// The model type.
        model: &'static str,
        /// The encoder's message.
        message: String,
    },

    /// The response body has no such top-level key.
    #[error("Response does not contain the key [{key}].")]
    MissingKey {
        /// The missing key.
        key: String,
    },

    /// The value expected to hold a list of models has another shape.
    #[error("Expected a list of models under [{key}].")]
    NotAList {
        /// The key that was read, or `<root>` for the whole body.
        key: String,
    },

    /// The response body is not valid JSON.
    #[error(transparent)]
    Decode(#[from] JsonDecodeError),
}

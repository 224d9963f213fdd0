//! Attribute models hydrated from API responses.
//!
//! Econt responses are JSON objects. This module maps them onto [`Model`]s:
//! attribute bags whose [`ModelKind`] declares aliases, casts and required
//! attributes.
//!
//! # Overview
//!
//! - [`Model`]: attributes plus memoized casts and client back-reference
//! - [`ModelKind`]: the cast, alias and required tables of each model type
//! - [`Cast`] / [`CastValue`]: cast descriptors and their results
//! - [`ModelCollection`]: an ordered list of models, buildable from a response
//! - [`Address`] / [`ClientProfile`]: views with domain behavior
//! - [`enums`]: the closed value sets used by enum casts
//!
//! # Example
//!
//! ```rust
//! use econt_api::models::{Model, ModelKind};
//! use serde_json::json;
//!
//! let office = Model::from_value(
//!     ModelKind::Office,
//!     json!({"code": "1000", "shipmentTypes": ["pack", "post_pack"]}),
//! )
//! .unwrap();
//!
//! let types = office.get_attribute("shipmentTypes").unwrap();
//! assert_eq!(types.as_list().unwrap().len(), 2);
//! ```

mod address;
mod cast;
mod collection;
pub mod enums;
mod errors;
mod kind;
mod model;

pub use address::{Address, ClientProfile};
pub use cast::{Cast, CastValue};
pub use collection::ModelCollection;
pub use enums::{EnumKind, EnumValue};
pub use errors::ModelError;
pub use kind::ModelKind;
pub use model::Model;

//! # Econt API Rust Client
//!
//! A Rust client for the Econt Express courier web services, providing
//! typed configuration, an authenticated HTTP client and a model layer that
//! hydrates JSON responses into typed domain objects.
//!
//! ## Overview
//!
//! This crate provides:
//! - Configuration via [`EcontConfig`] and [`EcontConfigBuilder`], with a
//!   ready-made demo account
//! - [`EcontClient`]: credentials, live/demo switching and the resource
//!   registry
//! - Resources for every service: [`resources::Addresses`],
//!   [`resources::Labels`], [`resources::Nomenclatures`],
//!   [`resources::PaymentReports`], [`resources::Profiles`],
//!   [`resources::Shipments`] and [`resources::ThreeWay`]
//! - [`models::Model`] and [`models::ModelCollection`]: attribute bags with
//!   declared casts to numbers, strings, enums, nested models and
//!   collections
//! - [`HttpClient`] with a pluggable [`clients::Transport`], including a
//!   [`clients::MockTransport`] for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use econt_api::{EcontConfig, Environment, Password, Username};
//!
//! let config = EcontConfig::builder()
//!     .username(Username::new("my-user").unwrap())
//!     .password(Password::new("my-password").unwrap())
//!     .environment(Environment::Demo)
//!     .user_agent_prefix("MyShop/2.1")
//!     .build()
//!     .unwrap();
//!
//! assert!(config.environment().is_demo());
//! ```
//!
//! ## Calling Services
//!
//! ```rust,ignore
//! use econt_api::{EcontClient, EcontConfig};
//! use econt_api::resources::OfficeFilter;
//!
//! let client = EcontClient::new(EcontConfig::demo())?;
//!
//! let countries = client.nomenclatures()?.get_countries().await?;
//! let offices = client
//!     .nomenclatures()?
//!     .get_offices("BGR", &OfficeFilter::new().city_id(41))
//!     .await?;
//!
//! for office in &offices {
//!     let address = office.get_attribute("address")?;
//!     println!("{}: {:?}", office["name"], address.as_model());
//! }
//! ```
//!
//! ## Resources By Name
//!
//! ```rust,ignore
//! let shipments = client.make_resource("shipments", false)?;
//! let response = shipments.call("getShipmentStatuses", json!({"shipmentNumbers": ["1051"]})).await?;
//!
//! // Unknown names are rejected with code 422.
//! assert_eq!(client.make_resource("parcels", false).unwrap_err().code(), Some(422));
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Credentials are validated on construction
//! - **Thread-safe**: All client types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod resources;
pub mod utils;

// Re-export public types at crate root for convenience
pub use config::{
    Credentials, EcontConfig, EcontConfigBuilder, Environment, Password, Username, DEMO_URL,
    LIVE_URL,
};
pub use error::ConfigError;
pub use utils::Timezone;

// Re-export client types
pub use clients::{
    ClientContext, EcontClient, EcontError, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpResponse, HttpResponseError, InvalidHttpRequestError, JsonDecodeError, RequestData,
};

// Re-export model types
pub use models::{Model, ModelCollection, ModelError, ModelKind};

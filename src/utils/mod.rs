//! Helpers shared by resources.
//!
//! - [`datetime`]: conversion of date inputs to unix timestamps

pub mod datetime;

pub use datetime::{timestamp, DateError, DateInput, Timezone};

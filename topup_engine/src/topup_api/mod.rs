//! # Top-up engine public API
//!
//! The `topup_api` module exposes the programmatic API of the engine. Each API is a thin struct over a storage backend
//! that implements the traits it needs, so clients pick only the functionality they use:
//!
//! * [`link_api`] issues single-use redeem links and classifies them for the redemption view.
//! * [`order_flow_api`] redeems links into orders and lets an admin confirm or fail them. It publishes order lifecycle
//!   events.
//! * [`access_api`] manages time-limited permission for ordinary users to issue links for themselves.
//!
//! # API usage
//!
//! ```rust,ignore
//! use topup_engine::{CorruptionPolicy, JsonFileDatabase, LinkApi};
//! let db = JsonFileDatabase::open("./data", CorruptionPolicy::ResetToDefault).await?;
//! let api = LinkApi::new(db);
//! let link = api.issue_link(12345, 300, Some("hour")).await?;
//! ```

pub mod access_api;
pub mod errors;
pub mod link_api;
pub mod link_objects;
pub mod order_flow_api;

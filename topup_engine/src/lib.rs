//! Top-up Engine
//!
//! The top-up engine holds the life-cycle logic of the diamond top-up broker: single-use redeem links, the orders
//! created when those links are redeemed, and the access grants that let ordinary users issue links for themselves.
//! It knows nothing about HTTP or chat bots; those live in the server crate.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`mod@db`]). The [`LinkManagement`], [`OrderManagement`] and [`GrantManagement`] traits define the
//!    persistent store contract. [`JsonFileDatabase`] implements it with one JSON file per table and a lock per table,
//!    so concurrent read-modify-write cycles from web handlers and the bot cannot lose each other's updates.
//! 2. The public API ([`mod@topup_api`]): [`LinkApi`], [`OrderFlowApi`] and [`AccessApi`].
//!
//! The engine also emits events when orders are created or resolved. Subscribe to them with [`events::EventHooks`];
//! the server uses this to notify the admin and customers without blocking the order flow.
pub mod db;

pub mod db_types;
pub mod events;
pub mod topup_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use db::{
    json_file::{CorruptionPolicy, JsonFileDatabase},
    traits::{
        GrantManagement,
        LinkClaim,
        LinkManagement,
        OrderManagement,
        OrderResolution,
        StoreError,
        TopupDatabase,
    },
};
pub use topup_api::{
    access_api::AccessApi,
    errors::{AccessApiError, LinkApiError, OrderFlowError},
    link_api::LinkApi,
    link_objects::LinkStatus,
    order_flow_api::{OrderFlowApi, DEFAULT_PAYMENT_METHOD},
};

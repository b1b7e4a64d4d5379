//! # Persistent store contracts
//!
//! This module defines the interface contracts of the top-up engine storage *backends*. There are three logical
//! tables, each with its own trait:
//!
//! * [`LinkManagement`] stores redeem links, keyed by token, and performs the atomic "claim" of a link during
//!   redemption.
//! * [`OrderManagement`] stores orders in creation order and performs the atomic status resolution.
//! * [`GrantManagement`] stores access grants, keyed by user id.
//!
//! [`TopupDatabase`] is implemented automatically for any backend that provides all three.
//!
//! Every mutating call is a single read-modify-write cycle on one table. Backends must serialise these cycles per
//! table so that two concurrent writers cannot lose each other's updates. Nothing is atomic *across* tables.
mod data_objects;
mod grant_management;
mod link_management;
mod order_management;

pub use data_objects::{LinkClaim, OrderResolution, StoreError};
pub use grant_management::GrantManagement;
pub use link_management::LinkManagement;
pub use order_management::OrderManagement;

/// The union of all the storage behaviour needed by the top-up engine.
pub trait TopupDatabase: LinkManagement + OrderManagement + GrantManagement {}

impl<T> TopupDatabase for T where T: LinkManagement + OrderManagement + GrantManagement {}

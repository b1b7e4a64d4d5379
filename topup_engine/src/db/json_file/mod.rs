//! Flat-file JSON backend.
//!
//! Three files, one per table: `links.json` (object keyed by token), `purchases.json` (array of orders in creation
//! order) and `allowed.json` (object keyed by user id).
mod db;
mod table;

pub use db::{GrantsTable, JsonFileDatabase, LinksTable, OrdersTable, GRANTS_FILE, LINKS_FILE, ORDERS_FILE};
pub use table::{Change, CorruptionPolicy, JsonTable};

//! # Top-up server
//! This crate hosts the outer surfaces of the diamond top-up broker. It is responsible for:
//! * Serving the redemption view and accepting purchases over HTTP.
//! * Running the Telegram bot that admins and approved users drive with slash commands.
//! * Notifying the admin of new orders, and customers of resolved ones.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/`: The price table.
//! * `/redeem/{token}`: The redemption view for a link.
//! * `/purchase`: Spends a link and creates an order.

pub mod bot;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod telegram;

#[cfg(test)]
mod endpoint_tests;

//! Lead Intake API Library
//!
//! Contact-form back end for the consultancy website. Each submission is
//! validated and delivered to exactly one channel: the Postgres lead store
//! first, then the spreadsheet webhook if the insert fails.
//!
//! # Modules
//!
//! - `app`: Router assembly and API documentation routes.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `delivery`: Delivery channel trait and the primary/fallback channels.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `lead_storage`: Lead persistence in Postgres.
//! - `models`: Lead and response data models.
//! - `submission`: Ordered primary/fallback submission router.
//! - `webhook_client`: Fallback webhook client.

pub mod app;
pub mod config;
pub mod db;
pub mod delivery;
pub mod errors;
pub mod handlers;
pub mod lead_storage;
pub mod models;
pub mod submission;
pub mod webhook_client;

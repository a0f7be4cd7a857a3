//! # API crate: HTTP collaborators for the employee directory
//!
//! The directory client only knows the [`store::EmployeeStore`] and
//! [`store::EmailTrigger`] contracts. This crate provides the production
//! implementations that speak HTTP, on native targets and in the browser.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`postgrest`] | [`PostgrestStore`]: list/insert/update/delete-many against the hosted database's REST endpoint (`/rest/v1/{table}`). |
//! | [`poll`] | Polling change feed used by [`PostgrestStore::subscribe`](store::EmployeeStore::subscribe): lists the table on an interval and emits a resync event whenever the [`store::SnapshotDigest`] moves. |
//! | [`webhook`] | [`WebhookClient`]: fire-and-forget JSON POST to the automation webhook. |
//!
//! ## Building from configuration
//!
//! ```no_run
//! let config = store::DirectoryConfig::from_env().expect("config");
//! let employees = api::PostgrestStore::from_config(&config);
//! let mailer = api::WebhookClient::from_config(&config.webhook);
//! ```

pub mod poll;
pub mod postgrest;
pub mod webhook;

pub use postgrest::PostgrestStore;
pub use webhook::WebhookClient;

//! Business logic of the travel listings: hosts, guests, their bookings
//! and reviews.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod seed;

use std::time::Duration;

use derive_more::Debug;

#[cfg(doc)]
use domain::user::Session;
#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Key signing the [JWT]s of newly started [`Session`]s.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub signing_key: jsonwebtoken::EncodingKey,

    /// Key verifying the [JWT]s of presented [`Session`]s.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub verifying_key: jsonwebtoken::DecodingKey,

    /// Time a newly started [`Session`] stays valid for.
    pub session_ttl: Duration,
}

impl Config {
    /// Creates a new [`Config`] signing and verifying [`Session`]s with the
    /// provided shared `secret`.
    #[must_use]
    pub fn with_secret(secret: &[u8], session_ttl: Duration) -> Self {
        Self {
            signing_key: jsonwebtoken::EncodingKey::from_secret(secret),
            verifying_key: jsonwebtoken::DecodingKey::from_secret(secret),
            session_ttl,
        }
    }
}

/// Entry point executing [`Command`]s and [`Query`]s against the `Db`.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// [`Config`] the [`Command`]s are executed with.
    config: Config,

    /// Storage of the [`domain`] entities.
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] on top of the provided `database`.
    #[must_use]
    pub const fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub const fn database(&self) -> &Db {
        &self.database
    }
}

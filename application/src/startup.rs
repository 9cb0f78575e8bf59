//! Startup routine shared by the binaries.

use derive_more::{Display, Error as StdError};
use service::infra::{database, postgres, Postgres};
use tracerr::Traced;

use crate::{config, Service};

postgres::embed_migrations!("../migrations");

/// Error of starting up a [`Service`].
#[derive(Debug, Display, StdError)]
pub enum StartupError {
    /// [`Postgres`] client cannot be created.
    #[display("failed to initialize `Postgres` client: {_0}")]
    Postgres(Traced<database::Error>),

    /// Database schema cannot be brought up to date.
    #[display("failed to run database migrations: {_0}")]
    Migrations(refinery::Error),
}

/// Connects to [`Postgres`] and brings its schema up to date, building a
/// [`Service`] on top of it.
///
/// # Errors
///
/// See [`StartupError`] for details.
pub async fn service(
    db_conf: config::Postgres,
    service_conf: config::Service,
) -> Result<Service, StartupError> {
    let mut db =
        Postgres::new(&db_conf.into()).map_err(StartupError::Postgres)?;

    let report = migrations::runner()
        .run_async(&mut db)
        .await
        .map_err(StartupError::Migrations)?;
    for m in report.applied_migrations() {
        tracing::info!(migration = %m, "applied database migration");
    }

    Ok(Service::new(service_conf.into(), db))
}

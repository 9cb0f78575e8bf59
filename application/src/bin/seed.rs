use std::process::ExitCode;

use application::{log, startup, Config, SeedArgs};
use service::{
    command::{self, Command as _},
    read,
};

#[tokio::main]
async fn main() -> ExitCode {
    log::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn run() -> Result<(), ()> {
    let args = SeedArgs::parse().map_err(|e| {
        tracing::error!("failed to parse command line arguments: {e}");
    })?;

    let conf = Config::new(&args.config).map_err(|e| {
        tracing::error!("failed to load `Config`: {e}");
    })?;
    log::set_level(conf.log.level);

    seed(&args, conf).await
}

async fn seed(args: &SeedArgs, conf: Config) -> Result<(), ()> {
    let Config {
        service: service_conf,
        postgres: postgres_conf,
        ..
    } = conf;

    let service = startup::service(postgres_conf, service_conf)
        .await
        .map_err(|e| tracing::error!("{e}"))?;

    tracing::info!(
        listings = args.listings,
        bookings = args.bookings,
        reviews = args.reviews,
        clear = args.clear,
        rng_seed = ?args.rng_seed,
        "seeding the database",
    );

    let read::Totals {
        users,
        listings,
        bookings,
        reviews,
    } = service
        .execute(command::SeedDatabase {
            counts: args.into(),
            clear: args.clear,
            rng_seed: args.rng_seed,
        })
        .await
        .map_err(|e| {
            tracing::error!("failed to seed the database: {e}");
        })?;

    tracing::info!(users, listings, bookings, reviews, "database seeded");

    Ok(())
}

#[cfg(test)]
mod spec {
    use application::{config, Config, SeedArgs};
    use clap::Parser as _;

    use super::seed;

    #[tokio::test]
    async fn fails_without_database() {
        let args = SeedArgs::try_parse_from(["seed"]).unwrap();
        let conf = Config {
            postgres: config::Postgres {
                port: 1,
                ..config::Postgres::default()
            },
            ..Config::default()
        };

        assert!(seed(&args, conf).await.is_err());
    }
}

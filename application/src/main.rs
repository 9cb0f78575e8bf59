use application::{log, server, startup, Args, Config};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    log::init();

    _ = run().await;
}

async fn run() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        tracing::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        server: server_conf,
        service: service_conf,
        postgres: postgres_conf,
        log: log_conf,
    } = Config::new(config).map_err(|e| {
        tracing::error!("failed to load `Config`: {e}");
    })?;

    log::set_level(log_conf.level);

    let service = startup::service(postgres_conf, service_conf)
        .await
        .map_err(|e| tracing::error!("{e}"))?;

    let app = server::router(service, &server_conf.cors).map_err(|e| {
        tracing::error!("invalid CORS origin: {e}");
    })?;

    let addr = (server_conf.host.as_str(), server_conf.port);
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!(
            "failed to listen on `{}:{}`: {e}",
            server_conf.host,
            server_conf.port,
        );
    })?;

    tracing::info!(
        "listening on `{}:{}`",
        server_conf.host,
        server_conf.port,
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| tracing::error!("webserver failed: {e}"))
}

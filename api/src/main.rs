use api::routes::app;
use api::state::AppState;
use db::Store;
use std::net::SocketAddr;
use tracing_appender::rolling;
use util::{config, paths};

#[tokio::main]
async fn main() {
    let _log_guard = init_logging(&config::log_file());

    if config::jwt_secret().is_empty() {
        panic!("JWT_SECRET must be set");
    }

    let store = Store::open(config::database_path()).expect("Failed to open document store");
    paths::ensure_dir(paths::course_image_dir()).expect("Failed to create upload directories");
    paths::ensure_dir(paths::session_video_dir()).expect("Failed to create upload directories");

    let app = app(AppState::new(store));

    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    println!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true);

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}

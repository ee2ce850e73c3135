use axum::extract::Request;
use tower::Layer as _;
use tower_http::normalize_path::NormalizePathLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "baduk_server=debug,baduk_engine=info".into()),
        )
        .init();

    let config = baduk_server::config::Config::from_env();
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        board_size = config.board_size,
        simulations = config.simulations,
        evaluator = ?config.evaluator,
        "Starting baduk-server on {addr}"
    );

    let (app, _state) = baduk_server::build_router(config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    let app = NormalizePathLayer::trim_trailing_slash().layer(app);
    axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service(app),
    )
    .await
    .expect("Server error");
}

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower_http::cors::CorsLayer;

pub mod config;
pub mod error;
pub mod registry;
pub mod routes;
pub mod services;

use config::Config;
use registry::GameRegistry;
use services::evaluators::{SharedEvaluator, build_evaluator};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: GameRegistry,
    pub evaluator: SharedEvaluator,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let evaluator = build_evaluator(config.evaluator);
        Self::with_evaluator(config, evaluator)
    }

    pub fn with_evaluator(config: Config, evaluator: SharedEvaluator) -> Self {
        AppState {
            config: Arc::new(config),
            registry: GameRegistry::new(),
            evaluator,
        }
    }
}

pub fn build_router(config: Config) -> (Router, AppState) {
    let state = AppState::new(config);
    (build_router_with_state(state.clone()), state)
}

pub fn build_router_with_state(state: AppState) -> Router {
    let app = Router::new()
        .nest("/api", routes::api::router())
        .route("/up", get(routes::health::health_check));

    let app = match cors_layer(&state.config) {
        Some(cors) => app.layer(cors),
        None => app,
    };
    app.with_state(state)
}

fn cors_layer(config: &Config) -> Option<CorsLayer> {
    let origin = match HeaderValue::from_str(&config.cors_origin) {
        Ok(origin) => origin,
        Err(_) => {
            tracing::warn!("Ignoring invalid CORS_ORIGIN {:?}", config.cors_origin);
            return None;
        }
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

use std::str::FromStr;
use std::time::Duration;

use baduk_engine::{DEFAULT_SIZE, MAX_SIZE};

/// Which evaluator drives `suggest` and `bot-move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorKind {
    Heuristic,
    Uniform,
    Random,
}

impl FromStr for EvaluatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(EvaluatorKind::Heuristic),
            "uniform" => Ok(EvaluatorKind::Uniform),
            "random" => Ok(EvaluatorKind::Random),
            other => Err(format!("unknown evaluator: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub board_size: u8,
    pub simulations: u32,
    pub exploration: f32,
    pub search_timeout: Duration,
    pub evaluator: EvaluatorKind,
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
            board_size: DEFAULT_SIZE,
            simulations: 400,
            exploration: baduk_engine::search::DEFAULT_EXPLORATION,
            search_timeout: Duration::from_millis(5000),
            evaluator: EvaluatorKind::Heuristic,
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparseable or out-of-range values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let board_size = parse_or(&lookup, "BOARD_SIZE", defaults.board_size);
        let exploration = parse_or(&lookup, "SEARCH_EXPLORATION", defaults.exploration);

        Config {
            port: parse_or(&lookup, "PORT", defaults.port),
            board_size: if (2..=MAX_SIZE).contains(&board_size) {
                board_size
            } else {
                tracing::warn!("BOARD_SIZE {board_size} out of range, using {DEFAULT_SIZE}");
                defaults.board_size
            },
            simulations: parse_or(&lookup, "SEARCH_SIMULATIONS", defaults.simulations),
            exploration: if exploration.is_finite() && exploration >= 0.0 {
                exploration
            } else {
                tracing::warn!("SEARCH_EXPLORATION {exploration} is invalid, using default");
                defaults.exploration
            },
            search_timeout: Duration::from_millis(parse_or(
                &lookup,
                "SEARCH_TIMEOUT_MS",
                defaults.search_timeout.as_millis() as u64,
            )),
            evaluator: parse_or(&lookup, "EVALUATOR", defaults.evaluator),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring invalid {key}={raw:?}");
            default
        }),
    }
}

//! Tracing subscriber setup
//!
//! Filter precedence: `RUST_LOG`, then `LOG_FILTER` from [`Settings`], then a
//! per-environment default scoped to this crate.

use crate::config::{Environment, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Default directives when neither `RUST_LOG` nor `LOG_FILTER` is set.
pub fn default_directives(env: &Environment) -> String {
    let (ours, http, rest) = match env {
        Environment::Dev => ("debug", "info", "info"),
        Environment::Staging => ("debug", "warn", "info"),
        Environment::Prod => ("info", "warn", "warn"),
    };
    format!("{CRATE_TARGET}={ours},reqwest={http},hyper={http},{rest}")
}

/// Returns the filter and, if `LOG_FILTER` was rejected, the parse error.
fn build_filter(settings: &Settings) -> (EnvFilter, Option<String>) {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return (filter, None);
    }

    let mut rejected = None;
    if let Some(directives) = settings.log_filter.as_deref() {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return (filter, None),
            Err(e) => rejected = Some(format!("{directives:?}: {e}")),
        }
    }

    (EnvFilter::new(default_directives(&settings.env)), rejected)
}

pub fn init_logging(settings: &Settings) {
    let env = &settings.env;
    let (filter, rejected) = build_filter(settings);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    let registry = tracing_subscriber::registry().with(filter);
    if env.is_prod() {
        registry.with(fmt_layer.json().flatten_event(true)).init();
    } else {
        registry.with(fmt_layer.pretty()).init();
    }

    if let Some(reason) = rejected {
        tracing::warn!(%reason, "Ignoring invalid LOG_FILTER");
    }
    tracing::info!(env = ?env, "Logging initialized");
}

use anyhow::Result;
use std::sync::Arc;

use bidder_workspace::workspace::view::{history_rows, AnalyticsView};
use bidder_workspace::{config, logging, PricingClient, Workspace};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings);

    tracing::info!(
        env = ?settings.env,
        pricing_api_url = %settings.pricing_api_url,
        "Starting Bidder workspace"
    );

    // Create pricing service client
    let client = PricingClient::new(
        &settings.pricing_api_url,
        settings.pricing_api_timeout_seconds,
    )?;

    let workspace = Workspace::new(Arc::new(client));
    workspace.initialize().await;

    if settings.submit_default_job {
        let preset = workspace.active_preset();
        tracing::info!(
            trade = preset.label,
            preview = %workspace.preview(),
            guidance = preset.margin_guidance,
            "Submitting default job"
        );
        workspace.submit().await;
    }

    let state = workspace.snapshot();

    if let Some(error) = &state.error {
        tracing::warn!(error = %error, "Workspace reported an error");
    }

    match AnalyticsView::from_summary(state.analytics.as_ref()) {
        Some(view) => tracing::info!(
            total_jobs = view.total_jobs,
            average_bid = %view.average_bid,
            average_margin = %view.average_margin,
            "Portfolio analytics"
        ),
        None => tracing::info!("Analytics will appear once bids have been generated"),
    }

    for row in history_rows(&state.history, state.selected_job_id()) {
        tracing::info!(
            job_id = %row.job_id,
            trade = %row.trade,
            location = %row.location,
            total_bid = %row.total_bid,
            active = row.active,
            "Recent bid"
        );
    }

    if let Some(view) = workspace.bid_view() {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    Ok(())
}

//! Meridian - Main Entry Point
//!
//! Opens the configured workspace, applies one command and writes the
//! snapshot back when it changed.

mod cli;

use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use meridian_application::WorkspaceController;
use meridian_infrastructure::{FileWorkspaceStore, SettingsRepository, apply_env_overrides};
use meridian_ui::WorkspaceView;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = Cli::parse().into_command();

    let settings = SettingsRepository::new().load().await?;
    let settings = apply_env_overrides(settings, |name| std::env::var(name).ok())?;
    let store = FileWorkspaceStore::in_data_dir(settings.data_dir.as_deref())
        .ok_or("Could not determine the data directory")?;

    tracing::info!(
        backend = %settings.backend_id,
        path = %store.root().display(),
        "Starting Meridian v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut controller = WorkspaceController::new(Arc::new(store), &settings);
    if settings.auto_restore {
        let restored = controller.restore().await;
        tracing::info!(tabs = restored, "Workspace opened");
    } else {
        controller.process_workspace(meridian_domain::Workspace::new());
    }

    let mut view = WorkspaceView::new(controller);
    view.refresh();

    let outcome = cli::run(&mut view, command);
    for line in &outcome.lines {
        println!("{line}");
    }

    if outcome.changed {
        view.controller_mut().flush().await?;
    }
    Ok(())
}

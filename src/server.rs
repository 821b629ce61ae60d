use std::path::{Path, PathBuf};

use axum::Router;
use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;

use crate::loader::load_config;
use crate::preview::write_preview;

/// Everything needed to rebuild the preview page
#[derive(Debug, Clone)]
pub struct PreviewSource {
    pub config: Option<PathBuf>,
    pub output: PathBuf,
    pub pkg: Option<PathBuf>,
    pub title: String,
}

impl PreviewSource {
    fn regenerate(&self) -> anyhow::Result<()> {
        let config = load_config(self.config.as_deref())?;
        write_preview(&config, &self.title, &self.output, self.pkg.as_deref())
    }
}

/// Start the preview server with hot reload
pub async fn serve(source: PreviewSource, port: u16) -> anyhow::Result<()> {
    source.regenerate()?;
    println!("Generated preview in {}", source.output.display());

    // Keeps the config watcher alive for as long as the server runs
    let _config_watcher = match &source.config {
        Some(config_path) => Some(watch_config(config_path, source.clone())?),
        None => None,
    };

    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    // Reload the browser whenever the output changes
    let mut output_watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                reloader.reload();
            }
        }
    })?;
    output_watcher.watch(&source.output, RecursiveMode::Recursive)?;

    let app = Router::new()
        .fallback_service(ServeDir::new(&source.output))
        .layer(livereload);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Preview server running at http://localhost:{port}");
    if let Some(config_path) = &source.config {
        println!("Watching {} for changes...", config_path.display());
    }
    println!("Press Ctrl+C to stop");

    let _output_watcher = output_watcher;

    axum::serve(listener, app).await?;

    Ok(())
}

/// Regenerate the preview whenever the config file changes
fn watch_config(
    config_path: &Path,
    source: PreviewSource,
) -> anyhow::Result<notify::RecommendedWatcher> {
    let (tx, mut rx) = mpsc::channel::<()>(1);

    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                let _ = tx.blocking_send(());
            }
        }
    })?;

    let watch_path = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: editors often write a file in several steps
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            while rx.try_recv().is_ok() {}

            match source.regenerate() {
                Ok(()) => tracing::info!("Regenerated preview"),
                Err(e) => tracing::error!("Error regenerating preview: {e:#}"),
            }
        }
    });

    Ok(watcher)
}

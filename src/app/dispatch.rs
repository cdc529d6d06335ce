use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::status::render_status;
use crate::cli::Commands;
use wardline::Config;
use wardline::artifact::Artifact;
use wardline::gate::AdmissionRequest;
use wardline::sensory::SensoryStore;
use wardline::stream::WriterSink;
use wardline::vitals::{ProcProbe, sample_or_fallback};
use wardline::warden::Warden;

pub async fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Check { file, no_veto } => run_check(config, file.as_deref(), no_veto).await,
        Commands::Scan {
            file,
            name,
            language,
        } => run_scan(config, &file, name, language).await,
        Commands::Vitals => {
            let probe = ProcProbe::new(&config.vitals);
            let snapshot = sample_or_fallback(&probe).await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Commands::Watch => run_watch(config).await,
        Commands::Status => {
            let warden = warden(config);
            println!("{}", render_status(&warden));
            Ok(())
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn warden(config: Config) -> Warden<ProcProbe> {
    let probe = ProcProbe::new(&config.vitals);
    Warden::new(config, probe)
}

async fn run_check(config: Config, file: Option<&Path>, no_veto: bool) -> Result<()> {
    let raw = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read request from {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read request from stdin")?;
            raw
        }
    };
    let request: AdmissionRequest =
        serde_json::from_str(&raw).context("Request is not a valid admission request")?;

    let warden = warden(config);
    if no_veto {
        warden.control().set_veto_enabled(false);
    }
    let decision = warden.admit(&request).await;
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

async fn run_scan(
    config: Config,
    file: &Path,
    name: Option<String>,
    language: Option<String>,
) -> Result<()> {
    let code = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let name = name
        .or_else(|| file.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "artifact".to_string());
    let language = language
        .or_else(|| file.extension().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "text".to_string());

    let warden = warden(config);
    let mut artifact = Artifact::new(name, String::new(), language, code);
    warden.scan(&mut artifact)?;
    println!("{}", serde_json::to_string_pretty(&artifact)?);
    Ok(())
}

/// One line of JSON read by `watch` from stdin.
#[derive(Debug, Deserialize)]
struct ActivityLine {
    agent_name: String,
    activity_type: String,
    #[serde(default)]
    data: Value,
}

/// Lines read from stdin on a plain OS thread. The thread is detached so a
/// pending terminal read never holds up runtime shutdown.
fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "watch.stdin_failed");
                    break;
                }
            }
        }
    });
    rx
}

/// Record every well-formed activity line until the sender side closes.
/// Returns how many were recorded.
async fn feed_activity(store: &SensoryStore, mut lines: mpsc::Receiver<String>) -> Result<usize> {
    let mut fed = 0;
    while let Some(line) = lines.recv().await {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ActivityLine>(&line) {
            Ok(activity) => {
                store.record_agent_activity(
                    &activity.agent_name,
                    &activity.activity_type,
                    activity.data,
                )?;
                fed += 1;
            }
            Err(e) => tracing::warn!(error = %e, "watch.bad_line"),
        }
    }
    Ok(fed)
}

async fn run_watch(config: Config) -> Result<()> {
    let drain = Duration::from_millis(config.stream.interval_ms.saturating_mul(2));
    let warden = warden(config);
    let cancel = CancellationToken::new();

    let monitor = warden.spawn_monitor(cancel.clone());
    let stream = tokio::spawn(
        warden
            .broadcaster()
            .run(WriterSink::new(tokio::io::stdout()), cancel.clone()),
    );
    let store = Arc::clone(warden.store());
    let lines = stdin_lines();
    let mut feeder = tokio::spawn(async move { feed_activity(&store, lines).await });

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("watch.interrupted");
        }
        fed = &mut feeder => {
            let fed = fed??;
            info!(fed, "watch.input_closed");
            // Let the broadcaster emit whatever is still above its watermark.
            tokio::time::sleep(drain).await;
        }
    }

    cancel.cancel();
    feeder.abort();
    monitor.await?;
    stream.await??;
    Ok(())
}

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chart_updater::config::UpdaterConfig;
use chart_updater::manifest::types::Dependency;
use chart_updater::updater::UpdateEngine;

#[derive(Parser)]
#[command(name = "chart-updater")]
#[command(version, about = "Update Helm chart references in GitOps manifests")]
struct Cli {
    /// Updater configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tracked chart references file (YAML)
    #[arg(long)]
    deps: PathBuf,

    /// Decide and print updates without writing any file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            UpdaterConfig::from_yaml(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => UpdaterConfig::default(),
    };

    let text = fs::read_to_string(&cli.deps)
        .with_context(|| format!("failed to read {}", cli.deps.display()))?;
    let dependencies: Vec<Dependency> = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse {}", cli.deps.display()))?;

    let engine = UpdateEngine::new(config);
    let updates = engine.check_for_updates(&dependencies).await;
    if updates.is_empty() {
        println!("everything is up to date");
        return Ok(());
    }

    for (group, members) in engine.group_updates(updates.clone()) {
        println!("{group}:");
        for update in &members {
            println!(
                "  {}: {} -> {} ({})",
                update.dependency.chart_name,
                update.current_version,
                update.new_version,
                update.bump.as_str()
            );
        }
    }

    if cli.dry_run {
        return Ok(());
    }

    for diff in engine.update_manifests(&updates) {
        fs::write(&diff.path, &diff.mutated)
            .with_context(|| format!("failed to write {}", diff.path.display()))?;
        println!(
            "updated {} ({} change(s))",
            diff.path.display(),
            diff.applied.len()
        );
    }

    Ok(())
}

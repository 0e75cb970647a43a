use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use metal_inspect::{App, Config, EnvKeyProvider};

/// Maintenance entry point for the data core: inspect statistics, run
/// exports and manage backups from the command line.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let keys = EnvKeyProvider::new("METAL_INSPECT_DB_KEY");
    let app = App::init(config, &keys).await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("stats");

    match command {
        "stats" => {
            let statistics = app.inspections.statistics().await?;
            println!("Inspections: {}", statistics.total);
            println!("  draft:       {}", statistics.draft);
            println!("  in progress: {}", statistics.in_progress);
            println!("  completed:   {}", statistics.completed);
            println!("  cancelled:   {}", statistics.cancelled);
            println!("Total quantity: {}", statistics.total_quantity);
            println!("Total weight:   {} kg", statistics.total_weight);
            println!(
                "Completion rate: {:.1}%",
                statistics.completion_rate() * 100.0
            );
        }
        "export-csv" => {
            let path = app.reports.export_inspections_csv().await?;
            println!("Wrote {}", path.display());
        }
        "backup" => {
            let path = app.backup.create_backup().await?;
            println!("Wrote {}", path.display());
        }
        "restore" => {
            let archive = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("usage: metal_inspect restore <archive>"))?;
            app.backup.restore_backup(Path::new(archive)).await?;
            println!("Restored from {archive}");
        }
        "prune-backups" => {
            let days: u64 = args.get(1).map(|d| d.parse()).transpose()?.unwrap_or(30);
            let removed = app
                .backup
                .delete_old_backups(Duration::from_secs(days * 24 * 60 * 60))
                .await?;
            println!("Removed {removed} old backups");
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("Commands: stats, export-csv, backup, restore <archive>, prune-backups [days]");
            std::process::exit(2);
        }
    }

    Ok(())
}

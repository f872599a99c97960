use clap::Parser;
use price_predictor::config::toml_config::DEFAULT_RUN_ID;
use price_predictor::utils::{logger, validation};
use price_predictor::{LocalStorage, ModelExporter};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "export-model")]
#[command(about = "Export a tracked model run into a portable model.json")]
struct Args {
    /// Tracking store URI (http(s)://, file: or a local mlruns path)
    #[arg(long, env = "TRACKING_URI", default_value = "./mlruns")]
    tracking_uri: String,

    /// Run identifier of the training run to export
    #[arg(long, env = "RUN_ID", default_value = DEFAULT_RUN_ID)]
    run_id: String,

    /// Artifact path of the model inside the run
    #[arg(long, default_value = "model")]
    artifact_path: String,

    /// Where to write the exported model
    #[arg(short, long, default_value = "model.json")]
    output: String,

    /// Tracking store request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_seconds: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let checks = validation::validate_tracking_uri("tracking-uri", &args.tracking_uri)
        .and_then(|_| validation::validate_non_empty_string("run-id", &args.run_id))
        .and_then(|_| validation::validate_path("output", &args.output))
        .and_then(|_| {
            validation::validate_positive_number("timeout-seconds", args.timeout_seconds as usize, 1)
        });
    if let Err(e) = checks {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(".".to_string());
    let exporter = ModelExporter::new(storage, Duration::from_secs(args.timeout_seconds));

    match exporter
        .export(&args.tracking_uri, &args.run_id, &args.artifact_path, &args.output)
        .await
    {
        Ok(report) => {
            println!("✅ Model successfully saved to: {}", report.output_path);
            println!("✅ File size: {:.2} MB", report.size_mb());
            println!("\n*** The predictor can now load '{}'. ***", report.output_path);
        }
        Err(e) => {
            tracing::error!("❌ Export failed: {}", e);
            eprintln!("❌ FAILED TO EXPORT MODEL. Error: {}", e);
            eprintln!("💡 Action Required: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }
}

use clap::Parser;
use price_predictor::utils::error::{ErrorSeverity, PredictorError};
use price_predictor::utils::{logger, validation::Validate};
use price_predictor::{
    BatchPredictor, CliConfig, LocalStorage, ModelResolver, PricePipeline, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let mut config = match TomlConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate().and_then(|_| cli.validate()) {
        tracing::error!("❌ Validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Prediction failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig, config: &TomlConfig) -> Result<(), PredictorError> {
    let resolver = Arc::new(ModelResolver::from_config(config)?);
    tracing::debug!("Model candidates: {:?}", resolver.candidates());
    let pipeline = PricePipeline::new(resolver);

    if let Some(batch) = &cli.batch {
        let storage = LocalStorage::new(".".to_string());
        let summary = BatchPredictor::new(&pipeline, storage)
            .run(batch, &cli.output)
            .await?;
        println!("✅ Predicted {} houses", summary.rows);
        println!("📁 Output saved to: {}", summary.output_path);
        return Ok(());
    }

    let inputs = cli.house.to_user_inputs();
    if cli.show_record {
        let record = pipeline.assemble(&inputs)?;
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    let prediction = pipeline.predict(&inputs).await?;
    println!("🎯 Predicted House Price: {}", prediction.formatted());
    Ok(())
}

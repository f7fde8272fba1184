use anyhow::{Context, Result};
use docs_translator::{config, pipeline, translator::ChatCompletionTranslator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docs_translator=info".parse()?),
        )
        .init();

    // Load configuration from environment
    let config = config::Config::from_env().context("Invalid configuration")?;

    info!(
        "Translating {} -> {} (model {}, target {}, max {} chars per chunk)",
        config.docs_dir.display(),
        config.out_dir.display(),
        config.openai_model,
        config.target_language,
        config.max_chars
    );

    let translator =
        ChatCompletionTranslator::from_config(&config).context("Failed to set up translator")?;

    let report = pipeline::run(&config, &translator).await?;

    info!(
        "Done: {} files, {} chunks, {} chars sent",
        report.files, report.chunks, report.chars_sent
    );
    Ok(())
}

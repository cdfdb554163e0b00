use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use vitae::advisory::AdvisoryClient;
use vitae::analyzer::Analyzer;
use vitae::embedding::{MiniLmConfig, MiniLmEncoder};
use vitae::extract::extract_document;
use vitae::logging::configure_logging;

/// Match a resume against a job description and print the analysis as JSON.
#[derive(Parser)]
#[command(name = "analyze_match")]
struct Args {
    /// Resume document (PDF or DOCX)
    #[arg(long)]
    resume: PathBuf,

    /// File containing the job description text
    #[arg(long)]
    jd: PathBuf,

    /// Also request learning recommendations for the missing keywords
    /// (requires GEMINI_API_KEY)
    #[arg(long)]
    recommend: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();
    let args = Args::parse();

    let config = MiniLmConfig::from_env();
    config.ensure_models_exist().await?;
    let encoder = MiniLmEncoder::initialize(config)?;
    let analyzer = Analyzer::new(Arc::new(encoder));

    let document = extract_document(&args.resume)?;
    if document.is_empty() {
        warn!("Resume {} extracted to empty text", args.resume.display());
    }
    let jd_text = std::fs::read_to_string(&args.jd)?;

    let result = analyzer.analyze(&document.text, &jd_text)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if args.recommend && !result.missing_keywords.is_empty() {
        let skills: Vec<String> = result
            .missing_keywords
            .iter()
            .map(|k| k.term.clone())
            .collect();

        // Advisory failures are reported but never invalidate the analysis
        // that was already printed
        match AdvisoryClient::from_env() {
            Ok(client) => match client.recommendations(&skills).await {
                Ok(recommendations) => {
                    println!("{}", serde_json::to_string_pretty(&recommendations)?)
                }
                Err(e) => eprintln!("recommendations unavailable: {e}"),
            },
            Err(e) => eprintln!("recommendations unavailable: {e}"),
        }
    }

    Ok(())
}

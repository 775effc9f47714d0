use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Parser;
use recitation_rs::{
    AnalysisResult, EngineConfig, EspeakConverter, Grade, RecitationEngineBuilder,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "recitation_report")]
#[command(about = "Grade a recitation transcript against its expected text")]
struct Args {
    /// Raw recognizer output to grade.
    #[arg(long, env = "RECITATION_TRANSCRIPT")]
    transcript: String,
    /// Expected text; the configured default verse when omitted.
    #[arg(long, env = "RECITATION_EXPECTED")]
    expected: Option<String>,
    #[arg(long, env = "RECITATION_CONFIG")]
    config: Option<PathBuf>,
    /// Overrides the configured espeak-ng voice.
    #[arg(long, env = "RECITATION_LANGUAGE")]
    language: Option<String>,
    #[arg(long, env = "RECITATION_ESPEAK", default_value = EspeakConverter::DEFAULT_PROGRAM)]
    espeak: String,
    #[arg(long, env = "RECITATION_PRETTY", default_value_t = false)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    grade: Grade,
    result: AnalysisResult,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        tracing::error!(error = %err, "recitation report failed");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let mut config = match args.config.as_ref() {
        Some(path) => EngineConfig::load(path).map_err(|e| e.to_string())?,
        None => EngineConfig::default(),
    };
    if let Some(language) = args.language {
        config.language = language;
    }

    let converter = EspeakConverter::new().with_program(args.espeak);
    let engine = RecitationEngineBuilder::new(config)
        .with_phoneme_converter(Arc::new(converter))
        .build()
        .map_err(|e| e.to_string())?;

    let result = engine
        .grade_transcription(&args.transcript, args.expected.as_deref())
        .map_err(|e| e.to_string())?;
    let report = Report {
        generated_at: Utc::now(),
        grade: result.grade(),
        result,
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|e| format!("failed to serialize report: {e}"))?;
    println!("{json}");
    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use email_router::config::ClassifierConfig;
use email_router::directory::StaffDirectory;
use email_router::error::InputError;
use email_router::input::{demo_emails, read_email_file, read_interactive_email};
use email_router::llm::{ModelSelector, gemini_factory};
use email_router::pipeline::{EmailClassifier, EmailInput};
use email_router::report::render_report;
use email_router::taxonomy::Taxonomy;

/// Classify inbound business email and propose internal routing.
#[derive(Debug, Parser)]
#[command(name = "email-router", version, about)]
struct Cli {
    /// Read emails from the terminal until an empty subject.
    #[arg(short, long, conflicts_with = "file")]
    interactive: bool,

    /// Classify one email file (first line subject, rest body; raw RFC 5322 also accepted).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Run only this built-in sample (0-based) in demo mode.
    #[arg(long)]
    demo_index: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = ClassifierConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    eprintln!("📨 Email Router v{}", env!("CARGO_PKG_VERSION"));

    // ── Staff directory ─────────────────────────────────────────────────
    let directory = Arc::new(StaffDirectory::load_or_empty(&config.directory_path));
    eprintln!(
        "   Directory: {} ({} staff)",
        config.directory_path.display(),
        directory.len()
    );

    // ── Model selection ─────────────────────────────────────────────────
    let factory = gemini_factory(config.api_key.clone(), config.base_url.clone());
    let selector = ModelSelector::new(factory).with_probe_params(config.probe);
    let selected = selector.select(&config.models).await.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  Check the API key and quota, or set EMAIL_ROUTER_MODELS to other models.");
        std::process::exit(1);
    });
    eprintln!("   Model: {}\n", selected.model);

    let taxonomy = Arc::new(Taxonomy::cosmetics_oem());
    let classifier = EmailClassifier::new(selected.provider, directory, Arc::clone(&taxonomy))
        .with_generation_params(config.generation)
        .with_match_config(config.matching);

    if cli.interactive {
        run_interactive(&classifier).await
    } else if let Some(path) = cli.file {
        run_file(&classifier, &path).await
    } else {
        run_demo(&classifier, cli.demo_index).await
    }
}

async fn classify_and_print(classifier: &EmailClassifier, email: &EmailInput) {
    let result = classifier.classify(email).await;
    println!("{}", render_report(email, &result, classifier.taxonomy()));
}

async fn run_demo(classifier: &EmailClassifier, index: Option<usize>) -> anyhow::Result<()> {
    let mut demos = demo_emails();
    if let Some(i) = index {
        if i >= demos.len() {
            eprintln!("Error: --demo-index must be between 0 and {}", demos.len() - 1);
            std::process::exit(1);
        }
        demos = vec![demos.swap_remove(i)];
    }

    eprintln!("Demo mode: classifying {} sample email(s)", demos.len());
    let results = classifier.classify_batch(&demos).await;
    for (i, (email, result)) in demos.iter().zip(&results).enumerate() {
        println!("\n{}", "#".repeat(60));
        println!("  Demo email {}/{}", i + 1, demos.len());
        println!("{}", "#".repeat(60));
        println!("{}", render_report(email, result, classifier.taxonomy()));
    }

    eprintln!("\nDone: {} email(s) classified", demos.len());
    eprintln!("  Interactive mode: email-router --interactive");
    eprintln!("  File input:       email-router --file email.txt");
    Ok(())
}

async fn run_file(classifier: &EmailClassifier, path: &std::path::Path) -> anyhow::Result<()> {
    let email = match read_email_file(path) {
        Ok(email) => email,
        Err(InputError::FileNotFound(p)) => {
            eprintln!("Error: file not found: {}", p.display());
            std::process::exit(1);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    tracing::info!(path = %path.display(), "Loaded email from file");
    classify_and_print(classifier, &email).await;
    Ok(())
}

async fn run_interactive(classifier: &EmailClassifier) -> anyhow::Result<()> {
    eprintln!("Interactive mode: enter an empty subject or press Ctrl+D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprintln!("\n{}", "-".repeat(40));
        match read_interactive_email(&mut lines).await {
            Ok(Some(email)) => {
                eprintln!("\nClassifying...");
                classify_and_print(classifier, &email).await;
            }
            Ok(None) => {
                eprintln!("Bye.");
                return Ok(());
            }
            Err(InputError::EmptyBody) => {
                eprintln!("Warning: body is empty, skipping.");
            }
            Err(e) => return Err(e).context("failed to read from terminal"),
        }
    }
}

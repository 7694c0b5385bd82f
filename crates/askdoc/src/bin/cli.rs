//! Interactive document Q&A shell
//!
//! Run with: cargo run -p askdoc -- <file>

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use askdoc::config::RagConfig;
use askdoc::pipeline::RagPipeline;
use askdoc::providers::{EmbeddingProvider, HashingEmbedder, LexicalAnswerModel, OllamaEmbedder};
use askdoc::types::Document;

#[derive(Parser)]
#[command(name = "askdoc", about = "Ask questions about a document", version)]
struct Cli {
    /// Document to ingest (.txt, .pdf, or .docx)
    file: PathBuf,

    /// Embed with a local Ollama server instead of the offline hasher
    #[arg(long)]
    ollama: bool,

    /// Number of chunks to retrieve per question
    #[arg(long)]
    top_k: Option<usize>,

    /// Print answers as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askdoc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = RagConfig::default();
    if let Some(top_k) = cli.top_k {
        config.retrieval.top_k = top_k;
    }

    let embedder: Arc<dyn EmbeddingProvider> = if cli.ollama {
        let embedder = OllamaEmbedder::new(&config.embeddings);
        if !embedder.health_check().await.unwrap_or(false) {
            tracing::warn!("Ollama not reachable at {}", config.embeddings.base_url);
            tracing::warn!("  1. Start it: ollama serve");
            tracing::warn!("  2. Pull the model: ollama pull {}", config.embeddings.model);
        }
        Arc::new(embedder)
    } else {
        Arc::new(HashingEmbedder::new(config.embeddings.dimensions))
    };

    let min_confidence = config.extraction.min_confidence;
    let mut pipeline = RagPipeline::new(config, embedder, Arc::new(LexicalAnswerModel::new()))?;

    let data = std::fs::read(&cli.file)?;
    let filename = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = Document::from_file_bytes(filename, data)?;

    let report = pipeline.ingest(&document).await?;
    println!(
        "Ingested {} ({}): {} chunks from {} characters",
        report.filename,
        report.format.display_name(),
        report.chunks_indexed,
        report.characters,
    );
    println!("Ask a question (empty line to quit):");

    let stdin = io::stdin();
    loop {
        print!("? ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            break;
        }

        match pipeline.ask(question).await {
            Ok(answer) if cli.json => println!("{}", serde_json::to_string_pretty(&answer)?),
            Ok(answer) => {
                println!("{}", answer.text);
                let flag = if answer.confidence < min_confidence {
                    " (low confidence)"
                } else {
                    ""
                };
                match answer.source_chunk_id {
                    Some(chunk) => println!(
                        "  [confidence {:.2}{flag}, chunk {chunk}]",
                        answer.confidence
                    ),
                    None => println!("  [no source]"),
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

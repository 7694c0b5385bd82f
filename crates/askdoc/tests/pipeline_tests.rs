//! End-to-end pipeline tests against the deterministic local models

use askdoc::config::RagConfig;
use askdoc::error::Error;
use askdoc::pipeline::RagPipeline;
use askdoc::types::{Document, DocumentFormat};

fn text_document(name: &str, content: &str) -> Document {
    Document::new(name, DocumentFormat::Text, content.as_bytes().to_vec())
}

fn local_pipeline() -> RagPipeline {
    RagPipeline::with_local_models(RagConfig::default()).unwrap()
}

#[tokio::test]
async fn ingest_then_ask_returns_verbatim_answer() {
    let mut pipeline = local_pipeline();

    let report = pipeline
        .ingest(&text_document(
            "france.txt",
            "The capital of France is Paris.",
        ))
        .await
        .unwrap();
    assert_eq!(report.chunks_indexed, 1);
    assert!(pipeline.is_ready());

    let answer = pipeline
        .ask("What is the capital of France?")
        .await
        .unwrap();

    assert_eq!(answer.text, "Paris");
    assert!(answer.confidence > 0.5);
    assert_eq!(answer.source_chunk_id, Some(0));
}

#[tokio::test]
async fn ask_on_empty_pipeline_fails_with_not_ready() {
    let pipeline = local_pipeline();
    assert!(matches!(
        pipeline.ask("What is anything?").await,
        Err(Error::NotReady)
    ));
}

#[tokio::test]
async fn empty_document_answers_with_sentinel() {
    let mut pipeline = local_pipeline();

    let report = pipeline.ingest(&text_document("empty.txt", "")).await.unwrap();
    assert_eq!(report.chunks_indexed, 0);
    assert!(pipeline.is_ready());

    let answer = pipeline.ask("What does the document say?").await.unwrap();
    assert!(answer.is_no_answer());
    assert_eq!(answer.confidence, 0.0);
}

#[tokio::test]
async fn second_ingest_fully_replaces_the_index() {
    let mut pipeline = local_pipeline();

    pipeline
        .ingest(&text_document(
            "first.txt",
            "The secret launch codeword is zugzwang.",
        ))
        .await
        .unwrap();

    let answer = pipeline.ask("What is the launch codeword?").await.unwrap();
    assert!(answer.text.contains("zugzwang"));

    pipeline
        .ingest(&text_document(
            "second.txt",
            "Sourdough bread needs flour, water, and salt.",
        ))
        .await
        .unwrap();

    // content unique to the first document must no longer be retrievable
    let answer = pipeline.ask("What is the launch codeword?").await.unwrap();
    assert!(!answer.text.contains("zugzwang"));
}

#[tokio::test]
async fn answer_straddling_a_chunk_boundary_is_still_found() {
    let mut config = RagConfig::default();
    config.chunking.chunk_size = 100;
    config.chunking.overlap = 50;
    config.chunking.snap_to_whitespace = false;
    let mut pipeline = RagPipeline::with_local_models(config).unwrap();

    // 150 chars of padding puts the fact sentence right on a chunk boundary;
    // the overlap guarantees some chunk still holds it in full
    let padding = "Pad. ".repeat(30);
    let content = format!("{padding}The tallest mountain on Earth is Everest. {padding}");
    pipeline
        .ingest(&text_document("mountains.txt", &content))
        .await
        .unwrap();

    let answer = pipeline
        .ask("What is the tallest mountain on Earth?")
        .await
        .unwrap();

    assert_eq!(answer.text, "Everest");
    assert!(answer.source_chunk_id.is_some());
}

#[tokio::test]
async fn asking_twice_is_deterministic() {
    let mut pipeline = local_pipeline();
    pipeline
        .ingest(&text_document(
            "rust.txt",
            "Rust was first released in 2015. The borrow checker enforces memory safety.",
        ))
        .await
        .unwrap();

    let first = pipeline.ask("When was Rust released?").await.unwrap();
    let second = pipeline.ask("When was Rust released?").await.unwrap();

    assert_eq!(first.text, second.text);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.source_chunk_id, second.source_chunk_id);
}

#[tokio::test]
async fn unsupported_extension_fails_before_parsing() {
    assert!(matches!(
        Document::from_file_bytes("slides.pptx", b"PK".to_vec()),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn corrupt_text_fails_and_pipeline_stays_empty() {
    let mut pipeline = local_pipeline();
    let corrupt = Document::new("bad.txt", DocumentFormat::Text, vec![0xc3, 0x28]);

    assert!(matches!(
        pipeline.ingest(&corrupt).await,
        Err(Error::CorruptFile { .. })
    ));
    assert!(!pipeline.is_ready());
    assert!(matches!(pipeline.ask("anything?").await, Err(Error::NotReady)));
}

#[tokio::test]
async fn degenerate_chunking_config_fails_for_empty_input_too() {
    let mut config = RagConfig::default();
    config.chunking.chunk_size = 10;
    config.chunking.overlap = 10;

    assert!(matches!(
        RagPipeline::with_local_models(config),
        Err(Error::InvalidConfiguration(_))
    ));
}

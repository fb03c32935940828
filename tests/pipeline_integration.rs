//! End-to-end pipeline tests against a mocked completion provider

use mockito::Matcher;
use secrecy::SecretString;
use serde_json::json;
use std::sync::{Arc, Mutex};
use text_summarizer::{
    config::ProviderConfig,
    llm::CompletionClient,
    pipeline::{
        ChunkOutcome, Creativity, OutputFormat, ProgressEvent, Strategy, SummaryLength,
        SummaryOptions, SummaryPipeline, TokenBudget, Tokenizer,
    },
    SummaryError,
};

fn provider(url: String) -> ProviderConfig {
    ProviderConfig {
        base_url: Some(url),
        api_key: Some(SecretString::new("integration-key".to_string())),
        timeout_secs: 5,
        offline: false,
    }
}

fn small_budget() -> TokenBudget {
    TokenBudget {
        token_threshold: 100,
        chunk_target_tokens: 60,
        chunk_overlap_tokens: 5,
    }
}

fn words(count: usize) -> String {
    (0..count)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

fn chat_body(content: &str) -> String {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
}

#[tokio::test]
async fn test_direct_summary_through_provider() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .match_header("authorization", "Bearer integration-key")
        .match_body(Matcher::PartialJson(json!({"model": "llama3", "temperature": 0.5})))
        .with_status(200)
        .with_body(chat_body("Короткое резюме."))
        .expect(1)
        .create_async()
        .await;

    let client = CompletionClient::new(provider(format!("{}/chat", server.url()))).unwrap();
    let pipeline =
        SummaryPipeline::new(Tokenizer::cl100k(), Arc::new(client), TokenBudget::default()).unwrap();

    let summary = pipeline
        .summarize(
            "Rust is a systems programming language focused on safety and speed.",
            &SummaryOptions::default(),
            "llama3",
            &|_: &ProgressEvent| {},
        )
        .await
        .unwrap();

    assert_eq!(summary.strategy, Strategy::Direct);
    assert_eq!(summary.text, "Короткое резюме.");
    assert!(!summary.is_placeholder());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chunked_summary_skips_failed_chunk() {
    let mut server = mockito::Server::new_async().await;

    // Intermediate calls run at temperature 0.2; the final one at 0.8
    let first = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"temperature": 0.2})),
            Matcher::Regex("word5 ".to_string()),
        ]))
        .with_status(200)
        .with_body(chat_body("first"))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"temperature": 0.2})),
            Matcher::Regex("word100 ".to_string()),
        ]))
        .with_status(500)
        .with_body("boom")
        .expect(1)
        .create_async()
        .await;
    let third = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"temperature": 0.2})),
            Matcher::Regex("word140 ".to_string()),
        ]))
        .with_status(200)
        .with_body(json!({"result": {"summary": "third"}}).to_string())
        .expect(1)
        .create_async()
        .await;
    let last = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"temperature": 0.8})),
            Matcher::Regex(r"first\\n\\n---\\n\\nthird".to_string()),
        ]))
        .with_status(200)
        .with_body(json!({"response": {"content": "final summary"}}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = CompletionClient::new(provider(server.url())).unwrap();
    let pipeline =
        SummaryPipeline::new(Tokenizer::word_based(), Arc::new(client), small_budget()).unwrap();

    let events = Mutex::new(Vec::new());
    let observer = |event: &ProgressEvent| events.lock().unwrap().push(event.clone());
    let options = SummaryOptions::new(SummaryLength::Long, OutputFormat::Html, Creativity::High);

    let summary = pipeline
        .summarize(&words(150), &options, "llama3", &observer)
        .await
        .unwrap();

    assert_eq!(summary.text, "final summary");
    assert_eq!(summary.strategy, Strategy::Chunked);
    assert_eq!(summary.chunk_count, 3);
    assert_eq!(summary.used_chunks, 2);
    assert_eq!(summary.warnings.len(), 1);
    assert!(summary.warnings[0].contains("HTTP 500"));

    let failed: Vec<_> = events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::ChunkFinished {
                index,
                outcome: ChunkOutcome::Failed(_),
                ..
            } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec![1]);

    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
    last.assert_async().await;
}

#[tokio::test]
async fn test_unexpected_shape_on_direct_path() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"foo":1}"#)
        .create_async()
        .await;

    let client = CompletionClient::new(provider(server.url())).unwrap();
    let pipeline =
        SummaryPipeline::new(Tokenizer::word_based(), Arc::new(client), TokenBudget::default()).unwrap();

    let err = pipeline
        .summarize("a short text", &SummaryOptions::default(), "m", &|_: &ProgressEvent| {})
        .await
        .unwrap_err();

    assert!(matches!(err, SummaryError::UnexpectedShape { .. }));
    assert!(err.to_string().contains(r#"{"foo":1}"#));
}

#[tokio::test]
async fn test_offline_pipeline_returns_placeholder() {
    let client = CompletionClient::new(ProviderConfig {
        offline: true,
        ..ProviderConfig::default()
    })
    .unwrap();
    let pipeline =
        SummaryPipeline::new(Tokenizer::word_based(), Arc::new(client), small_budget()).unwrap();

    let summary = pipeline
        .summarize(&words(150), &SummaryOptions::default(), "llama3", &|_: &ProgressEvent| {})
        .await
        .unwrap();

    assert_eq!(summary.strategy, Strategy::Chunked);
    assert!(summary.is_placeholder());
    assert!(summary.text.starts_with("[PLACEHOLDER LLM] Summary for: '[PLACEHOLDER LLM (intermediate)]"));
}

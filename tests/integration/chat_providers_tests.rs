/*!
 * Integration tests for chat transports against a local mock server
 */

use std::sync::Arc;

use mockito::{Matcher, Server};
use serde_json::json;

use mtengines::app_config::{EngineConfig, EngineKind};
use mtengines::catalog::ModelInfo;
use mtengines::engine_factory::create_llm_engine;
use mtengines::engines::{LlmEngine, LlmProfile, MtEngine};
use mtengines::errors::{EngineError, ProviderError};
use mtengines::providers::anthropic::Anthropic;
use mtengines::providers::openai::OpenAI;
use mtengines::providers::{ChatPrompt, ChatProvider};
use crate::common::element;

#[tokio::test]
async fn test_openai_chat_shouldSendBearerAndMessages() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/chat/completions")
        .match_header("Authorization", "Bearer sk-test")
        .match_body(Matcher::Json(json!({
            "model": "gpt-4",
            "messages": [
                {"role": "system", "content": "Be brief"},
                {"role": "user", "content": "Hi"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}],"usage":{"prompt_tokens":5,"completion_tokens":2}}"#)
        .create_async()
        .await;

    let client = OpenAI::new("sk-test", server.url());
    let prompt = ChatPrompt::new("gpt-4")
        .add_message("system", "Be brief")
        .add_message("user", "Hi");
    assert_eq!(client.chat(prompt).await.unwrap(), "Hello!");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_chat_withNoChoices_shouldBeParseError() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let client = OpenAI::new("sk-test", server.url()).vendor("Mistral");
    let error = client.chat(ChatPrompt::new("m").add_message("user", "Hi")).await.unwrap_err();
    assert!(matches!(error, ProviderError::ParseError(_)));
    assert!(error.to_string().contains("Mistral"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_chat_withRateLimit_shouldBeApiError() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
        .create_async()
        .await;

    let client = OpenAI::new("sk-test", server.url());
    let error = client.chat(ChatPrompt::new("m").add_message("user", "Hi")).await.unwrap_err();
    match error {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 429);
            assert!(message.contains("Rate limit reached"));
        }
        other => panic!("Unexpected error: {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_listModels_shouldPreferDisplayName() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/models")
        .match_header("Authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"id":"mistral-large-latest","name":"Mistral Large"},{"id":"open-mistral-nemo"}]}"#)
        .create_async()
        .await;

    let client = OpenAI::new("sk-test", server.url());
    let models = client.list_models().await.unwrap();
    assert_eq!(models, vec![
        ModelInfo::new("mistral-large-latest", "Mistral Large"),
        ModelInfo::new("open-mistral-nemo", "open-mistral-nemo"),
    ]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_chat_shouldMoveSystemMessageAndSendHeaders() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/v1/messages")
        .match_header("x-api-key", "ak-test")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-3-5-sonnet-20241022",
            "system": "Be brief",
            "messages": [{"role": "user", "content": "Hi"}],
            "max_tokens": 1024
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":[{"type":"text","text":"Hello"},{"type":"tool_use","id":"x"},{"type":"text","text":"!"}],"usage":{"input_tokens":3,"output_tokens":2}}"#)
        .create_async()
        .await;

    let client = Anthropic::new("ak-test", server.url());
    let prompt = ChatPrompt::new("claude-3-5-sonnet-20241022")
        .add_message("system", "Be brief")
        .add_message("user", "Hi");
    assert_eq!(client.chat(prompt).await.unwrap(), "Hello!");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_chat_withoutUsage_shouldStillReadText() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":[{"type":"text","text":"Hallo"}]}"#)
        .create_async()
        .await;

    let client = Anthropic::new("ak-test", server.url());
    let prompt = ChatPrompt::new("m").add_message("user", "Hello");
    assert_eq!(client.chat(prompt).await.unwrap(), "Hallo");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_chat_shouldNotSendTemperature() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/chat/completions")
        .match_body(Matcher::Json(json!({
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Hi"}],
            "max_tokens": 64
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#)
        .create_async()
        .await;

    let client = OpenAI::new("sk-test", server.url());
    let prompt = ChatPrompt::new("gpt-4").add_message("user", "Hi").max_tokens(64);
    assert_eq!(client.chat(prompt).await.unwrap(), "Hello");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_chat_withBadKey_shouldBeAuthenticationError() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/v1/messages")
        .with_status(401)
        .with_body(r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#)
        .create_async()
        .await;

    let client = Anthropic::new("bad", server.url());
    let error = client.chat(ChatPrompt::new("m").add_message("user", "Hi")).await.unwrap_err();
    assert!(matches!(error, ProviderError::AuthenticationError(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_listModels_shouldReadDisplayNames() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/v1/models")
        .match_header("x-api-key", "ak-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"type":"model","id":"claude-3-haiku-20240307","display_name":"Claude Haiku 3"}],"has_more":false}"#)
        .create_async()
        .await;

    let client = Anthropic::new("ak-test", server.url());
    let models = client.list_models().await.unwrap();
    assert_eq!(models, vec![ModelInfo::new("claude-3-haiku-20240307", "Claude Haiku 3")]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_llmEngine_overOpenAiTransport_shouldNormalizeMatch() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "mistral-large-latest"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "```xml\n<target>Bonjour <ph id=\"1\"/></target>\n```"}}]
        }).to_string())
        .create_async()
        .await;

    let provider: Arc<dyn ChatProvider> = Arc::new(OpenAI::new("key", server.url()).vendor("Mistral"));
    let mut engine = LlmEngine::new(LlmProfile::mistral(), provider).with_model("mistral-large-latest");
    engine.set_source_language("en");
    engine.set_target_language("fr");

    let source = element(r#"<source xml:space="preserve">Hello <ph id="1"/></source>"#);
    let record = engine.get_mt_match(&source, &[]).await.unwrap();
    assert_eq!(
        record.target().to_string(),
        r#"<target xml:space="preserve">Bonjour <ph id="1"/></target>"#
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_llmEngine_withServerError_shouldBeTransportError() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/v1/messages")
        .with_status(529)
        .with_body("Overloaded")
        .create_async()
        .await;

    let provider: Arc<dyn ChatProvider> = Arc::new(Anthropic::new("key", server.url()));
    let mut engine = LlmEngine::new(LlmProfile::anthropic(), provider);
    engine.set_source_language("en");
    engine.set_target_language("de");

    let error = engine.translate("Hello").await.unwrap_err();
    assert!(matches!(error, EngineError::Transport(ProviderError::ApiError { status_code: 529, .. })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_createLlmEngine_withEndpoint_shouldListModelsFromIt() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/models")
        .match_header("Authorization", "Bearer mk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"id":"mistral-small-latest"}]}"#)
        .create_async()
        .await;

    let mut settings = EngineConfig::new(EngineKind::Mistral);
    settings.api_key = "mk-test".to_string();
    settings.endpoint = server.url();

    let engine = create_llm_engine(EngineKind::Mistral, &settings).unwrap();
    let models = engine.available_models().await.unwrap();
    assert_eq!(models, vec![ModelInfo::new("mistral-small-latest", "mistral-small-latest")]);
    mock.assert_async().await;
}

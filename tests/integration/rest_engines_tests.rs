/*!
 * Integration tests for REST engines against a local mock server
 */

use mockito::{Matcher, Server};
use serde_json::json;

use mtengines::engines::{MtEngine, RestEngine, RestVendor};
use mtengines::errors::{EngineError, ProviderError};
use mtengines::match_record::TerminologyPair;
use mtengines::vendors::{Azure, DeepL, Google, ModernMT, Yandex};
use mtengines::vendors::deepl::FREE_ENDPOINT;
use crate::common::element;

fn engine<V: RestVendor>(vendor: V, server: &Server) -> RestEngine<V> {
    let mut engine = RestEngine::new(vendor, "test-key").with_endpoint(server.url());
    engine.set_source_language("en");
    engine.set_target_language("fr");
    engine
}

#[tokio::test]
async fn test_azure_translate_shouldSendKeyRegionAndPair() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/translate")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api-version".into(), "3.0".into()),
            Matcher::UrlEncoded("from".into(), "en".into()),
            Matcher::UrlEncoded("to".into(), "fr".into()),
        ]))
        .match_header("Ocp-Apim-Subscription-Key", "test-key")
        .match_header("Ocp-Apim-Subscription-Region", "westeurope")
        .match_body(Matcher::Json(json!([{ "Text": "Hello" }])))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"translations":[{"text":"Bonjour","to":"fr"}]}]"#)
        .create_async()
        .await;

    let engine = engine(Azure::with_region("westeurope"), &server);
    assert_eq!(engine.translate("Hello").await.unwrap(), "Bonjour");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_azure_getMtMatch_shouldBuildTextOnlyTarget() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/translate")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!([{ "Text": "Click here" }])))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"translations":[{"text":"Cliquez <ici>","to":"fr"}]}]"#)
        .create_async()
        .await;

    let engine = engine(Azure::new(), &server);
    assert!(!engine.handles_tags());
    let source = element(r#"<source xml:space="preserve">Click <pc id="1">here</pc></source>"#);
    let record = engine.get_mt_match(&source, &[TerminologyPair::new("here", "ici")]).await.unwrap();

    assert_eq!(record.target().to_string(), "<target>Cliquez &lt;ici&gt;</target>");
    assert_eq!(record.origin(), "Azure");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_azure_languages_shouldReturnTranslationKeys() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/languages")
        .match_query(Matcher::UrlEncoded("scope".into(), "translation".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translation":{"de":{"name":"German"},"fr":{"name":"French"}}}"#)
        .create_async()
        .await;

    let engine = engine(Azure::new(), &server);
    let mut languages = engine.source_languages().await.unwrap();
    languages.sort();
    assert_eq!(languages, vec!["de", "fr"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_google_translate_shouldDecodeNumericEntities() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "test-key".into()),
            Matcher::UrlEncoded("q".into(), "The tree's leaf".into()),
            Matcher::UrlEncoded("source".into(), "en".into()),
            Matcher::UrlEncoded("target".into(), "fr".into()),
            Matcher::UrlEncoded("model".into(), "base".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"translations":[{"translatedText":"La feuille de l&#39;arbre"}]}}"#)
        .create_async()
        .await;

    let engine = engine(Google::new(false), &server);
    assert_eq!(engine.translate("The tree's leaf").await.unwrap(), "La feuille de l'arbre");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_google_targetLanguages_shouldReadDataLanguages() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/languages")
        .match_query(Matcher::UrlEncoded("model".into(), "nmt".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"languages":[{"language":"af"},{"language":"zh-TW"}]}}"#)
        .create_async()
        .await;

    let engine = engine(Google::default(), &server);
    assert_eq!(engine.target_languages().await.unwrap(), vec!["af", "zh-TW"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_yandex_translate_shouldSendApiKeyAndBody() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/translate")
        .match_header("Authorization", "Api-Key test-key")
        .match_body(Matcher::Json(json!({
            "texts": ["Hello"],
            "targetLanguageCode": "fr",
            "sourceLanguageCode": "en",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translations":[{"text":"Bonjour"}]}"#)
        .create_async()
        .await;

    let engine = engine(Yandex::default(), &server);
    assert_eq!(engine.translate("Hello").await.unwrap(), "Bonjour");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_yandex_languages_shouldNotCallServer() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let engine = engine(Yandex::default(), &server);
    let sources = engine.source_languages().await.unwrap();
    assert!(sources.contains(&"ru".to_string()));
    assert!(sources.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(engine.vendor().directions().len(), mtengines::catalog::DirectionTable::yandex().directions().len());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_deepl_getMtMatch_shouldTranslateMarkupAndKeepSpace() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/v2/translate")
        .match_header("Authorization", "DeepL-Auth-Key test-key")
        .match_body(Matcher::PartialJson(json!({
            "text": [r#"Click <pc id="1">here</pc>"#],
            "tag_handling": "xml",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translations":[{"detected_source_language":"EN","text":"Cliquez <pc id=\"1\">ici</pc>"}]}"#)
        .create_async()
        .await;

    let engine = engine(DeepL::new(), &server);
    assert!(engine.handles_tags());
    let source = element(r#"<source xml:space="preserve">Click <pc id="1">here</pc></source>"#);
    let record = engine.get_mt_match(&source, &[]).await.unwrap();

    assert_eq!(
        record.target().to_string(),
        r#"<target xml:space="preserve">Cliquez <pc id="1">ici</pc></target>"#
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_deepl_translate_withPlainText_shouldOmitTagHandling() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/v2/translate")
        .match_body(Matcher::Json(json!({
            "text": ["Tom & Jerry <3"],
            "source_lang": "en",
            "target_lang": "fr",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translations":[{"detected_source_language":"EN","text":"Tom & Jerry <3"}]}"#)
        .create_async()
        .await;

    let engine = engine(DeepL::new(), &server);
    assert_eq!(engine.translate("Tom & Jerry <3").await.unwrap(), "Tom & Jerry <3");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_deepl_translate_withForbidden_shouldBeAuthenticationError() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/v2/translate")
        .with_status(403)
        .with_body("Wrong endpoint")
        .create_async()
        .await;

    let engine = engine(DeepL::new(), &server);
    let error = engine.translate("Hello").await.unwrap_err();
    assert!(matches!(error, EngineError::Transport(ProviderError::AuthenticationError(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_deepl_translate_withEmptyTranslations_shouldBeMalformedResponse() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/v2/translate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"translations":[]}"#)
        .create_async()
        .await;

    let engine = engine(DeepL::new(), &server);
    let error = engine.translate("Hello").await.unwrap_err();
    assert!(matches!(error, EngineError::MalformedResponse(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_deepl_sourceLanguages_shouldAskForSourceType() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/v2/languages")
        .match_query(Matcher::UrlEncoded("type".into(), "source".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"language":"DE","name":"German"},{"language":"EN","name":"English"}]"#)
        .create_async()
        .await;

    let engine = engine(DeepL::new(), &server);
    assert_eq!(engine.source_languages().await.unwrap(), vec!["DE", "EN"]);
    mock.assert_async().await;
}

#[test]
fn test_deepl_withFreeKey_shouldUseFreeEndpoint() {
    let engine = RestEngine::new(DeepL::new(), "abc:fx");
    assert_eq!(engine.endpoint(), FREE_ENDPOINT);
}

#[tokio::test]
async fn test_modernmt_translate_shouldUnwrapEnvelope() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/translate")
        .match_header("MMT-ApiKey", "test-key")
        .match_header("X-HTTP-Method-Override", "GET")
        .match_body(Matcher::Json(json!({"source": "en", "target": "fr", "q": "Hello"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":200,"data":{"translation":"Bonjour"}}"#)
        .create_async()
        .await;

    let engine = engine(ModernMT::new(), &server);
    assert_eq!(engine.translate("Hello").await.unwrap(), "Bonjour");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_modernmt_translate_withErrorEnvelope_shouldBeTransportError() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/translate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":400,"error":{"type":"UnsupportedLanguageException","message":"Unsupported language"}}"#)
        .create_async()
        .await;

    let engine = engine(ModernMT::new(), &server);
    let error = engine.translate("Hello").await.unwrap_err();
    match error {
        EngineError::Transport(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 400);
            assert_eq!(message, "Unsupported language");
        }
        other => panic!("Unexpected error: {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_modernmt_languages_shouldBeSorted() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/translate/languages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":200,"data":["it","de","en"]}"#)
        .create_async()
        .await;

    let engine = engine(ModernMT::new(), &server);
    assert_eq!(engine.target_languages().await.unwrap(), vec!["de", "en", "it"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_translate_withoutLanguages_shouldFailWithoutRequest() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let engine = RestEngine::new(DeepL::new(), "test-key").with_endpoint(server.url());
    let error = engine.translate("Hello").await.unwrap_err();
    assert!(matches!(error, EngineError::InvalidState(_)));

    let error = engine.get_mt_match(&element("<source>Hello</source>"), &[]).await.unwrap_err();
    assert!(matches!(error, EngineError::InvalidState(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_restEngine_fixOperations_shouldBeNotImplemented() {
    let server = Server::new_async().await;
    let engine = engine(ModernMT::new(), &server);
    assert!(!engine.fixes_matches());
    assert!(!engine.fixes_tags());

    let source = element("<source>a</source>");
    let target = element("<target>b</target>");
    let error = engine.fix_tags(&source, &target).await.unwrap_err();
    assert!(matches!(error, EngineError::NotImplemented(_)));
    let error = engine.fix_match(&source, &source, &target).await.unwrap_err();
    assert!(matches!(error, EngineError::NotImplemented(_)));
}

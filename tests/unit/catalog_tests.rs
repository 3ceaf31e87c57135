/*!
 * Tests for the static language and model tables
 */

use mtengines::catalog::{DirectionTable, LanguageCatalog, ModelCatalog};

#[test]
fn test_directionTable_sources_shouldBeUniqueAndSorted() {
    let table = DirectionTable::new(vec![
        "ru-en".to_string(),
        "en-ru".to_string(),
        "en-de".to_string(),
    ]);
    assert_eq!(table.sources(), vec!["en", "ru"]);
    assert_eq!(table.targets(), vec!["de", "en", "ru"]);
}

#[test]
fn test_directionTable_yandex_shouldContainKnownPairs() {
    let table = DirectionTable::yandex();
    assert!(table.directions().iter().any(|pair| pair == "en-ru"));
    assert!(table.sources().contains(&"uk".to_string()));
}

#[test]
fn test_languageCatalog_default_shouldIncludeRegionalVariants() {
    let catalog = LanguageCatalog::default();
    assert!(catalog.codes().contains(&"pt-BR".to_string()));
    assert!(catalog.codes().contains(&"en".to_string()));
}

#[test]
fn test_modelCatalog_alibabaRegion_shouldIgnoreCase() {
    let catalog = ModelCatalog::default();
    let region = catalog.alibaba_region("singapore").unwrap();
    assert_eq!(region.base_url, "https://dashscope-intl.aliyuncs.com/compatible-mode/v1");
    assert!(catalog.alibaba_region("Mars").is_none());
}

#[test]
fn test_modelCatalog_alibabaModels_shouldFollowRegion() {
    let catalog = ModelCatalog::default();
    let virginia: Vec<String> = catalog.alibaba_models("Virginia").unwrap()
        .into_iter()
        .map(|model| model.id)
        .collect();
    assert_eq!(virginia, vec!["qwen-mt-plus", "qwen-mt-flash", "qwen-mt-lite"]);
    assert!(catalog.alibaba_models("Mars").is_none());
}

#[test]
fn test_modelCatalog_anthropic_shouldBeSortedById() {
    let catalog = ModelCatalog::default();
    let ids: Vec<&str> = catalog.anthropic.iter().map(|model| model.id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert!(ids.contains(&"claude-3-5-sonnet-20241022"));
}

#[test]
fn test_modelCatalog_anthropic_shouldListEveryClaude3Model() {
    let catalog = ModelCatalog::default();
    for id in ["claude-3-haiku-20240307", "claude-3-sonnet-20240229", "claude-3-opus-20240229"] {
        assert!(catalog.anthropic.iter().any(|model| model.id == id), "missing {}", id);
    }
}

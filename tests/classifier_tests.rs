use std::sync::Arc;

use honeylab::adapter::outbound::classifier::{CachedClassifier, LlmClassifier, PatternClassifier};
use honeylab::domain::{AssetRegistry, Tone, UNKNOWN_TICKER};
use honeylab::port::outbound::classifier::TitleClassifier;
use honeylab::testkit::cache::MemoryCache;
use honeylab::testkit::domain::video;
use honeylab::testkit::llm::ScriptedLlm;

const MODEL_ANSWER: &str = r#"```json
{
  "assets": [
    {"asset": "Samsung", "matchedText": "삼성전자", "confidence": 0.9, "reasoning": "종목명"},
    {"asset": "Dogecoin", "matchedText": "도지", "reasoning": "밈코인"}
  ],
  "tone": {"tone": "negative", "keywords": ["팔아라"], "reasoning": "매도 권유"}
}
```"#;

fn registry() -> Arc<AssetRegistry> {
    Arc::new(AssetRegistry::builtin())
}

#[tokio::test]
async fn pattern_classifier_reads_korean_titles() {
    let classifier = PatternClassifier::new(&registry()).unwrap();

    let result = classifier
        .classify(&video("v1", "엔비디아 신고가 돌파, 지금 매수 기회"))
        .await;

    assert_eq!(result.detected_assets.len(), 1);
    assert_eq!(result.detected_assets[0].asset, "Nvidia");
    assert_eq!(result.tone(), Tone::Positive);
    assert!(result.is_actionable());
}

#[tokio::test]
async fn model_answer_maps_onto_registry() {
    let classifier = LlmClassifier::new(Arc::new(ScriptedLlm::new(MODEL_ANSWER)), registry());

    let result = classifier
        .classify(&video("v1", "삼성전자 도지 지금 팔아라"))
        .await;

    assert!(!result.degraded);
    assert_eq!(result.tone(), Tone::Negative);
    assert_eq!(result.detected_assets[0].ticker, "005930.KS");
    assert_eq!(result.detected_assets[1].ticker, UNKNOWN_TICKER);
    assert!((result.detected_assets[1].confidence - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn cache_hit_skips_the_model() {
    let llm = Arc::new(ScriptedLlm::new(MODEL_ANSWER));
    let cache = Arc::new(MemoryCache::new());
    let classifier = CachedClassifier::new(
        Arc::new(LlmClassifier::new(llm.clone(), registry())),
        cache.clone(),
    );
    let v = video("v1", "삼성전자 지금 팔아라");

    let first = classifier.classify(&v).await;
    let second = classifier.classify(&v).await;

    assert_eq!(llm.calls(), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_model_call_is_not_cached() {
    let llm = Arc::new(ScriptedLlm::failing());
    let cache = Arc::new(MemoryCache::new());
    let classifier = CachedClassifier::new(
        Arc::new(LlmClassifier::new(llm.clone(), registry())),
        cache.clone(),
    );
    let v = video("v1", "비트코인 폭등");

    let first = classifier.classify(&v).await;
    classifier.classify(&v).await;

    assert!(first.degraded);
    assert_eq!(first.tone(), Tone::Neutral);
    assert!(first.detected_assets.is_empty());
    assert!(cache.is_empty());
    assert_eq!(llm.calls(), 2);
}

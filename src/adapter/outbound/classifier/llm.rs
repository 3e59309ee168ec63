//! Model-backed classifier.
//!
//! Sends the title to a language model with a fixed instruction and maps the
//! structured answer onto the asset registry. Every transport or parse
//! failure degrades to [`ClassificationResult::fallback`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{
    AssetRegistry, ClassificationMethod, ClassificationResult, DetectedAsset, Tone, ToneAnalysis,
    Video, UNKNOWN_TICKER,
};
use crate::error::{Error, Result};
use crate::port::outbound::classifier::TitleClassifier;
use crate::port::outbound::llm::Llm;

/// Confidence assumed when the model omits one.
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// LLM-powered title classifier.
pub struct LlmClassifier {
    llm: Arc<dyn Llm>,
    registry: Arc<AssetRegistry>,
    system_prompt: String,
}

impl LlmClassifier {
    pub fn new(llm: Arc<dyn Llm>, registry: Arc<AssetRegistry>) -> Self {
        let system_prompt = build_system_prompt(&registry);
        Self {
            llm,
            registry,
            system_prompt,
        }
    }

    /// Classify a bare title.
    pub async fn analyze(&self, title: &str) -> ClassificationResult {
        let model = self.llm.model().to_string();
        let prompt = format!("영상 제목: \"{title}\"");

        let response = match self.llm.complete(&self.system_prompt, &prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(provider = self.llm.name(), error = %e, "LLM classification failed");
                return ClassificationResult::fallback(
                    ClassificationMethod::Llm,
                    Some(model),
                    format!("model call failed: {e}"),
                );
            }
        };

        match self.parse_response(&response, model.clone()) {
            Ok(result) => {
                debug!(
                    provider = self.llm.name(),
                    assets = result.detected_assets.len(),
                    tone = %result.tone(),
                    "LLM classification complete"
                );
                result
            }
            Err(e) => {
                warn!(provider = self.llm.name(), error = %e, "unparseable LLM response");
                ClassificationResult::fallback(
                    ClassificationMethod::Llm,
                    Some(model),
                    format!("unparseable model response: {e}"),
                )
            }
        }
    }

    fn parse_response(&self, response: &str, model: String) -> Result<ClassificationResult> {
        let json_str = extract_json(response)?;
        let parsed: LlmResponse = serde_json::from_str(json_str)
            .map_err(|e| Error::Parse(format!("Invalid JSON: {e}")))?;

        let detected_assets = parsed
            .assets
            .into_iter()
            .map(|raw| self.map_asset(raw))
            .collect();

        let tone = parsed.tone.unwrap_or_default();
        Ok(ClassificationResult {
            method: ClassificationMethod::Llm,
            model: Some(model),
            classified_at: Utc::now(),
            detected_assets,
            tone_analysis: ToneAnalysis::model(
                parse_tone(tone.tone.as_deref()),
                tone.keywords,
                tone.reasoning,
            ),
            degraded: false,
        })
    }

    /// Resolve the model's identifier against the registry. Unmapped
    /// identifiers keep their name and get the unknown ticker.
    fn map_asset(&self, raw: RawAsset) -> DetectedAsset {
        let (asset, ticker) = match self.registry.get(&raw.asset) {
            Some(def) => (def.label.clone(), def.ticker.clone()),
            None => {
                debug!(asset = %raw.asset, "model emitted an unregistered asset");
                (raw.asset, UNKNOWN_TICKER.to_string())
            }
        };
        DetectedAsset {
            asset,
            ticker,
            matched_text: raw.matched_text,
            confidence: raw
                .confidence
                .filter(|c| c.is_finite())
                .map_or(DEFAULT_CONFIDENCE, |c| c.clamp(0.0, 1.0)),
            reasoning: raw.reasoning,
        }
    }
}

#[async_trait]
impl TitleClassifier for LlmClassifier {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn classify(&self, video: &Video) -> ClassificationResult {
        self.analyze(&video.title).await
    }
}

fn build_system_prompt(registry: &AssetRegistry) -> String {
    let identifiers = registry.labels().join(", ");
    format!(
        r#"당신은 한국 경제/투자 유튜브 영상 제목을 분석합니다.

제목에서 다음 두 가지를 추출하세요.

1. 언급된 종목, 지수, 암호화폐, 섹터 (여러 개일 수 있음)
2. 제목의 전망 톤
   - positive: 상승, 매수, 기회 등 긍정적 전망
   - negative: 하락, 위험, 매도 등 부정적 전망
   - neutral: 판단 불가

JSON 객체 하나로만 답하세요:
{{
  "assets": [
    {{
      "asset": "영문 식별자",
      "matchedText": "제목에서 매칭된 텍스트",
      "confidence": 0.95,
      "reasoning": "추출 근거"
    }}
  ],
  "tone": {{
    "tone": "positive|negative|neutral",
    "keywords": ["판단에 사용된 키워드"],
    "reasoning": "톤 판단 근거"
  }}
}}

식별자는 다음 중에서 고르세요: {identifiers}
목록에 없는 대상이 명확하면 새 영문 식별자를 사용해도 됩니다."#
    )
}

/// Map the model's tone label; anything unrecognized is neutral.
fn parse_tone(label: Option<&str>) -> Tone {
    match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
        Some("positive" | "bullish") => Tone::Positive,
        Some("negative" | "bearish") => Tone::Negative,
        _ => Tone::Neutral,
    }
}

fn extract_json(text: &str) -> Result<&str> {
    // Find JSON in markdown code block or raw
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        let end = text[start..]
            .find("```")
            .map_or(text.len(), |i| start + i);
        Ok(text[start..end].trim())
    } else if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end < start {
            return Err(Error::Parse("No JSON found in response".into()));
        }
        Ok(&text[start..=end])
    } else {
        Err(Error::Parse("No JSON found in response".into()))
    }
}

#[derive(Deserialize)]
struct LlmResponse {
    #[serde(default)]
    assets: Vec<RawAsset>,
    #[serde(default)]
    tone: Option<RawTone>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAsset {
    asset: String,
    #[serde(default)]
    matched_text: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: String,
}

#[derive(Deserialize, Default)]
struct RawTone {
    #[serde(default)]
    tone: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    reasoning: String,
}

//! Narrative explanations of a risk outcome.
//!
//! [`ExplanationService`] tries the configured remote model first and always
//! falls back to [`TemplateExplainer`], so callers never see an error.

use tracing::{info, warn};

use crate::config::LlmSettings;
use crate::error::Result;
use crate::types::*;

const MAX_PROMPT_VARIANTS: usize = 5;

const CLOSING_ADVICE: &str = "Please discuss these findings with your healthcare provider before making any changes to your medication.";

/// Produces a human-readable summary of one outcome
pub trait Explainer: Send + Sync {
    fn explain(&self, drug: Drug, outcome: &RiskOutcome) -> Result<String>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Deterministic explanation built from the outcome fields alone
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, drug: Drug, outcome: &RiskOutcome) -> String {
        let risk = &outcome.risk_assessment;
        let profile = &outcome.pharmacogenomic_profile;
        let recommendation = &outcome.clinical_recommendation;

        let mut sentences = vec![
            format!(
                "Based on your genetic profile, your {} diplotype is {}, which indicates a {} ({}) status.",
                profile.primary_gene,
                profile.diplotype,
                profile.phenotype.full_name(),
                profile.phenotype
            ),
            format!(
                "This {} affects how your body processes {}, resulting in a '{}' risk classification (confidence {}).",
                severity_adverb(risk.severity),
                drug.title_case(),
                risk.risk_label,
                percent(risk.confidence_score)
            ),
            recommendation.dose_recommendation.clone(),
        ];
        if !recommendation.monitoring.is_empty() {
            sentences.push(format!("Monitoring guidance: {}", recommendation.monitoring));
        }
        sentences.push(CLOSING_ADVICE.to_string());

        sentences.join(" ")
    }
}

impl Explainer for TemplateExplainer {
    fn explain(&self, drug: Drug, outcome: &RiskOutcome) -> Result<String> {
        Ok(self.render(drug, outcome))
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

fn severity_adverb(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "critically",
        Severity::High => "significantly",
        Severity::Moderate => "moderately",
        Severity::Low => "minimally",
        Severity::None => "negligibly",
    }
}

fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

pub const SYSTEM_PROMPT: &str = "You are a clinical pharmacogenomics expert. \
Write a concise, jargon-free paragraph (3-5 sentences) that explains the patient's \
pharmacogenomic result, what it means for their drug therapy, and the key clinical \
action. Avoid bullet points. Address the patient and their clinician jointly. \
Be factual and evidence-based.";

/// Structured summary sent to the remote model
pub fn build_prompt(drug: Drug, outcome: &RiskOutcome) -> String {
    let risk = &outcome.risk_assessment;
    let profile = &outcome.pharmacogenomic_profile;
    let recommendation = &outcome.clinical_recommendation;

    let variants: Vec<String> = profile
        .detected_variants
        .iter()
        .take(MAX_PROMPT_VARIANTS)
        .map(|v| {
            format!(
                "{} ({} {}>{})",
                v.rsid.as_deref().unwrap_or("unknown rsID"),
                v.gene,
                v.reference,
                v.alt
            )
        })
        .collect();
    let variants = if variants.is_empty() {
        "No pharmacogenomic variants detected".to_string()
    } else {
        variants.join(", ")
    };

    format!(
        "Drug: {}\n\
         Primary Gene: {}\n\
         Diplotype: {}\n\
         Phenotype: {} ({})\n\
         Risk Label: {}  Severity: {}  Confidence: {}\n\
         Detected Variants: {}\n\
         Dose Recommendation: {}\n\
         Monitoring: {}\n\
         Rationale: {}\n\n\
         Please write the clinical explanation paragraph now.",
        drug,
        profile.primary_gene,
        profile.diplotype,
        recommendation.phenotype_full,
        profile.phenotype,
        risk.risk_label,
        risk.severity,
        percent(risk.confidence_score),
        variants,
        recommendation.dose_recommendation,
        recommendation.monitoring,
        recommendation.rationale
    )
}

#[cfg(feature = "http")]
pub use remote::LlmExplainer;

#[cfg(feature = "http")]
mod remote {
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    use super::{build_prompt, Explainer, SYSTEM_PROMPT};
    use crate::config::LlmSettings;
    use crate::error::{PgxError, Result};
    use crate::types::{Drug, RiskOutcome};

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<ChatChoice>,
    }

    #[derive(Deserialize)]
    struct ChatChoice {
        message: ChatMessage,
    }

    #[derive(Deserialize)]
    struct ChatMessage {
        content: Option<String>,
    }

    /// OpenAI-compatible chat-completions client
    pub struct LlmExplainer {
        settings: LlmSettings,
        client: reqwest::blocking::Client,
    }

    impl LlmExplainer {
        pub fn new(settings: LlmSettings) -> Result<Self> {
            if !settings.has_api_key() {
                return Err(PgxError::explanation("no API key configured"));
            }
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(settings.timeout_secs))
                .build()
                .map_err(|e| PgxError::explanation(format!("could not build HTTP client: {e}")))?;
            Ok(Self { settings, client })
        }

        pub fn endpoint(&self) -> String {
            format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
        }
    }

    impl Explainer for LlmExplainer {
        fn explain(&self, drug: Drug, outcome: &RiskOutcome) -> Result<String> {
            let payload = json!({
                "model": self.settings.model,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": build_prompt(drug, outcome) }
                ],
                "temperature": self.settings.temperature,
                "max_tokens": self.settings.max_tokens,
            });

            let response = self
                .client
                .post(self.endpoint())
                .bearer_auth(self.settings.api_key.as_deref().unwrap_or_default())
                .json(&payload)
                .send()
                .map_err(|e| {
                    if e.is_timeout() {
                        PgxError::explanation(format!(
                            "request timed out after {}s",
                            self.settings.timeout_secs
                        ))
                    } else {
                        PgxError::explanation(format!("request failed: {e}"))
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(PgxError::explanation(format!("HTTP error {}", status.as_u16())));
            }

            let body: ChatResponse = response
                .json()
                .map_err(|e| PgxError::explanation(format!("invalid response JSON: {e}")))?;
            body.choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .ok_or_else(|| PgxError::explanation("response contained no message content"))
        }

        fn name(&self) -> &'static str {
            "llm"
        }
    }
}

/// Remote explainer with template fallback; never fails
pub struct ExplanationService {
    primary: Option<Box<dyn Explainer>>,
    fallback: TemplateExplainer,
}

impl ExplanationService {
    /// Remote model when a key is configured and the `http` feature is on
    pub fn from_settings(settings: &LlmSettings) -> Self {
        if !settings.has_api_key() {
            info!("No LLM API key configured, using template explanations");
            return Self::template_only();
        }
        Self::remote(settings)
    }

    #[cfg(feature = "http")]
    fn remote(settings: &LlmSettings) -> Self {
        match LlmExplainer::new(settings.clone()) {
            Ok(explainer) => Self::with_explainer(Box::new(explainer)),
            Err(e) => {
                warn!("{}; using template explanations", e);
                Self::template_only()
            }
        }
    }

    #[cfg(not(feature = "http"))]
    fn remote(_settings: &LlmSettings) -> Self {
        warn!("Built without the http feature, using template explanations");
        Self::template_only()
    }

    pub fn template_only() -> Self {
        Self {
            primary: None,
            fallback: TemplateExplainer::new(),
        }
    }

    pub fn with_explainer(explainer: Box<dyn Explainer>) -> Self {
        Self {
            primary: Some(explainer),
            fallback: TemplateExplainer::new(),
        }
    }

    pub fn explain(&self, drug: Drug, outcome: &RiskOutcome) -> String {
        if let Some(primary) = &self.primary {
            match primary.explain(drug, outcome) {
                Ok(summary) => {
                    info!(
                        "{} explanation generated ({} chars)",
                        primary.name(),
                        summary.len()
                    );
                    return summary;
                }
                Err(e) => warn!("{} explanation failed: {}; using template", primary.name(), e),
            }
        }
        self.fallback.render(drug, outcome)
    }
}

impl Default for ExplanationService {
    fn default() -> Self {
        Self::template_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RiskRuleEngine;
    use crate::catalog::Catalog;
    use crate::error::PgxError;

    struct FailingExplainer;

    impl Explainer for FailingExplainer {
        fn explain(&self, _drug: Drug, _outcome: &RiskOutcome) -> Result<String> {
            Err(PgxError::explanation("HTTP error 429"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct CannedExplainer;

    impl Explainer for CannedExplainer {
        fn explain(&self, _drug: Drug, _outcome: &RiskOutcome) -> Result<String> {
            Ok("canned".to_string())
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    fn warfarin_outcome() -> RiskOutcome {
        let catalog = Catalog::standard();
        let variant = VariantInfo {
            gene: Gene::CYP2C9,
            chromosome: "10".to_string(),
            position: 96_741_053,
            reference: "C".to_string(),
            alt: "T".to_string(),
            rsid: Some("rs1799853".to_string()),
        };
        RiskRuleEngine::new(&catalog).assess(Drug::Warfarin, Gene::CYP2C9, vec![variant])
    }

    #[test]
    fn test_template_text() {
        let outcome = warfarin_outcome();
        let text = TemplateExplainer::new().render(Drug::Warfarin, &outcome);
        assert!(text.starts_with("Based on your genetic profile, your CYP2C9 diplotype is *2/*1"));
        assert!(text.contains("processes Warfarin"));
        assert!(text.contains(&outcome.clinical_recommendation.dose_recommendation));
        assert!(text.ends_with(CLOSING_ADVICE));
    }

    #[test]
    fn test_severity_adverbs() {
        assert_eq!(severity_adverb(Severity::Critical), "critically");
        assert_eq!(severity_adverb(Severity::None), "negligibly");
        assert_eq!(percent(0.92), "92%");
        assert_eq!(percent(0.5), "50%");
    }

    #[test]
    fn test_prompt_caps_variants() {
        let mut outcome = warfarin_outcome();
        let variant = outcome.pharmacogenomic_profile.detected_variants[0].clone();
        outcome.pharmacogenomic_profile.detected_variants = vec![variant; 8];
        let prompt = build_prompt(Drug::Warfarin, &outcome);
        assert_eq!(prompt.matches("rs1799853").count(), MAX_PROMPT_VARIANTS);

        outcome.pharmacogenomic_profile.detected_variants.clear();
        assert!(build_prompt(Drug::Warfarin, &outcome).contains("No pharmacogenomic variants detected"));
    }

    #[test]
    fn test_service_falls_back_on_error() {
        let outcome = warfarin_outcome();
        let service = ExplanationService::with_explainer(Box::new(FailingExplainer));
        assert_eq!(
            service.explain(Drug::Warfarin, &outcome),
            TemplateExplainer::new().render(Drug::Warfarin, &outcome)
        );

        let service = ExplanationService::with_explainer(Box::new(CannedExplainer));
        assert_eq!(service.explain(Drug::Warfarin, &outcome), "canned");
    }

    #[test]
    fn test_missing_key_uses_template() {
        let service = ExplanationService::from_settings(&LlmSettings::default());
        assert!(service.primary.is_none());
    }
}

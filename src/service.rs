//! End-to-end analysis of one VCF for one drug.

use std::path::Path;
use tracing::{info, warn};

use crate::analysis::RiskPipeline;
use crate::catalog::Catalog;
use crate::config::Limits;
use crate::error::{PgxError, Result};
use crate::explanation::ExplanationService;
use crate::extraction::MatchStrategy;
use crate::output::AnalysisReport;
use crate::parsers::{ParseResult, VcfReader};
use crate::types::Drug;

/// Validate, parse, assess and explain
///
/// A file that fails to parse yields a parse-failure report rather than an
/// error; only validation and gene lookup failures are returned as `Err`.
pub struct AnalysisService<'a> {
    catalog: &'a Catalog,
    limits: &'a Limits,
    explanations: &'a ExplanationService,
    strategy: MatchStrategy,
}

impl<'a> AnalysisService<'a> {
    pub fn new(catalog: &'a Catalog, limits: &'a Limits, explanations: &'a ExplanationService) -> Self {
        Self {
            catalog,
            limits,
            explanations,
            strategy: MatchStrategy::Auto,
        }
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn analyze_path(&self, path: &Path, patient_id: &str, drug: Drug) -> Result<AnalysisReport> {
        let patient_id = checked_patient_id(patient_id)?;
        self.limits.validate_file(path)?;
        info!(
            "Analyzing {} for patient={} drug={}",
            path.display(),
            patient_id,
            drug
        );
        self.finish(VcfReader::new().read_path(path), patient_id, drug)
    }

    pub fn analyze_bytes(&self, bytes: &[u8], patient_id: &str, drug: Drug) -> Result<AnalysisReport> {
        let patient_id = checked_patient_id(patient_id)?;
        if bytes.len() as u64 > self.limits.max_vcf_size_bytes() {
            return Err(PgxError::file_validation(format!(
                "VCF file exceeds maximum allowed size of {} MB",
                self.limits.max_vcf_size_mb
            )));
        }
        self.finish(VcfReader::new().read_bytes(bytes), patient_id, drug)
    }

    fn finish(&self, parsed: Result<ParseResult>, patient_id: &str, drug: Drug) -> Result<AnalysisReport> {
        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(PgxError::VcfParse { message }) => {
                warn!("VCF parse failed for patient {}: {}", patient_id, message);
                return Ok(AnalysisReport::parse_failure(patient_id, drug));
            }
            Err(e) => return Err(e),
        };

        let outcome = RiskPipeline::new(self.catalog)
            .with_strategy(self.strategy)
            .run(drug, &parsed.records)?;
        let summary = self.explanations.explain(drug, &outcome);

        info!(
            "Analysis complete: patient={} drug={} risk={} phenotype={}",
            patient_id,
            drug,
            outcome.risk_assessment.risk_label,
            outcome.pharmacogenomic_profile.phenotype
        );
        Ok(AnalysisReport::new(patient_id, drug, outcome, summary, &parsed))
    }
}

fn checked_patient_id(patient_id: &str) -> Result<&str> {
    let trimmed = patient_id.trim();
    if trimmed.is_empty() {
        return Err(PgxError::file_validation("patient_id must not be empty"));
    }
    Ok(trimmed)
}

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat, Utc};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use serde_json::to_string_pretty;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tera::Tera;

use crate::parsers::ParseResult;
use crate::types::*;

pub const PARSE_FAILURE_SUMMARY: &str =
    "VCF parsing failed. No pharmacogenomic assessment could be performed.";

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Tsv,
    Html,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LlmExplanation {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub vcf_parsing_success: bool,
    pub variants_parsed: usize,
    pub records_skipped: usize,
}

/// One patient/drug result as written to disk
///
/// The three assessment sections are `None` only for a parse-failure report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub patient_id: String,
    pub drug: Drug,
    pub timestamp: String,
    pub risk_assessment: Option<RiskAssessment>,
    pub pharmacogenomic_profile: Option<PharmacogenomicProfile>,
    pub clinical_recommendation: Option<ClinicalRecommendation>,
    pub llm_generated_explanation: LlmExplanation,
    pub quality_metrics: QualityMetrics,
}

impl AnalysisReport {
    pub fn new(
        patient_id: impl Into<String>,
        drug: Drug,
        outcome: RiskOutcome,
        summary: String,
        parsed: &ParseResult,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            drug,
            timestamp: utc_timestamp(),
            risk_assessment: Some(outcome.risk_assessment),
            pharmacogenomic_profile: Some(outcome.pharmacogenomic_profile),
            clinical_recommendation: Some(outcome.clinical_recommendation),
            llm_generated_explanation: LlmExplanation { summary },
            quality_metrics: QualityMetrics {
                vcf_parsing_success: true,
                variants_parsed: parsed.variant_count(),
                records_skipped: parsed.skipped,
            },
        }
    }

    /// Shell returned when the input could not be read as VCF
    pub fn parse_failure(patient_id: impl Into<String>, drug: Drug) -> Self {
        Self {
            patient_id: patient_id.into(),
            drug,
            timestamp: utc_timestamp(),
            risk_assessment: None,
            pharmacogenomic_profile: None,
            clinical_recommendation: None,
            llm_generated_explanation: LlmExplanation {
                summary: PARSE_FAILURE_SUMMARY.to_string(),
            },
            quality_metrics: QualityMetrics {
                vcf_parsing_success: false,
                variants_parsed: 0,
                records_skipped: 0,
            },
        }
    }

    fn file_stem(&self) -> String {
        let patient: String = self
            .patient_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}_{}", patient, self.drug.name().to_lowercase())
    }

    fn table_row(&self) -> [String; 10] {
        let risk = self.risk_assessment.clone().unwrap_or_default();
        let (gene, diplotype, phenotype, variants) = match &self.pharmacogenomic_profile {
            Some(p) => (
                p.primary_gene.to_string(),
                p.diplotype.clone(),
                p.phenotype.to_string(),
                p.detected_variants.len().to_string(),
            ),
            None => Default::default(),
        };
        let dose = self
            .clinical_recommendation
            .as_ref()
            .map(|c| c.dose_recommendation.clone())
            .unwrap_or_default();

        [
            self.patient_id.clone(),
            self.drug.to_string(),
            gene,
            diplotype,
            phenotype,
            risk.risk_label.to_string(),
            risk.severity.to_string(),
            format!("{:.2}", risk.confidence_score),
            variants,
            dose,
        ]
    }
}

const TABLE_HEADER: [&str; 10] = [
    "patient_id",
    "drug",
    "primary_gene",
    "diplotype",
    "phenotype",
    "risk_label",
    "severity",
    "confidence_score",
    "detected_variants",
    "dose_recommendation",
];

/// ISO-8601 UTC with a `Z` suffix
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Pharmacogenomic Risk Report</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; background-color: #f5f5f5; }
        .container { max-width: 1000px; margin: 0 auto; background-color: white; padding: 30px; border-radius: 10px; }
        h1, h2 { color: #2c3e50; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th, td { border: 1px solid #ddd; padding: 10px; text-align: left; }
        th { background-color: #3498db; color: white; }
        .summary-box { background-color: #e8f4f8; padding: 20px; border-radius: 5px; margin: 20px 0; }
        .severity-critical, .severity-high { background-color: #f8d7da; }
        .severity-moderate { background-color: #fff3cd; }
        .severity-low, .severity-none { background-color: #d4edda; }
    </style>
</head>
<body>
<div class="container">
    <h1>Pharmacogenomic Risk Report</h1>
    <p>Generated on: {{ generated }}</p>
    {% for report in reports %}
    <div class="section">
        <h2>{{ report.patient_id }} &middot; {{ report.drug }}</h2>
        {% if report.risk_assessment %}
        <table>
            <tr><th>Gene</th><th>Diplotype</th><th>Phenotype</th><th>Risk</th><th>Severity</th><th>Confidence</th></tr>
            <tr class="severity-{{ report.risk_assessment.severity }}">
                <td>{{ report.pharmacogenomic_profile.primary_gene }}</td>
                <td>{{ report.pharmacogenomic_profile.diplotype }}</td>
                <td>{{ report.clinical_recommendation.phenotype_full }} ({{ report.pharmacogenomic_profile.phenotype }})</td>
                <td>{{ report.risk_assessment.risk_label }}</td>
                <td>{{ report.risk_assessment.severity }}</td>
                <td>{{ report.risk_assessment.confidence_score }}</td>
            </tr>
        </table>
        {% if report.pharmacogenomic_profile.detected_variants %}
        <table>
            <tr><th>rsID</th><th>Chromosome</th><th>Position</th><th>Ref</th><th>Alt</th></tr>
            {% for v in report.pharmacogenomic_profile.detected_variants %}
            <tr><td>{% if v.rsid %}{{ v.rsid }}{% else %}-{% endif %}</td><td>{{ v.chromosome }}</td><td>{{ v.position }}</td><td>{{ v.ref }}</td><td>{{ v.alt }}</td></tr>
            {% endfor %}
        </table>
        {% endif %}
        <p><strong>Dose:</strong> {{ report.clinical_recommendation.dose_recommendation }}</p>
        <p><strong>Monitoring:</strong> {{ report.clinical_recommendation.monitoring }}</p>
        {% endif %}
        <div class="summary-box">{{ report.llm_generated_explanation.summary }}</div>
    </div>
    {% endfor %}
</div>
</body>
</html>
"#;

/// Report generator for analysis results
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: &Path) -> Result<Self> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).with_context(|| {
                format!("Failed to create output directory {}", output_dir.display())
            })?;
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write `reports` in the requested format(s), returning the files written
    pub fn generate(&self, reports: &[AnalysisReport], format: ReportFormat) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        if reports.is_empty() {
            return Ok(written);
        }

        match format {
            ReportFormat::Json => written.extend(self.generate_json_reports(reports)?),
            ReportFormat::Csv => written.push(self.generate_table(reports, b',', "csv")?),
            ReportFormat::Tsv => written.push(self.generate_table(reports, b'\t', "tsv")?),
            ReportFormat::Html => written.push(self.generate_html_report(reports)?),
            ReportFormat::All => {
                written.extend(self.generate_json_reports(reports)?);
                written.push(self.generate_table(reports, b',', "csv")?);
                written.push(self.generate_table(reports, b'\t', "tsv")?);
                written.push(self.generate_html_report(reports)?);
            }
        }

        Ok(written)
    }

    /// One JSON document per report
    fn generate_json_reports(&self, reports: &[AnalysisReport]) -> Result<Vec<PathBuf>> {
        reports
            .iter()
            .map(|report| {
                let filename = self.output_dir.join(format!("{}.json", report.file_stem()));
                let json_content = to_string_pretty(report)
                    .with_context(|| "Failed to serialize report to JSON")?;
                fs::write(&filename, json_content).with_context(|| {
                    format!("Failed to write JSON report to {}", filename.display())
                })?;
                Ok(filename)
            })
            .collect()
    }

    fn generate_table(&self, reports: &[AnalysisReport], delimiter: u8, ext: &str) -> Result<PathBuf> {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let filename = self.output_dir.join(format!("risk_{}.{}", timestamp, ext));

        let wtr = WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(&filename)
            .with_context(|| format!("Failed to create {}", filename.display()))?;
        write_table(wtr, reports)?;

        Ok(filename)
    }

    fn generate_html_report(&self, reports: &[AnalysisReport]) -> Result<PathBuf> {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let filename = self.output_dir.join(format!("report_{}.html", timestamp));

        fs::write(&filename, render_html(reports)?)
            .with_context(|| format!("Failed to write HTML report to {}", filename.display()))?;

        Ok(filename)
    }
}

/// One row per report under a fixed header
pub fn write_table<W: Write>(mut wtr: Writer<W>, reports: &[AnalysisReport]) -> Result<()> {
    wtr.write_record(TABLE_HEADER)?;
    for report in reports {
        wtr.write_record(report.table_row())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn render_html(reports: &[AnalysisReport]) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("reports", reports);
    context.insert(
        "generated",
        &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    Tera::one_off(HTML_TEMPLATE, &context, true).with_context(|| "Failed to render HTML report")
}

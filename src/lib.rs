//! # pgx-risk
//!
//! Pharmacogenomic drug-risk assessment from VCF variant calls.
//!
//! Six genes (CYP2D6, CYP2C19, CYP2C9, SLCO1B1, TPMT, DPYD) and the drug
//! whose response each one drives. Variant records pass through a fixed
//! chain: [`VariantExtractor`] selects a gene's variants, [`AlleleInferencer`]
//! maps rsIDs to star alleles, [`DiplotypeBuilder`] pairs them,
//! [`PhenotypeResolver`] turns the activity pair into a metabolizer class and
//! [`RiskRuleEngine`] attaches the clinical rule for the drug.
//!
//! Only an unknown gene symbol is a hard failure. Every other gap (no
//! variants, unknown rsIDs, unmapped activity pairs, missing rules) resolves
//! to a documented default.
//!
//! ## Features
//!
//! - Plain, gzip/BGZF, bzip2 and xz compressed VCF input
//! - Annotation-first gene matching (ANN, CSQ, GENEINFO, Gene) with a
//!   coordinate-window fallback
//! - Template or remote-model explanations (`http` feature)
//! - JSON, CSV, TSV and HTML reports
//! - Parallel batch analysis

pub mod analysis;
pub mod annotation;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod explanation;
pub mod extraction;
pub mod output;
pub mod parsers;
pub mod service;
pub mod types;

// Re-export key types
pub use analysis::{AlleleInferencer, DiplotypeBuilder, PhenotypeResolver, RiskPipeline, RiskRuleEngine};
pub use catalog::Catalog;
pub use config::Settings;
pub use discovery::FileDiscovery;
pub use error::{PgxError, Result};
pub use explanation::{ExplanationService, TemplateExplainer};
pub use extraction::{MatchStrategy, VariantExtractor};
pub use output::{AnalysisReport, ReportFormat, ReportGenerator};
pub use parsers::{ParseResult, VcfReader};
pub use service::AnalysisService;
pub use types::*;

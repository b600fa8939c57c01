//! Error types shared by the whole crate.
//!
//! Only a handful of conditions are ever surfaced as errors. Degenerate genetic
//! input (no variants, unknown rsIDs, unmapped activity pairs, missing risk
//! rules) resolves to documented defaults instead.

use thiserror::Error;

/// Main error type for pgx-risk operations
#[derive(Error, Debug)]
pub enum PgxError {
    /// Requested gene is outside the fixed six-gene catalog
    #[error("Gene '{gene}' is not supported")]
    GeneNotFound { gene: String },

    /// Requested drug has no primary gene in the catalog
    #[error("Drug '{drug}' is not supported")]
    DrugNotSupported { drug: String },

    /// VCF text could not be decoded (empty, missing header, unreadable)
    #[error("VCF error: {message}")]
    VcfParse { message: String },

    /// Input file rejected before parsing (extension, size)
    #[error("Invalid input file: {message}")]
    FileValidation { message: String },

    /// Configuration file or environment could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Remote explanation service failed
    #[error("Explanation service unavailable: {message}")]
    Explanation { message: String },

    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using PgxError
pub type Result<T> = std::result::Result<T, PgxError>;

impl PgxError {
    pub fn gene_not_found(gene: impl Into<String>) -> Self {
        Self::GeneNotFound { gene: gene.into() }
    }

    pub fn drug_not_supported(drug: impl Into<String>) -> Self {
        Self::DrugNotSupported { drug: drug.into() }
    }

    pub fn vcf(message: impl Into<String>) -> Self {
        Self::VcfParse {
            message: message.into(),
        }
    }

    pub fn file_validation(message: impl Into<String>) -> Self {
        Self::FileValidation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn explanation(message: impl Into<String>) -> Self {
        Self::Explanation {
            message: message.into(),
        }
    }

    /// True when the caller supplied bad input, as opposed to an environment
    /// or service failure. Input errors are never worth retrying.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::GeneNotFound { .. }
                | Self::DrugNotSupported { .. }
                | Self::VcfParse { .. }
                | Self::FileValidation { .. }
        )
    }
}

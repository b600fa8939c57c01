//! Decoder for pipe-delimited functional annotations.
//!
//! SnpEff writes `ANN=Allele|Annotation|Impact|Gene_Name|Gene_ID|...` and VEP
//! writes `CSQ=Allele|Consequence|IMPACT|SYMBOL|Gene|...`. Both carry one
//! entry per transcript; the record reader already split the comma list.

use crate::types::RawVariantRecord;

/// Which annotator produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationSource {
    /// SnpEff `ANN`
    SnpEff,
    /// VEP `CSQ`
    Vep,
}

impl AnnotationSource {
    pub fn info_key(&self) -> &'static str {
        match self {
            AnnotationSource::SnpEff => "ANN",
            AnnotationSource::Vep => "CSQ",
        }
    }

    /// Number of leading fields that may name the gene. Past these the
    /// layout is transcript-level detail.
    pub fn gene_field_span(&self) -> usize {
        match self {
            AnnotationSource::SnpEff => 5,
            AnnotationSource::Vep => 8,
        }
    }
}

/// One decoded annotation entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub source: AnnotationSource,
    pub fields: Vec<String>,
}

impl Annotation {
    pub fn decode(source: AnnotationSource, raw: &str) -> Self {
        Self {
            source,
            fields: raw.split('|').map(|field| field.trim().to_string()).collect(),
        }
    }

    fn field(&self, index: usize) -> Option<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn allele(&self) -> Option<&str> {
        self.field(0)
    }

    pub fn consequence(&self) -> Option<&str> {
        self.field(1)
    }

    pub fn impact(&self) -> Option<&str> {
        self.field(2)
    }

    /// Gene symbol column (both layouts put it fourth)
    pub fn symbol(&self) -> Option<&str> {
        self.field(3)
    }

    /// Fields that may carry a gene symbol or identifier
    pub fn gene_fields(&self) -> &[String] {
        let span = self.source.gene_field_span().min(self.fields.len());
        &self.fields[..span]
    }

    /// Case-insensitive exact match of `gene` against the gene fields
    pub fn names_gene(&self, gene: &str) -> bool {
        self.gene_fields()
            .iter()
            .any(|field| field.eq_ignore_ascii_case(gene))
    }
}

/// Decode every `ANN` and `CSQ` entry on a record
pub fn decode_record(record: &RawVariantRecord) -> Vec<Annotation> {
    [AnnotationSource::Vep, AnnotationSource::SnpEff]
        .into_iter()
        .flat_map(|source| {
            record
                .info_entries(source.info_key())
                .iter()
                .map(move |raw| Annotation::decode(source, raw))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_snpeff_entry() {
        let ann = Annotation::decode(
            AnnotationSource::SnpEff,
            "T|missense_variant|MODERATE|CYP2C9|ENSG00000138109|transcript",
        );
        assert_eq!(ann.allele(), Some("T"));
        assert_eq!(ann.consequence(), Some("missense_variant"));
        assert_eq!(ann.impact(), Some("MODERATE"));
        assert_eq!(ann.symbol(), Some("CYP2C9"));
        assert_eq!(ann.gene_fields().len(), 5);
        assert!(ann.names_gene("cyp2c9"));
    }

    #[test]
    fn test_gene_beyond_span_is_ignored() {
        // Gene name in the sixth field of an ANN entry
        let ann = Annotation::decode(AnnotationSource::SnpEff, "T|a|b|c|d|CYP2C9");
        assert!(!ann.names_gene("CYP2C9"));

        // ... but the CSQ span reaches it
        let csq = Annotation::decode(AnnotationSource::Vep, "T|a|b|c|d|CYP2C9");
        assert!(csq.names_gene("CYP2C9"));
    }

    #[test]
    fn test_names_gene_requires_whole_field() {
        let ann = Annotation::decode(AnnotationSource::Vep, "T|x|y|CYP2C19|z");
        assert!(!ann.names_gene("CYP2C1"));
        assert!(ann.names_gene("CYP2C19"));
    }

    #[test]
    fn test_short_entry() {
        let ann = Annotation::decode(AnnotationSource::SnpEff, "T");
        assert_eq!(ann.gene_fields().len(), 1);
        assert_eq!(ann.symbol(), None);
    }

    #[test]
    fn test_decode_record_reads_both_keys() {
        let record = RawVariantRecord::new("10", 100, ".", "C", vec!["T".to_string()])
            .with_info("ANN", vec!["T|missense|MODERATE|CYP2C9|E1", "T|intron|MODIFIER|X|E2"])
            .with_info("CSQ", "T|missense|MODERATE|CYP2C9");
        let annotations = decode_record(&record);
        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[0].source, AnnotationSource::Vep);
    }
}

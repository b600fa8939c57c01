use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use crate::annotation;
use crate::catalog::{Catalog, GeneProfile};
use crate::error::{PgxError, Result};
use crate::types::*;

lazy_static! {
    static ref RSID_PATTERN: Regex = Regex::new(r"^rs[0-9]+$").expect("valid rsID pattern");
}

/// How records are matched to a gene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Annotation match, coordinate window only if that found nothing
    #[default]
    Auto,
    /// Skip annotations entirely
    CoordinatesOnly,
}

/// Filters raw records down to the variants of one gene
pub struct VariantExtractor<'a> {
    catalog: &'a Catalog,
}

impl<'a> VariantExtractor<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Extract variants for `gene` using the default strategy
    pub fn extract(&self, records: &[RawVariantRecord], gene: &str) -> Result<Vec<VariantInfo>> {
        self.extract_with(records, gene, MatchStrategy::Auto)
    }

    /// Annotation matching and coordinate matching are never combined: if any
    /// record is annotated with the gene, unannotated records in the window
    /// are not considered.
    pub fn extract_with(
        &self,
        records: &[RawVariantRecord],
        gene: &str,
        strategy: MatchStrategy,
    ) -> Result<Vec<VariantInfo>> {
        let gene = self.catalog.resolve_gene(gene)?;
        let profile = self
            .catalog
            .profile(gene)
            .ok_or_else(|| PgxError::gene_not_found(gene.symbol()))?;

        if strategy == MatchStrategy::Auto {
            let hits: Vec<&RawVariantRecord> = records
                .iter()
                .filter(|record| annotation_match(record, gene))
                .collect();
            if !hits.is_empty() {
                info!("Gene {}: {} annotation-matched records", gene, hits.len());
                return Ok(hits
                    .into_iter()
                    .flat_map(|record| to_variant_infos(record, gene))
                    .collect());
            }
            debug!("Gene {}: no annotation hits, using coordinate window", gene);
        }

        let hits: Vec<&RawVariantRecord> = records
            .iter()
            .filter(|record| coordinate_match(record, profile))
            .collect();
        info!("Gene {}: {} coordinate-matched records", gene, hits.len());

        Ok(hits
            .into_iter()
            .flat_map(|record| to_variant_infos(record, gene))
            .collect())
    }
}

/// True if any ANN/CSQ entry or GENEINFO/Gene field names the gene
pub fn annotation_match(record: &RawVariantRecord, gene: Gene) -> bool {
    let symbol = gene.symbol();

    if annotation::decode_record(record)
        .iter()
        .any(|entry| entry.names_gene(symbol))
    {
        return true;
    }

    ["GENEINFO", "Gene"].iter().any(|key| {
        record
            .info_entries(key)
            .iter()
            .any(|value| value.to_uppercase().contains(symbol))
    })
}

/// True if the record lies inside the gene's window
pub fn coordinate_match(record: &RawVariantRecord, profile: &GeneProfile) -> bool {
    profile
        .region
        .contains(strip_chr_prefix(&record.chromosome), record.position)
}

/// "chr10" -> "10"; case-insensitive on the prefix
pub fn strip_chr_prefix(chromosome: &str) -> &str {
    let trimmed = chromosome.trim();
    match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &trimmed[3..],
        _ => trimmed,
    }
}

/// Identifier kept only when it looks like a dbSNP rsID
pub fn normalize_rsid(id: &str) -> Option<String> {
    let id = id.trim();
    RSID_PATTERN.is_match(id).then(|| id.to_string())
}

fn to_variant_infos(record: &RawVariantRecord, gene: Gene) -> Vec<VariantInfo> {
    let rsid = normalize_rsid(&record.id);
    let chromosome = strip_chr_prefix(&record.chromosome).to_string();

    let alternates: Vec<&str> = if record.alternates.is_empty() {
        vec!["."]
    } else {
        record.alternates.iter().map(String::as_str).collect()
    };

    alternates
        .into_iter()
        .map(|alt| VariantInfo {
            gene,
            chromosome: chromosome.clone(),
            position: record.position,
            reference: record.reference.clone(),
            alt: alt.to_string(),
            rsid: rsid.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chrom: &str, pos: u64, id: &str) -> RawVariantRecord {
        RawVariantRecord::new(chrom, pos, id, "C", vec!["T".to_string()])
    }

    #[test]
    fn test_gene_info_fields_match() {
        assert!(annotation_match(
            &record("10", 100, ".").with_info("Gene", "CYP2C9"),
            Gene::CYP2C9
        ));
        assert!(annotation_match(
            &record("10", 100, ".").with_info("GENEINFO", "CYP2C9:1559"),
            Gene::CYP2C9
        ));
        assert!(annotation_match(
            &record("10", 100, ".").with_info("Gene", "cyp2c9"),
            Gene::CYP2C9
        ));
        assert!(!annotation_match(
            &record("10", 100, ".").with_info("Gene", "CYP2C9"),
            Gene::CYP2D6
        ));
        assert!(!annotation_match(&record("10", 100, "."), Gene::CYP2C9));
    }

    #[test]
    fn test_ann_and_csq_match() {
        let ann = record("10", 100, ".")
            .with_info("ANN", vec!["T|missense|MODERATE|CYP2C9|ENSG123|..."]);
        assert!(annotation_match(&ann, Gene::CYP2C9));

        let csq = record("10", 100, ".").with_info("CSQ", vec!["T|missense|MODERATE|CYP2C9|..."]);
        assert!(annotation_match(&csq, Gene::CYP2C9));
    }

    #[test]
    fn test_coordinate_window_bounds() {
        let catalog = Catalog::standard();
        let profile = catalog.profile(Gene::CYP2C9).unwrap();

        let cases = [
            ("10", 96_741_053, true),
            ("10", 96_698_415, true),
            ("10", 96_749_148, true),
            ("10", 96_698_000, false),
            ("10", 96_750_000, false),
            ("9", 96_741_053, false),
            ("chr10", 96_741_053, true),
            ("CHR10", 96_741_053, true),
        ];
        for (chrom, pos, expected) in cases {
            assert_eq!(
                coordinate_match(&record(chrom, pos, "."), profile),
                expected,
                "{}:{}",
                chrom,
                pos
            );
        }
    }

    #[test]
    fn test_windows_for_other_genes() {
        let catalog = Catalog::standard();
        let cases = [
            (Gene::CYP2D6, "22", 42_522_613),
            (Gene::SLCO1B1, "12", 21_331_549),
            (Gene::TPMT, "6", 18_155_418),
            (Gene::DPYD, "1", 97_915_614),
        ];
        for (gene, chrom, pos) in cases {
            let profile = catalog.profile(gene).unwrap();
            assert!(coordinate_match(&record(chrom, pos, "."), profile), "{}", gene);
        }
    }

    #[test]
    fn test_rsid_normalization() {
        assert_eq!(normalize_rsid("rs1799853"), Some("rs1799853".to_string()));
        assert_eq!(normalize_rsid("."), None);
        assert_eq!(normalize_rsid("rsX12"), None);
        assert_eq!(normalize_rsid("COSM123"), None);
        assert_eq!(normalize_rsid("rs"), None);
    }

    #[test]
    fn test_unknown_gene_is_rejected() {
        let catalog = Catalog::standard();
        let extractor = VariantExtractor::new(&catalog);
        assert!(matches!(
            extractor.extract(&[], "BRCA1"),
            Err(PgxError::GeneNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        let catalog = Catalog::standard();
        let extractor = VariantExtractor::new(&catalog);
        for gene in Gene::ALL {
            assert!(extractor.extract(&[], gene.symbol()).unwrap().is_empty());
        }
    }

    #[test]
    fn test_one_variant_per_alt_allele() {
        let catalog = Catalog::standard();
        let extractor = VariantExtractor::new(&catalog);
        let multi = RawVariantRecord::new(
            "chr10",
            96_741_053,
            "rs1799853",
            "C",
            vec!["T".to_string(), "<DEL>".to_string()],
        );
        let variants = extractor.extract(&[multi], "CYP2C9").unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].alt, "T");
        assert_eq!(variants[1].alt, "<DEL>");
        assert!(variants.iter().all(|v| v.chromosome == "10"));
        assert!(variants.iter().all(|v| v.rsid.as_deref() == Some("rs1799853")));
    }

    #[test]
    fn test_record_without_alternates_yields_placeholder() {
        let catalog = Catalog::standard();
        let extractor = VariantExtractor::new(&catalog);
        let bare = RawVariantRecord::new("10", 96_741_053, ".", "C", vec![]);
        let variants = extractor.extract(&[bare], "CYP2C9").unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].alt, ".");
        assert_eq!(variants[0].rsid, None);
    }

    #[test]
    fn test_annotation_hits_suppress_coordinate_fallback() {
        let catalog = Catalog::standard();
        let extractor = VariantExtractor::new(&catalog);
        let records = vec![
            record("10", 96_741_053, "rs1799853").with_info("Gene", "CYP2C9"),
            // In the window but unannotated: dropped because annotation matched
            record("10", 96_740_980, "rs1057910"),
        ];

        let auto = extractor.extract(&records, "CYP2C9").unwrap();
        assert_eq!(auto.len(), 1);
        assert_eq!(auto[0].rsid.as_deref(), Some("rs1799853"));

        let forced = extractor
            .extract_with(&records, "CYP2C9", MatchStrategy::CoordinatesOnly)
            .unwrap();
        assert_eq!(forced.len(), 2);
    }

    #[test]
    fn test_coordinate_fallback_when_unannotated() {
        let catalog = Catalog::standard();
        let extractor = VariantExtractor::new(&catalog);
        let records = vec![record("10", 96_741_053, "rs1799853"), record("10", 1000, ".")];
        let variants = extractor.extract(&records, "cyp2c9").unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].gene, Gene::CYP2C9);
        assert_eq!(variants[0].position, 96_741_053);
    }

    #[test]
    fn test_unrelated_records_excluded() {
        let catalog = Catalog::standard();
        let extractor = VariantExtractor::new(&catalog);
        let unrelated = vec![record("1", 999_999, ".").with_info("Gene", "BRCA1")];
        assert!(extractor.extract(&unrelated, "CYP2C9").unwrap().is_empty());
    }
}

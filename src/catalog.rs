//! Static reference tables for the six supported pharmacogenes.
//!
//! Everything here is built once by [`Catalog::standard`] and only read
//! afterwards. Pipeline components borrow a `&Catalog`; nothing in the crate
//! holds a global copy.
//!
//! Coordinates are hg19/GRCh37. Star-allele, phenotype and risk tables follow
//! CPIC guidance for the primary drug of each gene.

use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::error::{PgxError, Result};
use crate::types::*;

const NONE: ActivityLevel = ActivityLevel::None;
const REDUCED: ActivityLevel = ActivityLevel::Reduced;
const NORMAL: ActivityLevel = ActivityLevel::Normal;
const INCREASED: ActivityLevel = ActivityLevel::Increased;

/// (gene, chromosome, start, end), inclusive bounds
const GENE_REGIONS: &[(Gene, &str, u64, u64)] = &[
    (Gene::CYP2D6, "22", 42_522_500, 42_526_883),
    (Gene::CYP2C19, "10", 96_522_463, 96_612_671),
    (Gene::CYP2C9, "10", 96_698_415, 96_749_148),
    (Gene::SLCO1B1, "12", 21_281_254, 21_430_918),
    (Gene::TPMT, "6", 18_128_556, 18_155_418),
    (Gene::DPYD, "1", 97_541_298, 98_388_615),
];

/// (gene, rsID, star allele, activity)
const STAR_ALLELES: &[(Gene, &str, &str, ActivityLevel)] = &[
    (Gene::CYP2D6, "rs3892097", "*4", NONE),
    (Gene::CYP2D6, "rs5030655", "*6", NONE),
    (Gene::CYP2D6, "rs16947", "*2", NORMAL),
    (Gene::CYP2D6, "rs1065852", "*10", REDUCED),
    (Gene::CYP2D6, "rs28371725", "*41", REDUCED),
    (Gene::CYP2D6, "rs1135840", "*2", NORMAL),
    (Gene::CYP2C9, "rs1799853", "*2", REDUCED),
    (Gene::CYP2C9, "rs1057910", "*3", NONE),
    (Gene::CYP2C9, "rs28371686", "*5", NONE),
    (Gene::CYP2C9, "rs72558187", "*6", NONE),
    (Gene::CYP2C19, "rs4244285", "*2", NONE),
    (Gene::CYP2C19, "rs4986893", "*3", NONE),
    (Gene::CYP2C19, "rs12248560", "*17", INCREASED),
    (Gene::CYP2C19, "rs28399504", "*4", NONE),
    (Gene::SLCO1B1, "rs4149056", "*5", REDUCED),
    (Gene::SLCO1B1, "rs2306283", "*1b", NORMAL),
    (Gene::SLCO1B1, "rs11045819", "*15", REDUCED),
    (Gene::TPMT, "rs1800460", "*3B", NONE),
    (Gene::TPMT, "rs1142345", "*3C", NONE),
    (Gene::TPMT, "rs1800462", "*2", NONE),
    (Gene::TPMT, "rs1800584", "*3A", NONE),
    (Gene::DPYD, "rs3918290", "*2A", NONE),
    (Gene::DPYD, "rs67376798", "c.2846A>T", REDUCED),
    (Gene::DPYD, "rs55886062", "c.1679T>G", NONE),
    (Gene::DPYD, "rs75017182", "c.1236G>A", REDUCED),
];

/// (gene, first activity, second activity, phenotype). Ordered keys; the
/// resolver tries the swapped order itself.
const PHENOTYPE_PAIRS: &[(Gene, ActivityLevel, ActivityLevel, Phenotype)] = &[
    (Gene::CYP2D6, NONE, NONE, Phenotype::PM),
    (Gene::CYP2D6, NONE, REDUCED, Phenotype::PM),
    (Gene::CYP2D6, REDUCED, NONE, Phenotype::PM),
    (Gene::CYP2D6, REDUCED, REDUCED, Phenotype::IM),
    (Gene::CYP2D6, NORMAL, NONE, Phenotype::IM),
    (Gene::CYP2D6, NORMAL, REDUCED, Phenotype::IM),
    (Gene::CYP2D6, NONE, INCREASED, Phenotype::IM),
    (Gene::CYP2D6, INCREASED, NONE, Phenotype::IM),
    (Gene::CYP2D6, NORMAL, NORMAL, Phenotype::NM),
    (Gene::CYP2D6, NORMAL, INCREASED, Phenotype::RM),
    (Gene::CYP2D6, INCREASED, NORMAL, Phenotype::RM),
    (Gene::CYP2D6, INCREASED, INCREASED, Phenotype::URM),
    (Gene::CYP2C9, NONE, NONE, Phenotype::PM),
    (Gene::CYP2C9, REDUCED, NONE, Phenotype::IM),
    (Gene::CYP2C9, REDUCED, REDUCED, Phenotype::IM),
    (Gene::CYP2C9, NORMAL, NONE, Phenotype::IM),
    (Gene::CYP2C9, NORMAL, REDUCED, Phenotype::IM),
    (Gene::CYP2C9, NORMAL, NORMAL, Phenotype::NM),
    (Gene::CYP2C19, NONE, NONE, Phenotype::PM),
    (Gene::CYP2C19, NONE, REDUCED, Phenotype::PM),
    (Gene::CYP2C19, REDUCED, NONE, Phenotype::PM),
    (Gene::CYP2C19, REDUCED, REDUCED, Phenotype::PM),
    (Gene::CYP2C19, NORMAL, NONE, Phenotype::IM),
    (Gene::CYP2C19, NORMAL, REDUCED, Phenotype::IM),
    (Gene::CYP2C19, NONE, INCREASED, Phenotype::IM),
    (Gene::CYP2C19, NORMAL, NORMAL, Phenotype::NM),
    (Gene::CYP2C19, NORMAL, INCREASED, Phenotype::RM),
    (Gene::CYP2C19, INCREASED, NORMAL, Phenotype::RM),
    (Gene::CYP2C19, INCREASED, INCREASED, Phenotype::URM),
    (Gene::CYP2C19, INCREASED, NONE, Phenotype::IM),
    (Gene::SLCO1B1, REDUCED, REDUCED, Phenotype::PM),
    (Gene::SLCO1B1, NONE, REDUCED, Phenotype::PM),
    (Gene::SLCO1B1, REDUCED, NONE, Phenotype::PM),
    (Gene::SLCO1B1, NORMAL, REDUCED, Phenotype::IM),
    (Gene::SLCO1B1, REDUCED, NORMAL, Phenotype::IM),
    (Gene::SLCO1B1, NORMAL, NONE, Phenotype::IM),
    (Gene::SLCO1B1, NONE, NORMAL, Phenotype::IM),
    (Gene::SLCO1B1, NORMAL, NORMAL, Phenotype::NM),
    (Gene::TPMT, NONE, NONE, Phenotype::PM),
    (Gene::TPMT, NORMAL, NONE, Phenotype::IM),
    (Gene::TPMT, NORMAL, NORMAL, Phenotype::NM),
    (Gene::DPYD, NONE, NONE, Phenotype::PM),
    (Gene::DPYD, NONE, REDUCED, Phenotype::PM),
    (Gene::DPYD, NORMAL, NONE, Phenotype::IM),
    (Gene::DPYD, NORMAL, REDUCED, Phenotype::IM),
    (Gene::DPYD, NORMAL, NORMAL, Phenotype::NM),
];

/// Every gene resolves unmapped pairs to this phenotype
const DEFAULT_PHENOTYPE: Phenotype = Phenotype::NM;

type RuleRow = (
    Gene,
    Phenotype,
    RiskLabel,
    Severity,
    f64,
    &'static str,
    &'static str,
    &'static str,
);

/// (gene, phenotype, label, severity, confidence, dose, monitoring, rationale)
const RISK_RULES: &[RuleRow] = &[
    (
        Gene::CYP2D6,
        Phenotype::PM,
        RiskLabel::Ineffective,
        Severity::High,
        0.92,
        "Avoid codeine; use non-opioid alternative or significantly reduced dose of alternative opioids.",
        "If opioid required, select agent not dependent on CYP2D6 (e.g., morphine, oxymorphone).",
        "Poor CYP2D6 metabolisers cannot convert codeine to morphine adequately, risking treatment failure.",
    ),
    (
        Gene::CYP2D6,
        Phenotype::IM,
        RiskLabel::AdjustDosage,
        Severity::Moderate,
        0.78,
        "Use with caution; consider reduced dose or alternative analgesic.",
        "Monitor for reduced efficacy; pain scores should be reassessed at 24 h.",
        "Reduced CYP2D6 activity leads to diminished morphine production.",
    ),
    (
        Gene::CYP2D6,
        Phenotype::NM,
        RiskLabel::Safe,
        Severity::Low,
        0.85,
        "Standard dosing per label.",
        "Routine monitoring.",
        "Normal CYP2D6 activity; codeine metabolism expected to be typical.",
    ),
    (
        Gene::CYP2D6,
        Phenotype::RM,
        RiskLabel::Toxic,
        Severity::High,
        0.88,
        "Use lower dose; monitor for signs of opioid excess.",
        "Monitor respiratory rate and sedation at initiation.",
        "Increased CYP2D6 activity converts codeine to morphine faster than normal.",
    ),
    (
        Gene::CYP2D6,
        Phenotype::URM,
        RiskLabel::Toxic,
        Severity::Critical,
        0.95,
        "CONTRAINDICATED. Ultrarapid conversion to morphine causes toxicity risk.",
        "Do not use; select alternative analgesic.",
        "CYP2D6 ultrarapid metabolisers convert codeine to morphine very rapidly, risking respiratory depression.",
    ),
    (
        Gene::CYP2C9,
        Phenotype::PM,
        RiskLabel::Toxic,
        Severity::High,
        0.93,
        "Initiate at ≤25% of standard warfarin dose. Expect prolonged time to stable INR.",
        "INR every 3 days for first 2 weeks; then weekly until stable.",
        "Severely reduced CYP2C9 activity causes warfarin accumulation and elevated bleeding risk.",
    ),
    (
        Gene::CYP2C9,
        Phenotype::IM,
        RiskLabel::AdjustDosage,
        Severity::Moderate,
        0.80,
        "Initiate at 50–75% of standard dose. Adjust based on INR.",
        "Increased INR frequency in first 4 weeks.",
        "Partially reduced CYP2C9 activity leads to warfarin accumulation.",
    ),
    (
        Gene::CYP2C9,
        Phenotype::NM,
        RiskLabel::Safe,
        Severity::Low,
        0.88,
        "Standard dosing per label.",
        "Routine INR monitoring.",
        "Normal CYP2C9 activity; standard warfarin metabolism expected.",
    ),
    (
        Gene::CYP2C19,
        Phenotype::PM,
        RiskLabel::Ineffective,
        Severity::High,
        0.91,
        "Avoid clopidogrel; use prasugrel or ticagrelor if not contraindicated.",
        "Platelet function testing if alternative antiplatelet unavailable.",
        "Poor CYP2C19 metabolisers fail to convert clopidogrel to active metabolite, increasing MACE risk.",
    ),
    (
        Gene::CYP2C19,
        Phenotype::IM,
        RiskLabel::AdjustDosage,
        Severity::Moderate,
        0.76,
        "Consider alternative antiplatelet. If clopidogrel used, monitor closely.",
        "Platelet aggregation studies at initiation.",
        "Partially impaired CYP2C19 activity reduces clopidogrel efficacy.",
    ),
    (
        Gene::CYP2C19,
        Phenotype::NM,
        RiskLabel::Safe,
        Severity::Low,
        0.87,
        "Standard dosing per label.",
        "Routine clinical monitoring.",
        "Normal CYP2C19 activity; standard clopidogrel activation expected.",
    ),
    (
        Gene::CYP2C19,
        Phenotype::RM,
        RiskLabel::Safe,
        Severity::Low,
        0.82,
        "Standard dosing.",
        "Routine monitoring.",
        "Slightly increased CYP2C19 activity; generally favourable for clopidogrel.",
    ),
    (
        Gene::CYP2C19,
        Phenotype::URM,
        RiskLabel::AdjustDosage,
        Severity::Moderate,
        0.80,
        "Standard dosing. Enhanced antiplatelet effect possible; monitor for bleeding.",
        "Monitor for bleeding.",
        "Enhanced CYP2C19 activity increases clopidogrel active metabolite.",
    ),
    (
        Gene::SLCO1B1,
        Phenotype::PM,
        RiskLabel::Toxic,
        Severity::High,
        0.89,
        "Avoid simvastatin 80 mg. Use ≤20 mg simvastatin or switch to pravastatin/rosuvastatin.",
        "CK levels at baseline and at 6 weeks.",
        "Severely reduced SLCO1B1 transport leads to statin accumulation and high myopathy risk.",
    ),
    (
        Gene::SLCO1B1,
        Phenotype::IM,
        RiskLabel::AdjustDosage,
        Severity::Moderate,
        0.77,
        "Limit simvastatin to ≤40 mg/day; consider alternative statin.",
        "Routine CK monitoring; instruct patient to report muscle pain.",
        "Partially reduced SLCO1B1 function increases plasma simvastatin exposure.",
    ),
    (
        Gene::SLCO1B1,
        Phenotype::NM,
        RiskLabel::Safe,
        Severity::Low,
        0.85,
        "Standard dosing per label.",
        "Routine clinical monitoring.",
        "Normal SLCO1B1 transport function; standard simvastatin clearance expected.",
    ),
    (
        Gene::TPMT,
        Phenotype::PM,
        RiskLabel::Toxic,
        Severity::Critical,
        0.95,
        "Reduce azathioprine to 10% of standard dose (or use alternative immunosuppressant).",
        "CBC weekly for first 4 weeks, then monthly.",
        "TPMT-deficient patients accumulate thioguanine nucleotides, causing severe myelotoxicity.",
    ),
    (
        Gene::TPMT,
        Phenotype::IM,
        RiskLabel::AdjustDosage,
        Severity::Moderate,
        0.82,
        "Reduce dose to 50–70% of standard; titrate based on tolerance.",
        "CBC bi-weekly for first 2 months.",
        "Heterozygous TPMT deficiency increases TGN accumulation.",
    ),
    (
        Gene::TPMT,
        Phenotype::NM,
        RiskLabel::Safe,
        Severity::Low,
        0.90,
        "Standard dosing per label.",
        "Routine CBC monitoring.",
        "Normal TPMT activity; standard azathioprine metabolism expected.",
    ),
    (
        Gene::DPYD,
        Phenotype::PM,
        RiskLabel::Toxic,
        Severity::Critical,
        0.97,
        "CONTRAINDICATED. Do not administer fluorouracil or capecitabine.",
        "If unavoidable, reduce dose by ≥85% with close toxicity monitoring.",
        "Complete DPYD deficiency causes severe, life-threatening fluorouracil toxicity.",
    ),
    (
        Gene::DPYD,
        Phenotype::IM,
        RiskLabel::AdjustDosage,
        Severity::Moderate,
        0.78,
        "Reduce 5-FU starting dose by 25–50%; titrate based on toxicity.",
        "Close monitoring of CBC, LFTs, and clinical toxicity.",
        "Partial DPYD deficiency increases fluorouracil exposure.",
    ),
    (
        Gene::DPYD,
        Phenotype::NM,
        RiskLabel::Safe,
        Severity::None,
        0.88,
        "Standard dosing per label.",
        "Routine toxicity monitoring.",
        "Normal DPYD activity; standard fluorouracil metabolism expected.",
    ),
];

/// Genomic window of a gene, inclusive on both ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicRegion {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicRegion {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    /// `chromosome` must already be stripped of any `chr` prefix
    pub fn contains(&self, chromosome: &str, position: u64) -> bool {
        self.chromosome == chromosome && (self.start..=self.end).contains(&position)
    }
}

/// Activity pair -> phenotype for one gene, with a mandatory default
#[derive(Debug, Clone)]
pub struct PhenotypeTable {
    entries: HashMap<(ActivityLevel, ActivityLevel), Phenotype>,
    default: Phenotype,
}

impl PhenotypeTable {
    pub fn new(default: Phenotype) -> Self {
        Self {
            entries: HashMap::new(),
            default,
        }
    }

    pub fn insert(&mut self, pair: ActivityPair, phenotype: Phenotype) {
        self.entries.insert(pair.ordered(), phenotype);
    }

    /// Lookup of the pair exactly as ordered, without any fallback
    pub fn exact(&self, pair: &ActivityPair) -> Option<Phenotype> {
        self.entries.get(&pair.ordered()).copied()
    }

    pub fn default_phenotype(&self) -> Phenotype {
        self.default
    }

    /// Every phenotype this table can produce, default included
    pub fn phenotypes(&self) -> BTreeSet<Phenotype> {
        let mut set: BTreeSet<Phenotype> = self.entries.values().copied().collect();
        set.insert(self.default);
        set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All reference data for one gene
#[derive(Debug, Clone)]
pub struct GeneProfile {
    pub gene: Gene,
    pub region: GenomicRegion,
    pub star_alleles: HashMap<String, AlleleHit>,
    pub phenotypes: PhenotypeTable,
    pub risk_rules: HashMap<Phenotype, RiskRule>,
}

impl GeneProfile {
    pub fn chromosome(&self) -> &str {
        &self.region.chromosome
    }
}

/// Immutable lookup tables shared by every pipeline stage
#[derive(Debug, Clone)]
pub struct Catalog {
    genes: HashMap<Gene, GeneProfile>,
}

impl Catalog {
    /// Build the reference catalog for all six genes
    pub fn standard() -> Self {
        let mut genes: HashMap<Gene, GeneProfile> = GENE_REGIONS
            .iter()
            .map(|&(gene, chromosome, start, end)| {
                (
                    gene,
                    GeneProfile {
                        gene,
                        region: GenomicRegion::new(chromosome, start, end),
                        star_alleles: HashMap::new(),
                        phenotypes: PhenotypeTable::new(DEFAULT_PHENOTYPE),
                        risk_rules: HashMap::new(),
                    },
                )
            })
            .collect();

        for &(gene, rsid, star, activity) in STAR_ALLELES {
            if let Some(profile) = genes.get_mut(&gene) {
                profile
                    .star_alleles
                    .insert(rsid.to_string(), AlleleHit::new(star, activity));
            }
        }

        for &(gene, first, second, phenotype) in PHENOTYPE_PAIRS {
            if let Some(profile) = genes.get_mut(&gene) {
                profile
                    .phenotypes
                    .insert(ActivityPair::new(first, second), phenotype);
            }
        }

        for &(gene, phenotype, risk_label, severity, confidence, dose, monitoring, rationale) in
            RISK_RULES
        {
            if let Some(profile) = genes.get_mut(&gene) {
                profile.risk_rules.insert(
                    phenotype,
                    RiskRule {
                        risk_label,
                        severity,
                        confidence_score: confidence,
                        dose_recommendation: dose.to_string(),
                        monitoring: monitoring.to_string(),
                        rationale: rationale.to_string(),
                    },
                );
            }
        }

        debug!(
            "Catalog built: {} genes, {} star alleles, {} phenotype pairs, {} risk rules",
            genes.len(),
            STAR_ALLELES.len(),
            PHENOTYPE_PAIRS.len(),
            RISK_RULES.len()
        );

        Self { genes }
    }

    pub fn profile(&self, gene: Gene) -> Option<&GeneProfile> {
        self.genes.get(&gene)
    }

    /// Parse a gene symbol and confirm the catalog carries it
    pub fn resolve_gene(&self, symbol: &str) -> Result<Gene> {
        let gene: Gene = symbol.parse()?;
        if self.genes.contains_key(&gene) {
            Ok(gene)
        } else {
            Err(PgxError::gene_not_found(gene.symbol()))
        }
    }

    /// Genes in catalog order
    pub fn genes(&self) -> impl Iterator<Item = Gene> + '_ {
        Gene::ALL
            .iter()
            .copied()
            .filter(move |gene| self.genes.contains_key(gene))
    }

    pub fn chromosome(&self, gene: Gene) -> Option<&str> {
        self.profile(gene).map(GeneProfile::chromosome)
    }

    pub fn region(&self, gene: Gene) -> Option<&GenomicRegion> {
        self.profile(gene).map(|profile| &profile.region)
    }

    pub fn star_allele(&self, gene: Gene, rsid: &str) -> Option<&AlleleHit> {
        self.profile(gene)
            .and_then(|profile| profile.star_alleles.get(rsid))
    }

    pub fn phenotype_table(&self, gene: Gene) -> Option<&PhenotypeTable> {
        self.profile(gene).map(|profile| &profile.phenotypes)
    }

    pub fn risk_rule(&self, gene: Gene, phenotype: Phenotype) -> Option<&RiskRule> {
        self.profile(gene)
            .and_then(|profile| profile.risk_rules.get(&phenotype))
    }

    /// Check the closed-world invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        for gene in Gene::ALL {
            let profile = self
                .profile(gene)
                .ok_or_else(|| PgxError::config(format!("catalog is missing gene {}", gene)))?;

            if profile.region.start > profile.region.end {
                return Err(PgxError::config(format!(
                    "{}: region start {} is after end {}",
                    gene, profile.region.start, profile.region.end
                )));
            }

            if profile.phenotypes.default_phenotype() != DEFAULT_PHENOTYPE {
                return Err(PgxError::config(format!(
                    "{}: default phenotype must be {}",
                    gene, DEFAULT_PHENOTYPE
                )));
            }

            for (phenotype, rule) in &profile.risk_rules {
                if !(0.0..=1.0).contains(&rule.confidence_score) {
                    return Err(PgxError::config(format!(
                        "{}/{}: confidence {} outside [0, 1]",
                        gene, phenotype, rule.confidence_score
                    )));
                }
                if rule.dose_recommendation.trim().is_empty() {
                    return Err(PgxError::config(format!(
                        "{}/{}: empty dose recommendation",
                        gene, phenotype
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = Catalog::standard();
        catalog.validate().unwrap();
        assert_eq!(catalog.genes().count(), 6);
    }

    #[test]
    fn test_every_gene_has_default_phenotype() {
        let catalog = Catalog::standard();
        for gene in Gene::ALL {
            let table = catalog.phenotype_table(gene).unwrap();
            assert_eq!(table.default_phenotype(), Phenotype::NM);
            assert!(!table.is_empty(), "{} has no phenotype pairs", gene);
        }
    }

    #[test]
    fn test_every_gene_has_a_high_risk_rule() {
        let catalog = Catalog::standard();
        for gene in Gene::ALL {
            let profile = catalog.profile(gene).unwrap();
            assert!(
                profile
                    .risk_rules
                    .values()
                    .any(|rule| rule.severity >= Severity::High),
                "no high/critical rule for {}",
                gene
            );
        }
    }

    #[test]
    fn test_only_cyp2d6_and_cyp2c19_define_rapid_phenotypes() {
        let catalog = Catalog::standard();
        for gene in Gene::ALL {
            let phenotypes = catalog.phenotype_table(gene).unwrap().phenotypes();
            let rapid = phenotypes.contains(&Phenotype::RM) || phenotypes.contains(&Phenotype::URM);
            assert_eq!(rapid, matches!(gene, Gene::CYP2D6 | Gene::CYP2C19));
        }
    }

    #[test]
    fn test_chromosomes_and_windows() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.chromosome(Gene::CYP2D6), Some("22"));
        assert_eq!(catalog.chromosome(Gene::DPYD), Some("1"));

        let region = catalog.region(Gene::CYP2C9).unwrap();
        assert!(region.contains("10", 96_698_415));
        assert!(region.contains("10", 96_749_148));
        assert!(!region.contains("10", 96_698_414));
        assert!(!region.contains("9", 96_741_053));
    }

    #[test]
    fn test_star_allele_lookup() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.star_allele(Gene::CYP2C19, "rs12248560"),
            Some(&AlleleHit::new("*17", ActivityLevel::Increased))
        );
        assert!(catalog.star_allele(Gene::CYP2C9, "rs3892097").is_none());
    }

    #[test]
    fn test_resolve_gene() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.resolve_gene("tpmt").unwrap(), Gene::TPMT);
        assert!(matches!(
            catalog.resolve_gene("BRCA1"),
            Err(PgxError::GeneNotFound { .. })
        ));
    }
}

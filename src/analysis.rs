use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::extraction::{MatchStrategy, VariantExtractor};
use crate::types::*;

/// Maps rsIDs on extracted variants to known star alleles
pub struct AlleleInferencer<'a> {
    catalog: &'a Catalog,
}

impl<'a> AlleleInferencer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Hits in encounter order, one per distinct recognised rsID
    pub fn infer(&self, gene: Gene, variants: &[VariantInfo]) -> Vec<AlleleHit> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut hits = Vec::new();

        for variant in variants {
            let Some(rsid) = variant.rsid.as_deref() else {
                continue;
            };
            if let Some(hit) = self.catalog.star_allele(gene, rsid) {
                if seen.insert(rsid) {
                    hits.push(hit.clone());
                }
            }
        }

        debug!("Gene {}: {} allele hits", gene, hits.len());
        hits
    }
}

/// Composes allele hits into two slots
pub struct DiplotypeBuilder;

impl DiplotypeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// A single hit is paired with wildtype (always read as heterozygous);
    /// hits past the second are dropped.
    pub fn build(&self, hits: &[AlleleHit]) -> Diplotype {
        match hits {
            [] => Diplotype::wildtype(),
            [only] => Diplotype::new(only.clone(), AlleleHit::wildtype()),
            [first, second, rest @ ..] => {
                if !rest.is_empty() {
                    debug!("Ignoring {} allele hits beyond the first two", rest.len());
                }
                Diplotype::new(first.clone(), second.clone())
            }
        }
    }
}

impl Default for DiplotypeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps an activity pair to a phenotype class
pub struct PhenotypeResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> PhenotypeResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Exact pair, then swapped pair, then the gene default
    pub fn resolve(&self, gene: Gene, pair: &ActivityPair) -> Phenotype {
        let Some(table) = self.catalog.phenotype_table(gene) else {
            warn!("Gene {} has no phenotype table", gene);
            return Phenotype::NM;
        };

        if let Some(phenotype) = table.exact(pair) {
            return phenotype;
        }
        if let Some(phenotype) = table.exact(&pair.swapped()) {
            return phenotype;
        }

        debug!("Gene {}: pair {} unmapped, using default", gene, pair);
        table.default_phenotype()
    }
}

/// Looks up clinical risk rules and assembles the output triple
pub struct RiskRuleEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> RiskRuleEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Never fails: unknown combinations get [`RiskRule::fallback`]
    pub fn lookup(&self, gene: Gene, phenotype: Phenotype) -> Cow<'a, RiskRule> {
        match self.catalog.risk_rule(gene, phenotype) {
            Some(rule) => Cow::Borrowed(rule),
            None => {
                debug!("No risk rule for {}/{}, using fallback", gene, phenotype);
                Cow::Owned(RiskRule::fallback())
            }
        }
    }

    /// Run allele inference through rule lookup for already-extracted variants
    pub fn assess(&self, drug: Drug, gene: Gene, variants: Vec<VariantInfo>) -> RiskOutcome {
        info!(
            "Risk assessment: drug={} gene={} variants={}",
            drug,
            gene,
            variants.len()
        );

        let hits = AlleleInferencer::new(self.catalog).infer(gene, &variants);
        let diplotype = DiplotypeBuilder::new().build(&hits);
        let pair = diplotype.activity_pair();
        info!("Diplotype: {}  pair: {}", diplotype.label(), pair);

        let phenotype = PhenotypeResolver::new(self.catalog).resolve(gene, &pair);
        info!("Phenotype: {} ({})", phenotype, phenotype.full_name());

        let rule = self.lookup(gene, phenotype);
        self.assemble(drug, gene, &diplotype, phenotype, &rule, variants)
    }

    fn assemble(
        &self,
        drug: Drug,
        gene: Gene,
        diplotype: &Diplotype,
        phenotype: Phenotype,
        rule: &RiskRule,
        variants: Vec<VariantInfo>,
    ) -> RiskOutcome {
        RiskOutcome {
            risk_assessment: RiskAssessment {
                risk_label: rule.risk_label,
                confidence_score: rule.confidence_score,
                severity: rule.severity,
            },
            pharmacogenomic_profile: PharmacogenomicProfile {
                primary_gene: gene,
                diplotype: diplotype.label(),
                phenotype,
                detected_variants: variants,
            },
            clinical_recommendation: ClinicalRecommendation {
                dose_recommendation: rule.dose_recommendation.clone(),
                monitoring: rule.monitoring.clone(),
                rationale: rule.rationale.clone(),
                drug,
                gene,
                phenotype,
                phenotype_full: phenotype.full_name().to_string(),
            },
        }
    }
}

/// Records in, risk triple out, for one drug
pub struct RiskPipeline<'a> {
    catalog: &'a Catalog,
    strategy: MatchStrategy,
}

impl<'a> RiskPipeline<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            strategy: MatchStrategy::Auto,
        }
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Extract the drug's primary gene and resolve its risk
    pub fn run(&self, drug: Drug, records: &[RawVariantRecord]) -> Result<RiskOutcome> {
        self.run_for_gene(drug, drug.primary_gene().symbol(), records)
    }

    /// As [`run`](Self::run) with an explicit gene symbol. Fails only when the
    /// symbol is outside the catalog, before any rule lookup happens.
    pub fn run_for_gene(
        &self,
        drug: Drug,
        gene: &str,
        records: &[RawVariantRecord],
    ) -> Result<RiskOutcome> {
        let variants = VariantExtractor::new(self.catalog).extract_with(records, gene, self.strategy)?;
        let gene = self.catalog.resolve_gene(gene)?;
        Ok(RiskRuleEngine::new(self.catalog).assess(drug, gene, variants))
    }
}

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::PgxError;

/// Pharmacogenes covered by the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gene {
    CYP2D6,
    CYP2C19,
    CYP2C9,
    SLCO1B1,
    TPMT,
    DPYD,
}

impl Gene {
    pub const ALL: [Gene; 6] = [
        Gene::CYP2D6,
        Gene::CYP2C19,
        Gene::CYP2C9,
        Gene::SLCO1B1,
        Gene::TPMT,
        Gene::DPYD,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Gene::CYP2D6 => "CYP2D6",
            Gene::CYP2C19 => "CYP2C19",
            Gene::CYP2C9 => "CYP2C9",
            Gene::SLCO1B1 => "SLCO1B1",
            Gene::TPMT => "TPMT",
            Gene::DPYD => "DPYD",
        }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Gene {
    type Err = PgxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Gene::ALL
            .iter()
            .copied()
            .find(|gene| gene.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PgxError::gene_not_found(wanted.to_uppercase()))
    }
}

/// Drugs with a CPIC-style primary gene
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Drug {
    Codeine,
    Warfarin,
    Clopidogrel,
    Simvastatin,
    Azathioprine,
    Fluorouracil,
}

impl Drug {
    pub const ALL: [Drug; 6] = [
        Drug::Codeine,
        Drug::Warfarin,
        Drug::Clopidogrel,
        Drug::Simvastatin,
        Drug::Azathioprine,
        Drug::Fluorouracil,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Drug::Codeine => "CODEINE",
            Drug::Warfarin => "WARFARIN",
            Drug::Clopidogrel => "CLOPIDOGREL",
            Drug::Simvastatin => "SIMVASTATIN",
            Drug::Azathioprine => "AZATHIOPRINE",
            Drug::Fluorouracil => "FLUOROURACIL",
        }
    }

    /// Gene whose phenotype drives the risk classification for this drug
    pub fn primary_gene(&self) -> Gene {
        match self {
            Drug::Codeine => Gene::CYP2D6,
            Drug::Warfarin => Gene::CYP2C9,
            Drug::Clopidogrel => Gene::CYP2C19,
            Drug::Simvastatin => Gene::SLCO1B1,
            Drug::Azathioprine => Gene::TPMT,
            Drug::Fluorouracil => Gene::DPYD,
        }
    }

    /// "WARFARIN" -> "Warfarin"
    pub fn title_case(&self) -> String {
        let name = self.name();
        let mut out = String::with_capacity(name.len());
        out.push_str(&name[..1]);
        out.push_str(&name[1..].to_lowercase());
        out
    }
}

impl fmt::Display for Drug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Drug {
    type Err = PgxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Drug::ALL
            .iter()
            .copied()
            .find(|drug| drug.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PgxError::drug_not_supported(wanted.to_uppercase()))
    }
}

/// Value of a single INFO key on a raw record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InfoValue {
    Flag,
    Text(String),
    List(Vec<String>),
}

impl InfoValue {
    /// All string entries, a scalar being a one-element list
    pub fn entries(&self) -> &[String] {
        match self {
            InfoValue::Flag => &[],
            InfoValue::Text(value) => std::slice::from_ref(value),
            InfoValue::List(values) => values,
        }
    }
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        InfoValue::Text(value.to_string())
    }
}

impl From<Vec<&str>> for InfoValue {
    fn from(values: Vec<&str>) -> Self {
        InfoValue::List(values.into_iter().map(String::from).collect())
    }
}

/// A variant record as handed back by the record reader, before any gene
/// filtering has happened
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVariantRecord {
    pub chromosome: String,
    pub position: u64,
    /// `"."` when absent
    pub id: String,
    pub reference: String,
    pub alternates: Vec<String>,
    pub info: HashMap<String, InfoValue>,
}

impl RawVariantRecord {
    pub fn new(
        chromosome: impl Into<String>,
        position: u64,
        id: impl Into<String>,
        reference: impl Into<String>,
        alternates: Vec<String>,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            id: id.into(),
            reference: reference.into(),
            alternates,
            info: HashMap::new(),
        }
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<InfoValue>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    /// String entries stored under an INFO key, empty when the key is absent
    pub fn info_entries(&self, key: &str) -> &[String] {
        self.info.get(key).map(InfoValue::entries).unwrap_or(&[])
    }
}

/// A gene-specific, normalized variant. One per matched record and alt allele.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantInfo {
    pub gene: Gene,
    pub chromosome: String,
    pub position: u64,
    #[serde(rename = "ref")]
    pub reference: String,
    pub alt: String,
    pub rsid: Option<String>,
}

/// Functional tier of a star allele
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    None,
    Reduced,
    Normal,
    Increased,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::None,
        ActivityLevel::Reduced,
        ActivityLevel::Normal,
        ActivityLevel::Increased,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::None => "none",
            ActivityLevel::Reduced => "reduced",
            ActivityLevel::Normal => "normal",
            ActivityLevel::Increased => "increased",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown activity level '{}'", s))
    }
}

/// A star allele recognised from a marker, with its activity level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleHit {
    pub star_allele: String,
    pub activity: ActivityLevel,
}

impl AlleleHit {
    pub fn new(star_allele: impl Into<String>, activity: ActivityLevel) -> Self {
        Self {
            star_allele: star_allele.into(),
            activity,
        }
    }

    /// Reference allele assumed for any slot without an observed hit
    pub fn wildtype() -> Self {
        Self::new("*1", ActivityLevel::Normal)
    }
}

/// Unordered pair of activity levels.
///
/// Equality and hashing ignore slot order, so `reduced+none == none+reduced`.
/// The slots themselves are kept in encounter order because that is how the
/// pair is rendered and how phenotype tables are probed first.
#[derive(Debug, Clone, Copy)]
pub struct ActivityPair {
    first: ActivityLevel,
    second: ActivityLevel,
}

impl ActivityPair {
    pub fn new(first: ActivityLevel, second: ActivityLevel) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> ActivityLevel {
        self.first
    }

    pub fn second(&self) -> ActivityLevel {
        self.second
    }

    /// Slots in encounter order
    pub fn ordered(&self) -> (ActivityLevel, ActivityLevel) {
        (self.first, self.second)
    }

    pub fn swapped(&self) -> Self {
        Self::new(self.second, self.first)
    }

    /// Slots sorted low to high; identical for both orderings of a pair
    pub fn canonical(&self) -> (ActivityLevel, ActivityLevel) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }
}

impl PartialEq for ActivityPair {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for ActivityPair {}

impl Hash for ActivityPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for ActivityPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.first, self.second)
    }
}

impl FromStr for ActivityPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, second) = s
            .split_once('+')
            .ok_or_else(|| format!("activity pair '{}' is not of the form a+b", s))?;
        Ok(Self::new(first.parse()?, second.parse()?))
    }
}

impl Serialize for ActivityPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Two allele slots for one gene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diplotype {
    pub slots: [AlleleHit; 2],
}

impl Diplotype {
    pub fn new(first: AlleleHit, second: AlleleHit) -> Self {
        Self {
            slots: [first, second],
        }
    }

    pub fn wildtype() -> Self {
        Self::new(AlleleHit::wildtype(), AlleleHit::wildtype())
    }

    /// "*2/*3"
    pub fn label(&self) -> String {
        format!("{}/{}", self.slots[0].star_allele, self.slots[1].star_allele)
    }

    pub fn activity_pair(&self) -> ActivityPair {
        ActivityPair::new(self.slots[0].activity, self.slots[1].activity)
    }
}

/// Metabolizer / function phenotype class
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phenotype {
    PM,
    IM,
    NM,
    RM,
    URM,
}

impl Phenotype {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Phenotype::PM => "PM",
            Phenotype::IM => "IM",
            Phenotype::NM => "NM",
            Phenotype::RM => "RM",
            Phenotype::URM => "URM",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Phenotype::PM => "Poor Metabolizer",
            Phenotype::IM => "Intermediate Metabolizer",
            Phenotype::NM => "Normal Metabolizer",
            Phenotype::RM => "Rapid Metabolizer",
            Phenotype::URM => "Ultrarapid Metabolizer",
        }
    }
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Phenotype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PM" => Ok(Phenotype::PM),
            "IM" => Ok(Phenotype::IM),
            "NM" => Ok(Phenotype::NM),
            "RM" => Ok(Phenotype::RM),
            "URM" => Ok(Phenotype::URM),
            other => Err(format!("unknown phenotype '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskLabel {
    Safe,
    #[serde(rename = "Adjust Dosage")]
    AdjustDosage,
    Toxic,
    Ineffective,
    #[default]
    Unknown,
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::AdjustDosage => "Adjust Dosage",
            RiskLabel::Toxic => "Toxic",
            RiskLabel::Ineffective => "Ineffective",
            RiskLabel::Unknown => "Unknown",
        })
    }
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Low,
    Moderate,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        })
    }
}

/// Clinical guidance attached to a (gene, phenotype) combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRule {
    pub risk_label: RiskLabel,
    pub severity: Severity,
    pub confidence_score: f64,
    pub dose_recommendation: String,
    pub monitoring: String,
    pub rationale: String,
}

impl RiskRule {
    /// Rule used when the catalog has nothing for a (gene, phenotype)
    pub fn fallback() -> Self {
        Self {
            risk_label: RiskLabel::Unknown,
            severity: Severity::None,
            confidence_score: 0.50,
            dose_recommendation:
                "Consult current CPIC guidelines; no high-risk variant identified.".to_string(),
            monitoring: "Standard clinical monitoring.".to_string(),
            rationale:
                "Insufficient pharmacogenomic data to determine risk for this gene-drug pair."
                    .to_string(),
        }
    }
}

/// Risk assessment for the drug-gene interaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_label: RiskLabel,
    pub confidence_score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacogenomicProfile {
    pub primary_gene: Gene,
    pub diplotype: String,
    pub phenotype: Phenotype,
    pub detected_variants: Vec<VariantInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecommendation {
    pub dose_recommendation: String,
    pub monitoring: String,
    pub rationale: String,
    pub drug: Drug,
    pub gene: Gene,
    pub phenotype: Phenotype,
    pub phenotype_full: String,
}

/// The three artifacts produced by one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskOutcome {
    pub risk_assessment: RiskAssessment,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub clinical_recommendation: ClinicalRecommendation,
}

use flate2::write::GzEncoder;
use pgx_risk::config::Limits;
use pgx_risk::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::TempDir;

/// One known variant per gene. CYP2D6, CYP2C19 and CYP2C9 carry INFO
/// annotations; SLCO1B1, TPMT and DPYD rely on coordinate windows.
const MINIMAL_VCF: &str = "##fileformat=VCFv4.2\n\
##reference=GRCh37\n\
##INFO=<ID=Gene,Number=1,Type=String,Description=\"Gene symbol\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tPATIENT_001\n\
chr22\t42524947\trs3892097\tC\tT\t99\tPASS\tANN=T|splice_acceptor_variant|HIGH|CYP2D6|ENSG00000100197\tGT\t0/1\n\
chr10\t96541616\trs4244285\tG\tA\t99\tPASS\tGENEINFO=CYP2C19:1557\tGT\t0/1\n\
chr10\t96702047\trs1799853\tC\tT\t99\tPASS\tGene=CYP2C9\tGT\t0/1\n\
chr12\t21331549\trs4149056\tT\tC\t99\tPASS\tDP=40\tGT\t0/1\n\
chr6\t18139228\trs1800460\tC\tT\t99\tPASS\t.\tGT\t0/1\n\
chr1\t97915614\trs3918290\tC\tT\t99\tPASS\t.\tGT\t0/1\n\
chr3\t1000\trs0000001\tA\tG\t99\tPASS\tGene=BRCA1\tGT\t0/1\n\
chr3\tbroken\t.\tA\tG\t99\tPASS\t.\tGT\t0/1\n";

const HEADER_ONLY_VCF: &str = "##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

#[test]
fn test_all_six_drugs_end_to_end() {
    let catalog = Catalog::standard();
    catalog.validate().unwrap();

    let parsed = VcfReader::new().read_bytes(MINIMAL_VCF.as_bytes()).unwrap();
    assert_eq!(parsed.variant_count(), 7);
    assert_eq!(parsed.skipped, 1);
    assert_eq!(parsed.sample_ids, vec!["PATIENT_001".to_string()]);

    let pipeline = RiskPipeline::new(&catalog);
    let expected = [
        (Drug::Codeine, Gene::CYP2D6, "*4/*1", "rs3892097"),
        (Drug::Clopidogrel, Gene::CYP2C19, "*2/*1", "rs4244285"),
        (Drug::Warfarin, Gene::CYP2C9, "*2/*1", "rs1799853"),
        (Drug::Simvastatin, Gene::SLCO1B1, "*5/*1", "rs4149056"),
        (Drug::Azathioprine, Gene::TPMT, "*3B/*1", "rs1800460"),
        (Drug::Fluorouracil, Gene::DPYD, "*2A/*1", "rs3918290"),
    ];

    for (drug, gene, diplotype, rsid) in expected {
        let outcome = pipeline.run(drug, &parsed.records).unwrap();
        let profile = &outcome.pharmacogenomic_profile;

        assert_eq!(profile.primary_gene, gene);
        assert_eq!(profile.diplotype, diplotype, "{}", drug);
        assert_eq!(profile.phenotype, Phenotype::IM, "{}", drug);
        assert_eq!(profile.detected_variants.len(), 1, "{}", drug);
        assert_eq!(profile.detected_variants[0].rsid.as_deref(), Some(rsid));
        assert!(!profile.detected_variants[0].chromosome.starts_with("chr"));

        assert_eq!(outcome.risk_assessment.risk_label, RiskLabel::AdjustDosage);
        assert_eq!(outcome.risk_assessment.severity, Severity::Moderate);
        assert_eq!(outcome.clinical_recommendation.drug, drug);
        assert_eq!(
            outcome.clinical_recommendation.phenotype_full,
            "Intermediate Metabolizer"
        );
    }
}

#[test]
fn test_no_variants_resolves_to_normal() {
    let catalog = Catalog::standard();
    let parsed = VcfReader::new()
        .read_bytes(HEADER_ONLY_VCF.as_bytes())
        .unwrap();
    assert_eq!(parsed.variant_count(), 0);

    for drug in Drug::ALL {
        let outcome = RiskPipeline::new(&catalog).run(drug, &parsed.records).unwrap();
        assert_eq!(outcome.pharmacogenomic_profile.diplotype, "*1/*1");
        assert_eq!(outcome.pharmacogenomic_profile.phenotype, Phenotype::NM);
        assert!(outcome.pharmacogenomic_profile.detected_variants.is_empty());
    }
}

#[test]
fn test_unknown_gene_is_the_only_hard_failure() {
    let catalog = Catalog::standard();
    let pipeline = RiskPipeline::new(&catalog);
    assert!(matches!(
        pipeline.run_for_gene(Drug::Warfarin, "VKORC1", &[]),
        Err(PgxError::GeneNotFound { .. })
    ));
    assert!(pipeline.run_for_gene(Drug::Warfarin, "cyp2c9", &[]).is_ok());
}

#[test]
fn test_gzipped_file_to_reports() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let vcf_path = dir.path().join("PATIENT_001.vcf.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&vcf_path)?, flate2::Compression::default());
    encoder.write_all(MINIMAL_VCF.as_bytes())?;
    encoder.finish()?;

    let catalog = Catalog::standard();
    let limits = Limits::default();
    let explanations = ExplanationService::template_only();
    let service = AnalysisService::new(&catalog, &limits, &explanations);

    let report = service.analyze_path(&vcf_path, "PATIENT_001", Drug::Warfarin)?;
    assert!(report.quality_metrics.vcf_parsing_success);
    assert_eq!(report.quality_metrics.records_skipped, 1);
    assert!(report.timestamp.ends_with('Z'));
    assert!(report
        .llm_generated_explanation
        .summary
        .contains("your CYP2C9 diplotype is *2/*1"));

    let generator = ReportGenerator::new(&dir.path().join("out"))?;
    let written = generator.generate(&[report], ReportFormat::Json)?;
    assert_eq!(written.len(), 1);

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&written[0])?)?;
    assert_eq!(value["drug"], "WARFARIN");
    assert_eq!(value["risk_assessment"]["risk_label"], "Adjust Dosage");
    assert_eq!(value["risk_assessment"]["severity"], "moderate");
    assert_eq!(value["pharmacogenomic_profile"]["phenotype"], "IM");
    assert_eq!(
        value["pharmacogenomic_profile"]["detected_variants"][0]["ref"],
        "C"
    );
    Ok(())
}

#[test]
fn test_rejected_and_unparseable_files() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let catalog = Catalog::standard();
    let limits = Limits::default();
    let explanations = ExplanationService::template_only();
    let service = AnalysisService::new(&catalog, &limits, &explanations);

    let txt = dir.path().join("PATIENT_002.txt");
    std::fs::write(&txt, MINIMAL_VCF)?;
    assert!(matches!(
        service.analyze_path(&txt, "PATIENT_002", Drug::Codeine),
        Err(PgxError::FileValidation { .. })
    ));

    let garbage = dir.path().join("PATIENT_003.vcf");
    std::fs::write(&garbage, "THIS IS NOT A VCF FILE AT ALL\n")?;
    let report = service.analyze_path(&garbage, "PATIENT_003", Drug::Codeine)?;
    assert!(!report.quality_metrics.vcf_parsing_success);
    assert!(report.pharmacogenomic_profile.is_none());
    Ok(())
}

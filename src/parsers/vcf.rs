use std::collections::HashMap;
use std::io::{BufRead, ErrorKind};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{PgxError, Result};
use crate::parsers::{decompress, open_file, ParseResult};
use crate::types::*;

/// VCF reader producing gene-agnostic raw records
pub struct VcfReader;

impl VcfReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_path(&self, path: &Path) -> Result<ParseResult> {
        let reader = open_file(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PgxError::vcf(format!("VCF file not found: {}", path.display())),
            _ => PgxError::Io(e),
        })?;
        let result = self.read(reader)?;
        info!(
            "Parsed {} variants from {}",
            result.variant_count(),
            path.display()
        );
        Ok(result)
    }

    /// Plain or compressed VCF held in memory
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<ParseResult> {
        if bytes.is_empty() {
            return Err(PgxError::vcf("VCF input is empty"));
        }
        self.read(decompress(bytes)?)
    }

    pub fn read<R: BufRead>(&self, mut reader: R) -> Result<ParseResult> {
        let mut result = ParseResult::default();
        let mut line = String::new();
        let mut line_no = 0usize;
        let mut seen_column_header = false;

        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| PgxError::vcf(format!("unreadable input at line {}: {}", line_no + 1, e)))?;
            if read == 0 {
                break;
            }
            line_no += 1;
            let text = line.trim_end_matches(&['\n', '\r'][..]);

            if line_no == 1 {
                if !text.starts_with("##fileformat=VCF") {
                    return Err(PgxError::vcf("missing ##fileformat=VCF header"));
                }
                continue;
            }

            if let Some(meta) = text.strip_prefix("##") {
                self.parse_meta_line(meta, &mut result);
                continue;
            }

            if text.starts_with("#CHROM") {
                result.sample_ids = text
                    .split('\t')
                    .skip(9)
                    .map(|s| s.to_string())
                    .collect();
                seen_column_header = true;
                continue;
            }

            if text.trim().is_empty() {
                continue;
            }

            if !seen_column_header {
                return Err(PgxError::vcf(format!(
                    "data at line {} before the #CHROM header",
                    line_no
                )));
            }

            match self.parse_record(text) {
                Ok(record) => result.records.push(record),
                Err(reason) => {
                    warn!("Skipping malformed VCF record at line {}: {}", line_no, reason);
                    result.skipped += 1;
                }
            }
        }

        if line_no == 0 {
            return Err(PgxError::vcf("VCF input is empty"));
        }
        if !seen_column_header {
            return Err(PgxError::vcf("missing #CHROM column header"));
        }

        Ok(result)
    }

    fn parse_meta_line(&self, meta: &str, result: &mut ParseResult) {
        if let Some(reference) = meta.strip_prefix("reference=") {
            result.genome_build = Some(reference.trim().to_string());
        }
    }

    fn parse_record(&self, line: &str) -> std::result::Result<RawVariantRecord, String> {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 8 {
            return Err(format!("expected at least 8 columns, found {}", parts.len()));
        }

        let position: u64 = parts[1]
            .parse()
            .map_err(|_| format!("invalid position '{}'", parts[1]))?;
        if position == 0 {
            return Err("position must be 1-based".to_string());
        }

        let alternates = if parts[4] == "." {
            Vec::new()
        } else {
            parts[4].split(',').map(|s| s.to_string()).collect()
        };

        Ok(RawVariantRecord {
            chromosome: parts[0].to_string(),
            position,
            id: parts[2].to_string(),
            reference: parts[3].to_string(),
            alternates,
            info: self.parse_info_field(parts[7]),
        })
    }

    fn parse_info_field(&self, info_str: &str) -> HashMap<String, InfoValue> {
        let mut info_map = HashMap::new();
        if info_str == "." {
            return info_map;
        }

        for entry in info_str.split(';').filter(|e| !e.is_empty()) {
            match entry.split_once('=') {
                Some((key, value)) if value.contains(',') => {
                    info_map.insert(
                        key.to_string(),
                        InfoValue::List(value.split(',').map(|s| s.to_string()).collect()),
                    );
                }
                Some((key, value)) => {
                    info_map.insert(key.to_string(), InfoValue::Text(value.to_string()));
                }
                None => {
                    info_map.insert(entry.to_string(), InfoValue::Flag);
                }
            }
        }

        info_map
    }
}

impl Default for VcfReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const VCF: &str = "##fileformat=VCFv4.2\n\
##reference=GRCh37\n\
##INFO=<ID=Gene,Number=1,Type=String,Description=\"Gene\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n\
10\t96741053\trs1799853\tC\tT\t99\tPASS\tDP=45;Gene=CYP2C9\tGT\t0/1\n\
chr22\t42522613\t.\tC\tT,<DEL>\t95\tPASS\tANN=T|missense|MODERATE|CYP2D6|E1,T|intron|MODIFIER|CYP2D6|E2;DB\tGT\t1/1\n";

    #[test]
    fn test_read_records() {
        let result = VcfReader::new().read_bytes(VCF.as_bytes()).unwrap();
        assert_eq!(result.variant_count(), 2);
        assert_eq!(result.sample_ids, vec!["SAMPLE".to_string()]);
        assert_eq!(result.genome_build.as_deref(), Some("GRCh37"));
        assert_eq!(result.skipped, 0);

        let first = &result.records[0];
        assert_eq!(first.chromosome, "10");
        assert_eq!(first.position, 96741053);
        assert_eq!(first.id, "rs1799853");
        assert_eq!(first.info_entries("Gene"), ["CYP2C9".to_string()]);

        let second = &result.records[1];
        assert_eq!(second.chromosome, "chr22");
        assert_eq!(second.id, ".");
        assert_eq!(second.alternates, vec!["T".to_string(), "<DEL>".to_string()]);
        assert_eq!(second.info_entries("ANN").len(), 2);
        assert_eq!(second.info.get("DB"), Some(&InfoValue::Flag));
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let text = "##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
10\tnot_a_number\t.\tC\tT\t.\t.\t.\n\
10\t100\t.\tC\n\
10\t200\t.\tC\tT\t.\t.\t.\n";
        let result = VcfReader::new().read_bytes(text.as_bytes()).unwrap();
        assert_eq!(result.variant_count(), 1);
        assert_eq!(result.skipped, 2);
        assert!(result.records[0].info.is_empty());
    }

    #[test]
    fn test_rejects_empty_and_non_vcf() {
        let reader = VcfReader::new();
        assert!(matches!(reader.read_bytes(b""), Err(PgxError::VcfParse { .. })));
        assert!(matches!(
            reader.read_bytes(b"THIS IS NOT A VCF FILE AT ALL"),
            Err(PgxError::VcfParse { .. })
        ));
        assert!(matches!(
            reader.read_bytes(b"##fileformat=VCFv4.2\n"),
            Err(PgxError::VcfParse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = VcfReader::new().read_path(Path::new("/nonexistent/sample.vcf"));
        assert!(matches!(result, Err(PgxError::VcfParse { .. })));
    }

    #[test]
    fn test_read_path() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("sample.vcf");
        let mut file = std::fs::File::create(&path)?;
        file.write_all(VCF.as_bytes())?;

        let result = VcfReader::new().read_path(&path)?;
        assert_eq!(result.variant_count(), 2);
        Ok(())
    }
}

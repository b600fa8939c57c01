use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const VCF_SUFFIXES: &[&str] = &[".vcf", ".vcf.gz", ".vcf.bgz", ".vcf.bz2", ".vcf.xz"];

/// Finds VCF files among explicit files and directories
pub struct FileDiscovery {
    recursive: bool,
}

impl FileDiscovery {
    pub fn new(recursive: bool) -> Self {
        Self { recursive }
    }

    /// Explicit files are kept as given; directories are scanned for VCFs.
    /// Duplicates are removed, first occurrence wins.
    pub fn discover(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                files.push(path.clone());
            } else if path.is_dir() {
                files.extend(self.discover_in_directory(path)?);
            } else {
                anyhow::bail!("No such file or directory: {}", path.display());
            }
        }

        let mut seen = HashSet::new();
        files.retain(|path| seen.insert(path.clone()));

        Ok(files)
    }

    fn discover_in_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        if self.recursive {
            for entry in WalkDir::new(dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && is_vcf_file(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            let entries = fs::read_dir(dir)
                .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

            for entry in entries {
                let entry = entry.with_context(|| {
                    format!("Failed to read directory entry in: {}", dir.display())
                })?;
                let path = entry.path();

                if path.is_file() && is_vcf_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
        }

        Ok(files)
    }
}

/// Name ends in `.vcf`, optionally followed by a compression suffix
pub fn is_vcf_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.to_string_lossy().to_lowercase();
            VCF_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
        })
        .unwrap_or(false)
}

/// Patient id derived from a VCF file name: "cohort/P01.vcf.gz" -> "P01"
pub fn patient_id_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let lower = name.to_ascii_lowercase();
    let cut = VCF_SUFFIXES
        .iter()
        .rev()
        .find(|suffix| lower.ends_with(*suffix))
        .map(|suffix| name.len() - suffix.len())
        .unwrap_or(name.len());
    name[..cut].to_string()
}

use std::path::Path;

use anyhow::{Context, Result};
use seo_audit::{Extraction, RequirementExtractor};
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::model::{ExtractionManifest, MANIFEST_VERSION};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: ExtractArgs) -> Result<()> {
    let extractor =
        RequirementExtractor::new().context("failed to compile roadmap patterns")?;
    let extraction = extractor
        .extract_path(&args.report)
        .with_context(|| format!("failed to extract requirements from {}", args.report.display()))?;

    for warning in &extraction.diagnostics.warnings {
        warn!(warning = %warning, "extraction warning");
    }

    if args.dry_run {
        info!(
            primary_keyword = %extraction.requirements.primary_keyword,
            lsi_keywords = extraction.requirements.lsi_keywords.len(),
            warnings = extraction.diagnostics.warnings.len(),
            "extract dry-run complete"
        );
        return Ok(());
    }

    let manifest = build_manifest(&args.report, extraction)?;
    let output_path = args
        .output
        .unwrap_or_else(|| args.cache_root.join("manifests").join("requirements.json"));

    write_json_pretty(&output_path, &manifest)?;
    info!(path = %output_path.display(), "wrote requirements manifest");

    Ok(())
}

pub fn build_manifest(source: &Path, extraction: Extraction) -> Result<ExtractionManifest> {
    let requirements = extraction
        .requirements
        .to_value()
        .context("failed to serialize requirement model")?;

    Ok(ExtractionManifest {
        manifest_version: MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source_path: source.display().to_string(),
        source_sha256: sha256_file(source)?,
        requirements,
        diagnostics: extraction.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use seo_audit::workbook::Workbook;

    use super::*;

    #[test]
    fn manifest_carries_model_diagnostics_and_source_hash() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("audit.xlsx");
        std::fs::write(&source, b"abc").expect("write source");

        let extraction = RequirementExtractor::new()
            .expect("patterns compile")
            .extract(&Workbook::default());
        let manifest = build_manifest(&source, extraction).expect("manifest");

        assert_eq!(manifest.manifest_version, MANIFEST_VERSION);
        assert_eq!(
            manifest.source_sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(manifest.requirements["word_count"], 1500);
        assert_eq!(manifest.requirements["heading_structure"]["H1"], 1);
        assert_eq!(manifest.diagnostics.warnings.len(), 4);
    }
}

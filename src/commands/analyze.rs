use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use seo_audit::content::extract_markdown_body;
use seo_audit::{ComplianceAnalyzer, ComplianceReport, PhraseMatcher, RequirementModel};
use tracing::{debug, info};

use crate::cli::AnalyzeArgs;
use crate::model::{AnalysisManifest, MANIFEST_VERSION};
use crate::util::{now_utc_string, read_json, read_text, sha256_file, write_json_pretty};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let payload = read_json(&args.requirements)?;
    let requirements = load_requirements(&payload)
        .with_context(|| format!("invalid requirements in {}", args.requirements.display()))?;

    let overrides = args.overrides();
    let requirements = if overrides.is_empty() {
        requirements
    } else {
        debug!(?overrides, "applying requirement overrides");
        requirements.with_overrides(&overrides)
    };

    let content = extract_markdown_body(&read_text(&args.content)?);
    let analyzer =
        ComplianceAnalyzer::with_matcher(PhraseMatcher::with_cache_capacity(args.phrase_cache_capacity))
            .context("failed to compile analysis patterns")?;
    let report = analyzer.analyze(&content, &requirements);

    log_summary(&report);

    let manifest = AnalysisManifest {
        manifest_version: MANIFEST_VERSION,
        generated_at: now_utc_string(),
        requirements_path: args.requirements.display().to_string(),
        content_path: args.content.display().to_string(),
        content_sha256: sha256_file(&args.content)?,
        report,
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.cache_root.join("manifests").join("analysis.json"));
    write_json_pretty(&output_path, &manifest)?;
    info!(path = %output_path.display(), "wrote analysis manifest");

    if args.json {
        write_json_report(&manifest.report)?;
    }

    Ok(())
}

pub fn load_requirements(payload: &Value) -> Result<RequirementModel> {
    let inner = match payload {
        Value::Object(fields) if fields.contains_key("manifest_version") => fields
            .get("requirements")
            .context("extraction manifest has no requirements")?,
        other => other,
    };
    Ok(RequirementModel::from_value(inner)?)
}

fn log_summary(report: &ComplianceReport) {
    info!(
        score = report.score,
        word_count = report.word_count,
        word_count_target = report.word_count_target,
        primary_keyword_count = report.primary_keyword_count,
        primary_keyword_density = report.primary_keyword_density,
        lsi_met = report.lsi_keywords_met(),
        lsi_total = report.lsi_keywords.len(),
        entities_met = report.entities_met(),
        entities_total = report.entities.len(),
        images = report.image_count,
        "content analysis complete"
    );
    for component in report.shortfalls() {
        info!(
            component = component.name,
            earned = component.earned,
            max = component.max,
            "score shortfall"
        );
    }
}

fn write_json_report(report: &ComplianceReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, report)
        .context("failed to serialize report json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

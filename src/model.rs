use serde::Serialize;
use serde_json::Value;

use seo_audit::{ComplianceReport, ExtractionDiagnostics};

pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub requirements: Value,
    pub diagnostics: ExtractionDiagnostics,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub requirements_path: String,
    pub content_path: String,
    pub content_sha256: String,
    pub report: ComplianceReport,
}

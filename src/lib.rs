pub mod analyze;
pub mod clean;
pub mod content;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod report;
pub mod requirements;
pub mod targets;
pub mod workbook;

pub use analyze::ComplianceAnalyzer;
pub use error::{ExtractError, ExtractWarning, RequirementsError};
pub use extract::{Extraction, ExtractionDiagnostics, RequirementExtractor};
pub use matcher::PhraseMatcher;
pub use report::ComplianceReport;
pub use requirements::{HeadingLevel, HeadingTally, RequirementModel, RequirementOverrides};

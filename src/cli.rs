use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use seo_audit::matcher::DEFAULT_CACHE_CAPACITY;
use seo_audit::{HeadingLevel, RequirementOverrides};

#[derive(Parser, Debug)]
#[command(
    name = "seo-audit",
    version,
    about = "SEO audit workbook extraction and content compliance scoring"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Analyze(AnalyzeArgs),
    Outline(OutlineArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = ".cache/seo-audit")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub report: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(long, default_value = ".cache/seo-audit")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub requirements: PathBuf,

    #[arg(long)]
    pub content: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub h1: Option<u32>,

    #[arg(long)]
    pub h2: Option<u32>,

    #[arg(long)]
    pub h3: Option<u32>,

    #[arg(long)]
    pub h4: Option<u32>,

    #[arg(long)]
    pub h5: Option<u32>,

    #[arg(long)]
    pub h6: Option<u32>,

    #[arg(long)]
    pub word_count: Option<u32>,

    #[arg(long = "custom-entity")]
    pub custom_entities: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub phrase_cache_capacity: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl AnalyzeArgs {
    pub fn overrides(&self) -> RequirementOverrides {
        let mut overrides = RequirementOverrides {
            word_count_target: self.word_count,
            custom_entities: (!self.custom_entities.is_empty())
                .then(|| self.custom_entities.clone()),
            ..RequirementOverrides::default()
        };

        let headings = [self.h1, self.h2, self.h3, self.h4, self.h5, self.h6];
        for (level, value) in HeadingLevel::ALL.into_iter().zip(headings) {
            if let Some(value) = value {
                overrides.set_heading_target(level, value);
            }
        }
        overrides
    }
}

#[derive(Args, Debug, Clone)]
pub struct OutlineArgs {
    #[arg(long)]
    pub content: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

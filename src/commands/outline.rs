use std::io::{self, Write};

use anyhow::{Context, Result};
use seo_audit::content::{OutlineEntry, OutlineReader};
use tracing::{info, warn};

use crate::cli::OutlineArgs;
use crate::util::read_text;

pub fn run(args: OutlineArgs) -> Result<()> {
    let raw = read_text(&args.content)?;
    let reader = OutlineReader::new().context("failed to compile outline patterns")?;
    let outline = reader.extract_headings(&raw);

    if outline.is_empty() {
        warn!(path = %args.content.display(), "no headings found");
    } else {
        info!(headings = outline.len(), "read heading outline");
    }

    if args.json {
        write_json_outline(&outline)
    } else {
        write_text_outline(&outline)
    }
}

fn write_json_outline(outline: &[OutlineEntry]) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, outline)
        .context("failed to serialize outline json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_outline(outline: &[OutlineEntry]) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    for entry in outline {
        let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
        writeln!(output, "{indent}H{}: {}", entry.level, entry.text)?;
    }
    output.flush()?;
    Ok(())
}

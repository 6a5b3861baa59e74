use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use bump_operations::operations::BumpOutput;
use clap::ValueEnum;

use crate::environment;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// `NEW_VERSION=<version>` on stdout, summary on stderr
    #[default]
    Text,
    /// The full run report as JSON on stdout
    Json,
}

pub(crate) fn report(output: &BumpOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            eprint!("{}", summary(output));
            println!("{}", new_version_line(output));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(output)?);
        }
    }

    if let Some(path) = environment::run_output_file() {
        append_line(&path, &new_version_line(output))?;
        tracing::debug!(path = %path.display(), "appended run output");
    }

    Ok(())
}

fn new_version_line(output: &BumpOutput) -> String {
    format!("NEW_VERSION={}", output.new_version)
}

fn summary(output: &BumpOutput) -> String {
    let mut text = String::new();

    let _ = write!(
        text,
        "{} -> {} ({}",
        output.previous_version, output.new_version, output.mode
    );
    if let Some(release_type) = output.release_type {
        let _ = write!(text, ", {release_type}");
    }
    if output.synchronized {
        text.push_str(", synchronized");
    }
    text.push_str(")\n");

    if let Some(tag) = &output.latest_tag {
        let _ = writeln!(text, "Changes since {tag}");
    }

    text.push_str("Updated packages:\n");
    for name in &output.updated_packages {
        let _ = writeln!(text, "  {name}");
    }

    if output.dry_run {
        text.push_str("Dry run - no files were written. Would write:\n");
        for write in &output.writes {
            let _ = writeln!(text, "  {}", write.path().display());
        }
    }

    text
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let to_error = |source| CliError::RunOutput {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)?;
    writeln!(file, "{line}").map_err(to_error)
}

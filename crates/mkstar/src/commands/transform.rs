//! `mkstar transform` command implementation.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use mkstar_transform::Pipeline;

use crate::error::CliError;

/// Arguments for the transform command.
#[derive(Args)]
pub(crate) struct TransformArgs {
    /// Markdown file to convert (default: read stdin).
    file: Option<PathBuf>,
}

impl TransformArgs {
    /// Execute the transform command, writing the converted text to stdout.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let input = read_input(self.file.as_deref())?;
        let conversion = Pipeline::new().run(&input);
        tracing::info!(
            admonitions = conversion.stats.admonitions,
            tab_groups = conversion.stats.tab_groups,
            "Transformed input"
        );

        let mut stdout = io::stdout().lock();
        stdout.write_all(conversion.output.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

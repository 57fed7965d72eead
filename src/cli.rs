use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::core::parser::InputStyle;
use crate::core::writer::OutputStyle;
use crate::core::Engine;

#[derive(Parser)]
#[command(name = "docshift")]
#[command(about = "Convert Python docstrings between documentation styles")]
#[command(version)]
pub struct Cli {
    /// The directory or file to convert
    pub source: PathBuf,

    /// Input docstring style: guess, rest, epytext (default: guess)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output docstring style: rest, epytext, google, numpy (default: google)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the changes to the input files instead of printing diffs
    #[arg(long)]
    pub in_place: bool,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of threads to use (default: cpu count)
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn execute(self, mut engine: Engine) -> Result<()> {
        // flags override values from the configuration file
        if let Some(input) = &self.input {
            engine.config_mut().input_style = input.parse::<InputStyle>()?;
        }
        if let Some(output) = &self.output {
            engine.config_mut().output_style = output.parse::<OutputStyle>()?;
        }
        engine
            .convert(&self.source, self.threads, self.in_place)
            .await?;
        Ok(())
    }
}

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flowscript_core::options::{DEFAULT_FALSE_LABEL, DEFAULT_TRUE_LABEL};
use flowscript_core::{CompileOptions, CoreError, Diagnostic, Direction, Theme, compile, compile_dir};
use tracing::{Level, info};

/// Extension given to flowcharts written in batch mode.
const OUTPUT_EXTENSION: &str = "mmd";

/// Compile FlowScript pseudocode into a flowchart.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, help = "Source file to compile (reads stdin when absent)")]
    input: Option<String>,

    #[arg(
        short,
        long,
        help = "Output file, or output directory with --batch (writes stdout when absent)"
    )]
    output: Option<String>,

    #[arg(
        long,
        value_name = "DIR",
        conflicts_with = "input",
        requires = "output",
        help = "Compile every .flow file below DIR into the output directory"
    )]
    batch: Option<String>,

    #[arg(
        long,
        value_name = "DIRECTION",
        default_value = "TD",
        help = "Flowchart direction: TD, LR"
    )]
    direction: String,

    #[arg(long, value_name = "LABEL", default_value = DEFAULT_TRUE_LABEL)]
    true_label: String,

    #[arg(long, value_name = "LABEL", default_value = DEFAULT_FALSE_LABEL)]
    false_label: String,

    #[arg(
        long,
        value_name = "THEME",
        default_value = "none",
        help = "Style theme: none, bright, vivid"
    )]
    theme: String,

    #[arg(short, long, help = "Log pipeline details to stderr")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(cli)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let options = compile_options(&cli)?;

    if let Some(dir) = &cli.batch {
        let output = cli.output.as_deref().context("--batch requires --output")?;
        return compile_batch(Path::new(dir), Path::new(output), &options);
    }

    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {path}"))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let flowchart = match compile(&source, &options) {
        Ok(flowchart) => flowchart,
        Err(err) => {
            eprint!("{}", Diagnostic::from_error(&err).render(&source));
            return Err(err).context("compilation failed");
        }
    };

    match &cli.output {
        Some(path) => {
            write_output(Path::new(path), &flowchart)?;
            info!(path = %path, "wrote flowchart");
        }
        None => print!("{flowchart}"),
    }
    Ok(())
}

fn compile_options(cli: &Cli) -> Result<CompileOptions> {
    let direction: Direction = cli.direction.parse()?;
    let theme: Theme = cli.theme.parse()?;
    Ok(CompileOptions::default()
        .with_true_label(cli.true_label.as_str())
        .with_false_label(cli.false_label.as_str())
        .with_direction(direction)
        .with_theme(theme))
}

fn compile_batch(dir: &Path, output: &Path, options: &CompileOptions) -> Result<()> {
    let compiled = match compile_dir(dir, options) {
        Ok(compiled) => compiled,
        Err(err) => {
            report_source_error(dir, &err);
            return Err(err).context("batch compilation failed");
        }
    };

    for source in &compiled {
        let target = output.join(batch_target(&source.path));
        write_output(&target, &source.flowchart)?;
        info!(source = %source.path.display(), target = %target.display(), "wrote flowchart");
    }
    info!(files = compiled.len(), "batch complete");
    Ok(())
}

/// Output path for a source, relative to the output directory.
fn batch_target(source: &Path) -> PathBuf {
    source.with_extension(OUTPUT_EXTENSION)
}

fn report_source_error(dir: &Path, err: &CoreError) {
    if let CoreError::InSource { path, error } = err {
        if let Ok(source) = fs::read_to_string(dir.join(path)) {
            eprint!(
                "{}: {}",
                path.display(),
                Diagnostic::from_error(error).render(&source)
            );
        }
    }
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    Ok(())
}

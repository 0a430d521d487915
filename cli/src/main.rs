mod batch;
mod config;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use nexus::block::BlockBody;
use nexus::parser::ParseError;
use preflight::{BuildStep, PreflightError, ProcessLauncher, StepOutcome};

use crate::batch::CheckOutcome;
use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "mbrun",
    version,
    about = "Run MrBayes on a NEXUS file after checking it can run unattended"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (default: $MBRUN_CONFIG, then ./mbrun.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that NEXUS files have an mrbayes block with autoclose=yes
    Check(CheckArgs),

    /// Check the input file, then run MrBayes on it
    Run(RunArgs),

    /// List the blocks of a NEXUS file
    Blocks(BlocksArgs),

    /// List configured MrBayes installations
    Installations,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// NEXUS files, or directories to search for *.nex / *.nexus / *.nxs files
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Installation name (default: defaults.installation from the config)
    #[arg(short, long)]
    installation: Option<String>,

    /// NEXUS input file, relative to the working directory
    #[arg(short = 'f', long)]
    input: String,

    /// Working directory for MrBayes
    #[arg(short = 'C', long, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Launch without checking the mrbayes block
    #[arg(long)]
    skip_block_check: bool,

    /// Extra environment variable for MrBayes. Repeatable.
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,
}

#[derive(clap::Args)]
struct BlocksArgs {
    /// NEXUS file to inspect
    file: PathBuf,

    /// Print every command of each block
    #[arg(long)]
    commands: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let exit_code = match cli.command {
        Command::Check(args) => do_check(args, cli.no_color, color_choice),
        Command::Blocks(args) => do_blocks(args, color_choice),
        Command::Run(args) => match load_config(cli.config.as_deref()) {
            Some(config) => do_run(args, &config, color_choice),
            None => 2,
        },
        Command::Installations => match load_config(cli.config.as_deref()) {
            Some(config) => do_installations(&config),
            None => 2,
        },
    };
    process::exit(exit_code);
}

fn load_config(path: Option<&Path>) -> Option<Config> {
    match Config::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("error: {}", e);
            None
        }
    }
}

fn do_check(args: CheckArgs, no_color: bool, color_choice: ColorChoice) -> i32 {
    let (dirs, files): (Vec<PathBuf>, Vec<PathBuf>) =
        args.paths.into_iter().partition(|p| p.is_dir());

    // Single file: show the checker's own lines and full diagnostics
    if dirs.is_empty() && files.len() == 1 {
        let result = batch::check_one(&files[0]);
        for line in &result.log {
            println!("{}", line);
        }
        return match &result.outcome {
            CheckOutcome::Pass(_) => {
                eprintln!("ok: {} can run unattended", result.path.display());
                0
            }
            CheckOutcome::Fail(err) => {
                emit_preflight_error(err, color_choice);
                1
            }
        };
    }

    let mut roots = dirs;
    let mut exit_code = 0;
    for file in files {
        let result = batch::check_one(&file);
        match &result.outcome {
            CheckOutcome::Pass(_) => eprintln!("ok: {}", file.display()),
            CheckOutcome::Fail(err) => {
                eprintln!("error: {}", err);
                exit_code = 1;
            }
        }
    }
    if !roots.is_empty() {
        roots.sort();
        exit_code = exit_code.max(batch::check_directories(&roots, no_color));
    }
    exit_code
}

fn do_run(args: RunArgs, config: &Config, color_choice: ColorChoice) -> i32 {
    let Some(installation) = args
        .installation
        .or_else(|| config.defaults.installation.clone())
    else {
        eprintln!("error: no installation given (use --installation or set defaults.installation)");
        return 2;
    };

    let working_dir = args.workdir.unwrap_or_else(|| PathBuf::from("."));

    // Pass our environment through, with --env entries on top
    let mut env: BTreeMap<String, String> = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();
    env.extend(args.env);

    let step = BuildStep::new(installation, args.input)
        .with_block_check(config.defaults.check_block && !args.skip_block_check);

    let mut stdout = std::io::stdout();
    match step.perform(
        &config.registry(),
        &working_dir,
        &env,
        &ProcessLauncher,
        &mut stdout,
    ) {
        Ok(StepOutcome::Succeeded) => 0,
        Ok(StepOutcome::Failed { .. }) => 1,
        Err(err) => {
            emit_preflight_error(&err, color_choice);
            1
        }
    }
}

fn do_blocks(args: BlocksArgs, color_choice: ColorChoice) -> i32 {
    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file.display(), e);
            return 1;
        }
    };

    let parser = nexus::parser::Parser::new(source, 0);
    let document = match parser.parse() {
        Ok(d) => d,
        Err(errors) => {
            emit_parse_diagnostics(&args.file, parser.source(), &errors, color_choice);
            return 1;
        }
    };
    emit_parse_diagnostics(&args.file, parser.source(), &document.warnings, color_choice);

    for block in &document.blocks {
        let count = block.commands().len();
        let plural = if count == 1 { "" } else { "s" };
        match &block.body {
            BlockBody::MrBayes(mb) => {
                let execute = mb.execute_target().unwrap_or("-");
                println!(
                    "{} ({} command{})  autoclose={} nowarn={} execute={}",
                    block.name, count, plural, mb.autoclose, mb.nowarn, execute
                );
            }
            BlockBody::Opaque(_) => println!("{} ({} command{})", block.name, count, plural),
        }
        if args.commands {
            for command in block.commands() {
                println!("    {}", command);
            }
        }
    }
    0
}

fn do_installations(config: &Config) -> i32 {
    let registry = config.registry();
    if registry.is_empty() {
        eprintln!("no installations configured");
        return 0;
    }
    let default = config.defaults.installation.as_deref();
    for installation in registry.iter() {
        let marker = if Some(installation.name.as_str()) == default {
            " (default)"
        } else {
            ""
        };
        println!(
            "{}\t{}{}",
            installation.name,
            installation.executable.display(),
            marker
        );
    }
    0
}

/// Render source-located diagnostics, then the one-line abort reason.
fn emit_preflight_error(error: &PreflightError, color_choice: ColorChoice) {
    if let PreflightError::Parse {
        path,
        diagnostics,
        text,
        ..
    } = error
    {
        emit_parse_diagnostics(path, text, diagnostics, color_choice);
    }
    eprintln!("error: {}", error);
}

fn emit_parse_diagnostics(
    path: &Path,
    source: &str,
    diagnostics: &[ParseError],
    color_choice: ColorChoice,
) {
    if diagnostics.is_empty() {
        return;
    }
    // Parsers are created with file id 0, which is the first id SimpleFiles hands out
    let mut files = SimpleFiles::new();
    files.add(path.display().to_string(), source.to_string());

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for error in diagnostics {
        let diagnostic = error.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
    }
}

/// Parse `KEY=VALUE` for --env.
fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

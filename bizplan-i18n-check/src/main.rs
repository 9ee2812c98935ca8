mod reports;
mod util;

use anyhow::{Context, Result};
use bizplan_i18n::{CheckConfig, I18nError, LocaleDir, TreeLoader, fill_locales, validate_with};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use reports::{
    ReportContext, RunOutcome, write_console_report, write_json_report, write_markdown_report,
};
use util::{report_timestamp, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Compare every locale against the base locale
    Check,
    /// Backfill untranslated keys from the base locale
    Fill,
    /// Fill first, then check what is left
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "bizplan-i18n-check", version)]
#[command(about = "Locale consistency checker and gap filler for the business plan site")]
struct Args {
    /// What to run
    #[arg(long, value_enum, default_value_t = Mode::Check)]
    mode: Mode,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// List the discovered locales and exit
    #[arg(long)]
    list_locales: bool,

    /// Report what fill would change without writing files
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the locale files
    #[arg(long)]
    locales_dir: Option<PathBuf>,

    /// Locale used as the schema of record
    #[arg(long)]
    base_locale: Option<String>,

    /// Target locales to check (comma-separated, default: all discovered)
    #[arg(long)]
    locales: Option<String>,

    /// Key prefixes under which extra keys are reported (comma-separated)
    #[arg(long)]
    sensitive_prefixes: Option<String>,

    /// Fail on empty values and placeholder mismatches too
    #[arg(long)]
    strict: bool,
}

const EXIT_ISSUES: u8 = 1;
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_ISSUES),
        Err(err) => {
            eprintln!("{} {err:#}", "❌".red());
            if let Some(I18nError::BaseLocale { .. }) = err.downcast_ref::<I18nError>() {
                eprintln!("   check --locales-dir and --base-locale");
            }
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Returns whether the run passed. Errors are fatal.
fn run(args: &Args) -> Result<bool> {
    let config = resolve_config(args)?;
    let source = LocaleDir::new(&config.locales_dir);

    if args.list_locales {
        list_locales(args, &source, &config)?;
        return Ok(true);
    }

    if args.report == ReportFormat::Console && args.output.is_none() {
        announce_banner();
    }

    let start_time = Instant::now();
    let fills = if matches!(args.mode, Mode::Fill | Mode::Both) {
        Some(fill_locales(&source, &config, args.dry_run)?)
    } else {
        None
    };
    let checks = if matches!(args.mode, Mode::Check | Mode::Both) {
        Some(validate_with(&source, &config)?)
    } else {
        None
    };
    let outcome = RunOutcome { checks, fills };
    log::debug!("run finished in {:?}", start_time.elapsed());

    write_reports(args, &config, &outcome, start_time)?;
    Ok(outcome.passed(config.strict))
}

fn resolve_config(args: &Args) -> Result<CheckConfig> {
    let mut config = match &args.config {
        Some(path) => CheckConfig::load(path)?,
        None => CheckConfig::default(),
    };
    if let Some(dir) = &args.locales_dir {
        config.locales_dir.clone_from(dir);
    }
    if let Some(base) = &args.base_locale {
        config.base_locale.clone_from(base);
    }
    if let Some(locales) = &args.locales {
        config.locales = split_csv(locales);
    }
    if let Some(prefixes) = &args.sensitive_prefixes {
        config.sensitive_prefixes = split_csv(prefixes);
    }
    if args.strict {
        config.strict = true;
    }
    Ok(config)
}

fn list_locales(args: &Args, source: &LocaleDir, config: &CheckConfig) -> Result<()> {
    let locales = source
        .list_locales()
        .with_context(|| format!("failed to list {}", source.root().display()))?;
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available locales:")?;
    for locale in locales {
        let marker = if locale == config.base_locale {
            " (base)"
        } else {
            ""
        };
        writeln!(output_target.writer(), "  {locale}{marker}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🌍 Business Plan i18n Check".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn write_reports(
    args: &Args,
    config: &CheckConfig,
    outcome: &RunOutcome,
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let ctx = ReportContext {
        config,
        dry_run: args.dry_run,
        verbose: args.verbose,
        generated_at: report_timestamp(),
    };

    match args.report {
        ReportFormat::Json => write_json_report(output_target.writer(), outcome, &ctx)?,
        ReportFormat::Markdown => write_markdown_report(output_target.writer(), outcome, &ctx)?,
        ReportFormat::Console => {
            write_console_report(output_target.writer(), outcome, &ctx)?;
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Finished {} in {duration:?}",
                ctx.generated_at
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

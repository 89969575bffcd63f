use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use qacheck_core::QaError;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod ui;

mod commands;
mod highlight;
mod report;

#[derive(Parser)]
#[command(
    name = "qacheck",
    version,
    about = "Translation QA checker: flags placeholder, number, tag, glossary, empty and length defects"
)]
struct Cli {
    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// Silence log lines on stderr
    #[arg(long, global = true)]
    quiet: bool,

    /// Also write debug logs to a daily-rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align source and target, run all checks and report issues
    Check(commands::check::CheckArgs),

    /// Check every bilingual file (csv, tsv, xlsx, json, po) in a directory
    Batch(commands::batch::BatchArgs),

    /// Print aligned pairs without checking them
    Align(commands::align::AlignArgs),

    /// Write JSON schemas of the report formats
    Schema {
        #[arg(long, default_value = "./schemas")]
        out_dir: PathBuf,
    },
}

/// Issues were found and `--fail-on-issues` was given.
pub const EXIT_ISSUES: u8 = 1;
/// An input cannot be used in the role it was given.
const EXIT_USAGE: u8 = 2;
/// Any other failure: unreadable input, parse error, bad config.
const EXIT_FAILURE: u8 = 3;

/// Per-invocation settings shared by all commands.
pub struct Ctx {
    pub use_color: bool,
    pub cfg: qacheck_config::QaCheckConfig,
}

trait Runnable {
    fn run(self, ctx: &Ctx) -> Result<ExitCode>;
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Check(_) => "check",
            Commands::Batch(_) => "batch",
            Commands::Align(_) => "align",
            Commands::Schema { .. } => "schema",
        }
    }
}

impl Runnable for Commands {
    fn run(self, ctx: &Ctx) -> Result<ExitCode> {
        let cmd_name = self.name();
        info!("▶ Starting command: {}", cmd_name);

        let result = match self {
            Commands::Check(args) => commands::check::run_check(args, ctx),
            Commands::Batch(args) => commands::batch::run_batch(args, ctx),
            Commands::Align(args) => commands::align::run_align(args, ctx),
            Commands::Schema { out_dir } => {
                commands::schema::run_schema(out_dir).map(|_| ExitCode::SUCCESS)
            }
        };

        match &result {
            Ok(_) => info!("✔ Finished command: {}", cmd_name),
            Err(e) => error!("✖ Command {} failed: {:?}", cmd_name, e),
        }

        result
    }
}

fn init_tracing(quiet: bool, ansi: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let console_filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let file_appender = rolling::daily(dir, "qacheck.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(file_writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let colors_allowed = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
    let _guard = init_tracing(
        cli.quiet,
        colors_allowed && std::io::stderr().is_terminal(),
        cli.log_dir.as_deref(),
    );

    let cfg = match qacheck_config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            ui_warn!("ignoring config: {e}");
            Default::default()
        }
    };
    let ctx = Ctx {
        use_color: colors_allowed && std::io::stdout().is_terminal(),
        cfg,
    };

    match cli.cmd.run(&ctx) {
        Ok(code) => Ok(code),
        Err(e) => match e.downcast_ref::<QaError>() {
            Some(QaError::UnsupportedFormat { .. } | QaError::SourceOnlyFormat { .. }) => {
                ui_err!("{e}");
                ui_info!("supported inputs: csv, tsv, txt, json, po, xlsx, docx, pptx, pdf (source only)");
                Ok(ExitCode::from(EXIT_USAGE))
            }
            _ => {
                ui_err!("{e:?}");
                Ok(ExitCode::from(EXIT_FAILURE))
            }
        },
    }
}

use std::path::PathBuf;
use std::process::ExitCode;

use color_eyre::eyre::{eyre, Result};
use qacheck_services::{BatchOptions, BatchOutcome, CheckOptions};

use super::{load_glossary, resolve_format, OutputFormat, RatioArgs};
use crate::Ctx;

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Directory holding bilingual files
    #[arg(long)]
    pub root: PathBuf,

    #[arg(long)]
    pub glossary: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    #[command(flatten)]
    pub ratio: RatioArgs,

    /// text or json
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Exit with status 1 when any file has issues (other failures exit 3)
    #[arg(long, default_value_t = false)]
    pub fail_on_issues: bool,
}

pub fn run_batch(args: BatchArgs, ctx: &Ctx) -> Result<ExitCode> {
    tracing::debug!(event = "batch_args", root = ?args.root, recursive = args.recursive);

    let format = resolve_format(args.format, &ctx.cfg)?;
    if format == OutputFormat::Csv {
        return Err(eyre!("batch supports --format text or json"));
    }
    let batch_cfg = ctx.cfg.batch.clone().unwrap_or_default();
    let opts = CheckOptions {
        limits: args.ratio.resolve(&ctx.cfg)?,
        run_config: ctx.cfg.run_config(),
        ..Default::default()
    };
    let glossary = load_glossary(args.glossary, &ctx.cfg)?;
    let batch = BatchOptions {
        recursive: args.recursive || batch_cfg.recursive.unwrap_or(false),
        exclude: glossary.iter().map(|(p, _)| p.clone()).collect(),
    };

    let outcome =
        qacheck_services::check_batch(&args.root, glossary.as_ref().map(|(_, g)| g), &opts, &batch)?;

    match format {
        OutputFormat::Json => crate::report::print_json(&outcome.to_report())?,
        _ => print_text(&outcome, ctx),
    }

    let fail = args.fail_on_issues || batch_cfg.fail_on_issues.unwrap_or(false);
    if fail && outcome.totals().issues > 0 {
        return Ok(ExitCode::from(crate::EXIT_ISSUES));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_text(outcome: &BatchOutcome, ctx: &Ctx) {
    for f in &outcome.files {
        println!("== {}", f.path.display());
        crate::report::print_issues(
            &f.outcome.issues,
            f.outcome.stats,
            ctx.cfg.list_limit,
            false,
            ctx.use_color,
        );
    }
    for s in &outcome.skipped {
        if s.unsupported {
            crate::ui_warn!("skipped {}: {}", s.path.display(), s.reason);
        } else {
            crate::ui_err!("failed {}: {}", s.path.display(), s.reason);
        }
    }
    let totals = outcome.totals();
    println!(
        "Files: {} checked, {} skipped. {}",
        outcome.files.len(),
        outcome.skipped.len(),
        crate::report::summary_line(totals, ctx.use_color)
    );
}

use std::path::PathBuf;
use std::process::ExitCode;

use color_eyre::eyre::{eyre, Result};
use qacheck_domain::CheckReport;
use qacheck_services::{CheckOptions, CheckOutcome};

use super::{load_glossary, resolve_align, resolve_format, AlignArg, OutputFormat, RatioArgs};
use crate::Ctx;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Source-language file (csv, tsv, txt, json, po, xlsx, docx, pptx, pdf)
    #[arg(long, required_unless_present = "pairs", conflicts_with = "pairs")]
    pub source: Option<PathBuf>,

    /// Target-language file (any source format but pdf); omitted means every target is empty
    #[arg(long, requires = "source")]
    pub target: Option<PathBuf>,

    /// One file holding both sides (csv/tsv/xlsx with source+target columns, json, po)
    #[arg(long)]
    pub pairs: Option<PathBuf>,

    /// Glossary CSV with source/target columns
    #[arg(long)]
    pub glossary: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub align: Option<AlignArg>,

    #[command(flatten)]
    pub ratio: RatioArgs,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also save the issue table as CSV
    #[arg(long)]
    pub out_csv: Option<PathBuf>,

    /// Show source/target with offending tokens marked (text output)
    #[arg(long, default_value_t = false)]
    pub highlight: bool,

    /// Exit with status 1 when any issue is found (unusable inputs exit 2, other failures 3)
    #[arg(long, default_value_t = false)]
    pub fail_on_issues: bool,
}

pub fn run_check(args: CheckArgs, ctx: &Ctx) -> Result<ExitCode> {
    tracing::debug!(
        event = "check_args",
        source = ?args.source,
        target = ?args.target,
        pairs = ?args.pairs,
        glossary = ?args.glossary,
        align = ?args.align,
        format = ?args.format
    );

    let opts = CheckOptions {
        limits: args.ratio.resolve(&ctx.cfg)?,
        align: resolve_align(args.align, &ctx.cfg)?,
        run_config: ctx.cfg.run_config(),
    };
    let format = resolve_format(args.format, &ctx.cfg)?;
    let glossary = load_glossary(args.glossary, &ctx.cfg)?;
    let glossary = glossary.as_ref().map(|(_, g)| g);

    let outcome = if let Some(pairs) = &args.pairs {
        qacheck_services::check_bilingual(pairs, glossary, &opts)?
    } else if let Some(source) = &args.source {
        qacheck_services::check_files(source, args.target.as_deref(), glossary, &opts)?
    } else {
        return Err(eyre!("either --source or --pairs is required"));
    };

    if let Some(path) = &args.out_csv {
        let file = std::fs::File::create(path)?;
        qacheck_export_csv::write_issues_csv(file, &outcome.issues)?;
        crate::ui_info!("issues saved to {}", path.display());
    }

    write_outcome(&outcome, format, args.highlight, ctx)?;

    if args.fail_on_issues && outcome.stats.issues > 0 {
        return Ok(ExitCode::from(crate::EXIT_ISSUES));
    }
    Ok(ExitCode::SUCCESS)
}

fn write_outcome(outcome: &CheckOutcome, format: OutputFormat, highlight: bool, ctx: &Ctx) -> Result<()> {
    match format {
        OutputFormat::Text => {
            crate::report::print_issues(
                &outcome.issues,
                outcome.stats,
                ctx.cfg.list_limit,
                highlight,
                ctx.use_color,
            );
        }
        OutputFormat::Json => {
            let report = CheckReport::new(&outcome.issues, outcome.stats);
            crate::report::print_json(&report)?;
        }
        OutputFormat::Csv => {
            let stdout = std::io::stdout();
            qacheck_export_csv::write_issues_csv(stdout.lock(), &outcome.issues)?;
        }
    }
    Ok(())
}

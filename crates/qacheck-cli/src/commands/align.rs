use std::path::PathBuf;
use std::process::ExitCode;

use clap::ValueEnum;
use color_eyre::eyre::Result;
use qacheck_domain::PairRecord;

use super::{resolve_align, AlignArg};
use crate::Ctx;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PairsFormat {
    Csv,
    Json,
}

#[derive(clap::Args, Debug)]
pub struct AlignArgs {
    #[arg(long)]
    pub source: PathBuf,

    #[arg(long)]
    pub target: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub align: Option<AlignArg>,

    #[arg(long, value_enum, default_value = "csv")]
    pub format: PairsFormat,
}

pub fn run_align(args: AlignArgs, ctx: &Ctx) -> Result<ExitCode> {
    let mode = resolve_align(args.align, &ctx.cfg)?;
    let pairs = qacheck_services::align_files(&args.source, args.target.as_deref(), mode)?;
    tracing::info!(event = "align_done", mode = %mode, pairs = pairs.len());

    match args.format {
        PairsFormat::Csv => {
            let stdout = std::io::stdout();
            qacheck_export_csv::write_pairs_csv(stdout.lock(), &pairs)?;
        }
        PairsFormat::Json => {
            let records: Vec<PairRecord> = pairs
                .into_iter()
                .map(|p| PairRecord {
                    id: Some(p.id),
                    source: Some(p.source),
                    target: Some(p.target),
                })
                .collect();
            crate::report::print_json(&records)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

use std::fs;

pub fn run_schema(out_dir: std::path::PathBuf) -> color_eyre::Result<()> {
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
        }};
    }
    dump!(qacheck_domain::IssueRecord, "issue_record.schema.json");
    dump!(qacheck_domain::CheckReport, "check_report.schema.json");
    dump!(qacheck_domain::PairRecord, "pair_record.schema.json");
    dump!(qacheck_domain::BatchReport, "batch_report.schema.json");
    crate::ui_ok!("schemas written to {}", out_dir.display());
    Ok(())
}

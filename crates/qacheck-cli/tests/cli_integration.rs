use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;

mod helpers;
use helpers::*;

#[test]
fn help_lists_commands() {
    let out = stdout_of(bin_cmd().arg("--help"));
    for cmd in ["check", "batch", "align", "schema"] {
        assert_contains_with_context(&out, cmd, "help must list every subcommand");
    }
}

#[test]
fn check_pairs_text_report() {
    let pairs = fixture("pairs.csv");
    let mut cmd = bin_cmd();
    cmd.args(["check", "--pairs"]).arg(&pairs);
    let out = stdout_of(&mut cmd);

    assert_contains_with_context(
        &out,
        "[PLACEHOLDER_MISMATCH] 2 — Source=['{count}'], Target=[]",
        "missing placeholder issue",
    );
    assert_contains_with_context(
        &out,
        "[NUM_MISMATCH] 2 — Source=[], Target=['5']",
        "missing number issue",
    );
    assert_contains_with_context(&out, "[EMPTY_TARGET] 3 — Target is empty", "missing empty issue");
    assert_contains_with_context(
        &out,
        "Checked 3 segment(s), found 3 issue(s)",
        "missing summary",
    );
    assert!(!out.contains("] 1 —"), "segment 1 is clean:\n{out}");
}

#[test]
fn issues_do_not_fail_without_flag() {
    bin_cmd()
        .args(["check", "--pairs"])
        .arg(fixture("pairs.csv"))
        .assert()
        .success();
}

#[test]
fn fail_on_issues_exits_one() {
    bin_cmd()
        .args(["check", "--fail-on-issues", "--pairs"])
        .arg(fixture("pairs.csv"))
        .assert()
        .code(1);
}

#[test]
fn clean_file_passes_with_fail_on_issues() {
    bin_cmd()
        .args(["check", "--fail-on-issues", "--pairs"])
        .arg(fixture("clean.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found in 2 segment(s)"));
}

#[test]
fn text_files_align_by_line() {
    let out = stdout_of(
        bin_cmd()
            .args(["check", "--source"])
            .arg(fixture("en.txt"))
            .arg("--target")
            .arg(fixture("fr.txt")),
    );
    // blank line in en.txt is dropped, so the third line has no translation
    assert_contains_with_context(&out, "[EMPTY_TARGET] 3 — Target is empty", "positional ids");
    assert_contains_with_context(
        &out,
        "Checked 3 segment(s), found 3 issue(s)",
        "same findings as the bilingual csv",
    );
}

#[test]
fn source_only_makes_every_target_empty() {
    let out = stdout_of(bin_cmd().args(["check", "--source"]).arg(fixture("en.txt")));
    assert_eq!(out.matches("[EMPTY_TARGET]").count(), 3, "{out}");
}

#[test]
fn identified_files_merge_with_glossary() {
    let out = stdout_of(
        bin_cmd()
            .args(["check", "--source"])
            .arg(fixture("source.csv"))
            .arg("--target")
            .arg(fixture("target.csv"))
            .arg("--glossary")
            .arg(fixture("glossary.csv")),
    );
    assert_contains_with_context(&out, "[EMPTY_TARGET] a — Target is empty", "a has no target");
    assert_contains_with_context(
        &out,
        "[GLOSSARY_MISMATCH] a — Expected 'Submit' -> 'Soumettre'",
        "glossary on a",
    );
    assert_contains_with_context(
        &out,
        "[TAG_MISMATCH] b — Source=['<b>', '</b>'], Target=[]",
        "tags on b",
    );
    assert_contains_with_context(
        &out,
        "[GLOSSARY_MISMATCH] b — Expected 'Save' -> 'Enregistrer'",
        "glossary on b",
    );
    assert_contains_with_context(
        &out,
        "Checked 3 segment(s), found 4 issue(s)",
        "c is target-only and clean",
    );
}

#[test]
fn csv_output_and_out_csv_match() {
    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("issues.csv");
    let out = stdout_of(
        bin_cmd()
            .args(["check", "--format", "csv", "--pairs"])
            .arg(fixture("pairs.csv"))
            .arg("--out-csv")
            .arg(&saved),
    );
    let file = fs::read_to_string(&saved).unwrap();
    assert_eq!(out, file);

    let mut lines = file.lines();
    assert_eq!(lines.next(), Some("ID,Issue Type,Details,Source,Target"));
    assert_eq!(
        lines.next(),
        Some("2,PLACEHOLDER_MISMATCH,\"Source=['{count}'], Target=[]\",You have {count} items,Vous avez 5 articles")
    );
    assert_eq!(lines.count(), 2);
}

#[test]
fn highlight_marks_offending_tokens() {
    let out = stdout_of(
        bin_cmd()
            .args(["check", "--highlight", "--pairs"])
            .arg(fixture("pairs.csv")),
    );
    assert_contains_with_context(&out, "source: You have [[{count}]] items", "placeholder marked");
    assert_contains_with_context(&out, "target: Vous avez [[5]] articles", "number marked");
    assert_contains_with_context(&out, "target: (empty)", "empty target shown");
}

#[test]
fn ratio_limits_from_config_and_flags() {
    let strict = stdout_of(
        bin_cmd()
            .env("QACHECK_CONFIG", fixture("strict.toml"))
            .args(["check", "--pairs"])
            .arg(fixture("pairs.csv")),
    );
    assert_contains_with_context(&strict, "[LENGTH_RATIO] 1 — Ratio=1.17", "config max_ratio");
    assert_contains_with_context(&strict, "[LENGTH_RATIO] 2 — Ratio=0.91", "config min_ratio");

    let overridden = stdout_of(
        bin_cmd()
            .env("QACHECK_CONFIG", fixture("strict.toml"))
            .args(["check", "--max-ratio", "3", "--pairs"])
            .arg(fixture("pairs.csv")),
    );
    assert!(!overridden.contains("[LENGTH_RATIO] 1"), "{overridden}");
    assert_contains_with_context(&overridden, "[LENGTH_RATIO] 2 — Ratio=0.91", "min from config");
}

#[test]
fn inverted_ratio_limits_are_rejected() {
    bin_cmd()
        .args(["check", "--min-ratio", "2", "--max-ratio", "1", "--pairs"])
        .arg(fixture("pairs.csv"))
        .assert()
        .code(3);
}

#[test]
fn unsupported_format_exits_two() {
    bin_cmd()
        .args(["check", "--pairs"])
        .arg(fixture("notes.rtf"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported file format 'rtf'"));
}

#[test]
fn pdf_target_exits_two() {
    bin_cmd()
        .args(["check", "--source"])
        .arg(fixture("en.txt"))
        .arg("--target")
        .arg(fixture("manual.pdf"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("can only be read as the source side"));
}

#[test]
fn unreadable_input_exits_three() {
    bin_cmd()
        .args(["check", "--fail-on-issues", "--pairs"])
        .arg(fixture("no-such-file.csv"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no-such-file.csv"));
}

#[test]
fn slides_align_shape_by_shape() {
    let out = stdout_of(
        bin_cmd()
            .args(["check", "--source"])
            .arg(fixture("slides.pptx"))
            .arg("--target")
            .arg(fixture("slides_fr.pptx")),
    );
    assert_contains_with_context(
        &out,
        "[TAG_MISMATCH] 3 — Source=['<b>', '</b>'], Target=[]",
        "third shape lost its tags",
    );
    assert_contains_with_context(
        &out,
        "Checked 3 segment(s), found 1 issue(s)",
        "one segment per non-blank shape",
    );
}

#[test]
fn word_paragraphs_become_segments() {
    let out = stdout_of(
        bin_cmd()
            .args(["align", "--source"])
            .arg(fixture("batch/notes.docx")),
    );
    assert_eq!(out, "id,source,target\n1,Save %s to disk,\n2,Open,\n");
}

#[test]
fn source_and_pairs_conflict() {
    bin_cmd()
        .args(["check", "--source"])
        .arg(fixture("en.txt"))
        .arg("--pairs")
        .arg(fixture("pairs.csv"))
        .assert()
        .failure();
}

#[test]
fn align_merges_by_id() {
    let out = stdout_of(
        bin_cmd()
            .args(["align", "--source"])
            .arg(fixture("source.csv"))
            .arg("--target")
            .arg(fixture("target.csv")),
    );
    assert_eq!(
        out,
        "id,source,target\n\
         a,Click Submit to continue,\n\
         b,<b>Save</b> your work,Enregistrez votre travail\n\
         c,,Extra ligne\n"
    );
}

#[test]
fn align_position_mode_ignores_ids() {
    let out = stdout_of(
        bin_cmd()
            .args(["align", "--align", "position", "--format", "json", "--source"])
            .arg(fixture("source.csv"))
            .arg("--target")
            .arg(fixture("target.csv")),
    );
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    let ids: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(v[0]["target"], "Enregistrez votre travail");
}

#[test]
fn batch_text_skips_unsupported() {
    let mut cmd = bin_cmd();
    cmd.args(["batch", "--root"]).arg(fixture("batch"));
    let assert = cmd.assert().success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let err = String::from_utf8_lossy(&assert.get_output().stderr).to_string();

    assert_contains_with_context(
        &out,
        "[PLACEHOLDER_MISMATCH] Menu.Save — Source=['%s'], Target=[]",
        "po issue",
    );
    assert_contains_with_context(
        &out,
        "[TAG_MISMATCH] 1 — Source=['<i>', '</i>'], Target=[]",
        "csv issue",
    );
    assert_contains_with_context(
        &out,
        "Files: 2 checked, 1 skipped. Checked 3 segment(s), found 2 issue(s)",
        "batch summary",
    );
    assert_contains_with_context(&err, "notes.docx", "skipped file reported");
}

#[test]
fn batch_fail_on_issues() {
    bin_cmd()
        .args(["batch", "--fail-on-issues", "--root"])
        .arg(fixture("batch"))
        .assert()
        .code(1);
}

#[test]
fn batch_rejects_csv_format() {
    bin_cmd()
        .args(["batch", "--format", "csv", "--root"])
        .arg(fixture("batch"))
        .assert()
        .failure();
}

#[test]
fn schema_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    bin_cmd()
        .args(["schema", "--out-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("schemas written to"));
    for name in [
        "issue_record.schema.json",
        "check_report.schema.json",
        "pair_record.schema.json",
        "batch_report.schema.json",
    ] {
        let raw = fs::read_to_string(dir.path().join(name)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(v.get("$schema").is_some(), "{name} is not a schema");
    }
}

#[test]
fn log_dir_receives_debug_file() {
    let dir = tempfile::tempdir().unwrap();
    bin_cmd()
        .arg("--log-dir")
        .arg(dir.path())
        .args(["check", "--pairs"])
        .arg(fixture("clean.json"))
        .assert()
        .success();
    let files: Vec<_> = fs::read_dir(dir.path()).unwrap().flatten().collect();
    assert!(!files.is_empty(), "no log file written");
}

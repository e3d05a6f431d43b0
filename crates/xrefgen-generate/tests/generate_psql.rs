use std::fs;
use std::path::{Path, PathBuf};

use xrefgen_generate::{
    CrossReferencesGeneratorPsql, GenerateOptions, GenerationError, SqlGenerator,
};

const HEADER: &str = "From Verse\tTo Verse\tVotes\t#www.openbible.info CC-BY 2024-05-01\n";

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("xrefgen_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_source(source_dir: &Path, index: u32, body: &str) {
    let extras = source_dir.join("extras");
    fs::create_dir_all(&extras).expect("create extras dir");
    fs::write(
        extras.join(format!("cross_references_{index}.txt")),
        format!("{HEADER}{body}"),
    )
    .expect("write source file");
}

fn read_sql(format_dir: &Path, index: u32) -> String {
    let path = format_dir
        .join("psql")
        .join("extras")
        .join(format!("cross_references_{index}.sql"));
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing sql at {}", path.display()))
}

#[test]
fn generates_one_sql_file_per_source_in_numeric_order() {
    let source_dir = temp_dir("order_src");
    let format_dir = temp_dir("order_out");
    write_source(&source_dir, 10, "Rev.22.21\tRom.16.24\t3\n");
    write_source(&source_dir, 2, "Gen.1.1\tJohn.1.1-John.1.3\t372\n");

    let generator = CrossReferencesGeneratorPsql::new(&source_dir, &format_dir);
    let report = generator.generate().expect("generate");

    let outputs: Vec<String> = report
        .files
        .iter()
        .map(|file| {
            file.output
                .file_name()
                .expect("file name")
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(outputs, vec!["cross_references_2.sql", "cross_references_10.sql"]);
    assert_eq!(report.rows_total, 2);

    let sql = read_sql(&format_dir, 2);
    assert!(sql.contains("-- Source: www.openbible.info CC-BY 2024-05-01"));
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS cross_references ("));
    assert!(sql.contains("('Genesis', 1, 1, 'John', 1, 1, 1, 3, 372);"));

    let sql = read_sql(&format_dir, 10);
    assert!(sql.contains("('Revelation of John', 22, 21, 'Romans', 16, 24, 16, 24, 3);"));
}

#[test]
fn skips_malformed_lines_and_reports_them() {
    let source_dir = temp_dir("lenient_src");
    let format_dir = temp_dir("lenient_out");
    write_source(
        &source_dir,
        0,
        "Gen.1.1\tProv.8.22-Prov.8.30\t59\n\
         Hezek.1.1\tGen.1.1\t4\n\
         \n\
         Mal.4.6\tMal.4.5-Matt.1.1\t2\n\
         Gen.1.2\tPs.104.30\t-1\n",
    );

    let generator = CrossReferencesGeneratorPsql::new(&source_dir, &format_dir);
    let report = generator.generate().expect("generate");

    assert_eq!(report.rows_total, 2);
    assert_eq!(report.skipped_total, 2);
    assert_eq!(report.warnings_by_code.get("unknown_book"), Some(&1));
    assert_eq!(report.warnings_by_code.get("invalid_range"), Some(&1));
    assert_eq!(report.warnings[0].line, Some(3));

    let sql = read_sql(&format_dir, 0);
    assert!(!sql.contains("Hezek"));
    assert!(sql.contains("('Genesis', 1, 2, 'Psalms', 104, 30, 104, 30, -1);"));

    let report_path = format_dir
        .join("psql")
        .join("extras")
        .join("generation_report.json");
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("read report"))
            .expect("parse report");
    assert_eq!(written["rows_total"], 2);
    assert_eq!(written["skipped_total"], 2);
    assert_eq!(written["files"][0]["rows_written"], 2);
}

#[test]
fn strict_mode_fails_on_first_malformed_line() {
    let source_dir = temp_dir("strict_src");
    let format_dir = temp_dir("strict_out");
    write_source(&source_dir, 0, "Gen.1.1\tJohn.1.1\t10\nGen.1.1\tJohn.1.1\tlots\n");

    let options = GenerateOptions {
        strict: true,
        ..GenerateOptions::default()
    };
    let generator = CrossReferencesGeneratorPsql::with_options(&source_dir, &format_dir, options);
    let err = generator.generate().expect_err("strict run should fail");

    match err {
        GenerationError::Malformed { line, reason, .. } => {
            assert_eq!(line, 3);
            assert!(matches!(reason, xrefgen_core::Error::InvalidRecord(_)));
            assert!(reason.to_string().contains("invalid vote count"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let extras = format_dir.join("psql").join("extras");
    assert!(!extras.join("cross_references_0.sql").exists());
    assert!(!extras.join("cross_references_0.sql.tmp").exists());
}

fn write_source_bytes(source_dir: &Path, index: u32, body: &[u8]) {
    let extras = source_dir.join("extras");
    fs::create_dir_all(&extras).expect("create extras dir");
    let mut contents = HEADER.as_bytes().to_vec();
    contents.extend_from_slice(body);
    fs::write(extras.join(format!("cross_references_{index}.txt")), contents)
        .expect("write source file");
}

fn output_entries(format_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(format_dir.join("psql").join("extras"))
        .expect("read output dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

const NON_UTF8_BODY: &[u8] = b"Gen.1.1\tJohn.1.1\t10\nGen.1.1\tJo\xffhn.1.1\t3\nGen.1.2\tPs.104.30\t5\n";

#[test]
fn invalid_utf8_line_is_skipped_in_lenient_mode() {
    let source_dir = temp_dir("utf8_src");
    let format_dir = temp_dir("utf8_out");
    write_source_bytes(&source_dir, 0, NON_UTF8_BODY);

    let report = CrossReferencesGeneratorPsql::new(&source_dir, &format_dir)
        .generate()
        .expect("lenient run skips the bad line");

    assert_eq!(report.rows_total, 2);
    assert_eq!(report.skipped_total, 1);
    assert_eq!(report.warnings_by_code.get("invalid_record"), Some(&1));
    assert_eq!(report.warnings[0].line, Some(3));

    let sql = read_sql(&format_dir, 0);
    assert!(sql.contains("('Genesis', 1, 1, 'John', 1, 1, 1, 1, 10),"));
    assert!(sql.contains("('Genesis', 1, 2, 'Psalms', 104, 30, 104, 30, 5);"));
    assert_eq!(
        output_entries(&format_dir),
        vec!["cross_references_0.sql", "generation_report.json"]
    );
}

#[test]
fn failed_file_leaves_no_temp_output() {
    let source_dir = temp_dir("utf8_strict_src");
    let format_dir = temp_dir("utf8_strict_out");
    write_source_bytes(&source_dir, 0, NON_UTF8_BODY);

    let options = GenerateOptions {
        strict: true,
        ..GenerateOptions::default()
    };
    let err = CrossReferencesGeneratorPsql::with_options(&source_dir, &format_dir, options)
        .generate()
        .expect_err("strict run rejects the bad line");

    assert!(matches!(
        err,
        GenerationError::Malformed {
            line: 3,
            reason: xrefgen_core::Error::InvalidRecord(_),
            ..
        }
    ));
    assert!(output_entries(&format_dir).is_empty());
}

#[test]
fn output_is_deterministic() {
    let source_dir = temp_dir("determinism_src");
    let body = "Gen.1.1\tJohn.1.1\t10\nGen.1.1\tHeb.11.3\t8\nGen.1.2\tPs.104.30\t5\n";
    write_source(&source_dir, 0, body);

    let options = GenerateOptions {
        strict: false,
        batch_size: 2,
    };
    let out_a = temp_dir("determinism_a");
    let out_b = temp_dir("determinism_b");
    let report_a = CrossReferencesGeneratorPsql::with_options(&source_dir, &out_a, options.clone())
        .generate()
        .expect("generate A");
    let report_b = CrossReferencesGeneratorPsql::with_options(&source_dir, &out_b, options)
        .generate()
        .expect("generate B");

    assert_eq!(read_sql(&out_a, 0), read_sql(&out_b, 0));
    assert_eq!(report_a.files[0].sha256, report_b.files[0].sha256);
    assert_ne!(report_a.run_id, report_b.run_id);
}

#[test]
fn missing_extras_directory_is_reported() {
    let source_dir = temp_dir("empty_src");
    let format_dir = temp_dir("empty_out");

    let err = CrossReferencesGeneratorPsql::new(&source_dir, &format_dir)
        .generate()
        .expect_err("no sources");
    assert!(matches!(err, GenerationError::NoSourceFiles(_)));
    assert!(!format_dir.join("psql").exists());
}

#[test]
fn zero_batch_size_is_rejected() {
    let source_dir = temp_dir("batch_src");
    let format_dir = temp_dir("batch_out");
    write_source(&source_dir, 0, "Gen.1.1\tJohn.1.1\t10\n");

    let options = GenerateOptions {
        strict: false,
        batch_size: 0,
    };
    let err = CrossReferencesGeneratorPsql::with_options(&source_dir, &format_dir, options)
        .generate()
        .expect_err("invalid batch size");
    assert!(matches!(err, GenerationError::InvalidOptions(_)));
}

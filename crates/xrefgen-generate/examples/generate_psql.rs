use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use xrefgen_generate::{CrossReferencesGeneratorPsql, GenerateOptions, SqlGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut source: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut options = GenerateOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--source" => source = args.next().map(PathBuf::from),
            "--out" => out = args.next().map(PathBuf::from),
            "--strict" => options.strict = true,
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let source = source.ok_or("missing --source path")?;
    let out = out.unwrap_or_else(|| PathBuf::from("output"));

    let generator = CrossReferencesGeneratorPsql::with_options(source, out, options);
    let report = generator.generate()?;

    println!("output_dir={}", report.output_dir.display());
    println!("rows={} skipped={}", report.rows_total, report.skipped_total);
    Ok(())
}

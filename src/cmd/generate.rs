//! Generate command CLI handler.

use super::plan::print_plan;
use crate::config::{CliOverrides, RunSettings};
use crate::progress::ProgressSink;
use crate::script::write_import_scripts;
use crate::writer::SqlDumpSink;
use anyhow::Context;
use fixture_gen::{Generator, Scale};
use std::path::PathBuf;
use std::time::Instant;

#[allow(clippy::too_many_arguments)]
pub fn run(
    output: Option<PathBuf>,
    scale: Option<Scale>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    batch_size: Option<usize>,
    no_scripts: bool,
    progress: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let settings = RunSettings::load(
        config.as_deref(),
        &CliOverrides {
            scale,
            seed,
            batch_size,
            output,
        },
    )?;
    settings.plan.validate()?;

    if dry_run {
        print_plan(&settings);
        println!("\n✓ Dry run completed!");
        println!("\nWould write to: {}", settings.output.display());
        return Ok(());
    }

    let mut sink = SqlDumpSink::new(settings.output.clone(), settings.seed);
    sink.ensure_output_dir().with_context(|| {
        format!(
            "Failed to create output directory: {}",
            settings.output.display()
        )
    })?;

    let mut generator =
        Generator::new(settings.seed, settings.plan.clone()).with_batch_size(settings.batch_size);

    let start_time = Instant::now();
    let summary = if progress {
        eprintln!(
            "Generating {} rows ({} scale) into {}",
            settings.plan.total_rows(),
            settings.scale,
            settings.output.display()
        );
        let mut tracked = ProgressSink::new(sink, settings.plan.clone())?;
        let summary = generator.generate(&mut tracked)?;
        sink = tracked.into_inner();
        summary
    } else {
        generator.generate(&mut sink)?
    };

    let scripts = if no_scripts {
        Vec::new()
    } else {
        write_import_scripts(sink.output_dir()).with_context(|| {
            format!(
                "Failed to write import scripts to {}",
                sink.output_dir().display()
            )
        })?
    };
    let elapsed = start_time.elapsed();

    println!("\n✓ Fixtures generated successfully!");
    println!("\nFiles:");
    for file in sink.files() {
        println!(
            "  {:<28} {:>10} rows {:>10.2} MB",
            file.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file.rows,
            file.bytes as f64 / (1024.0 * 1024.0)
        );
    }
    for script in &scripts {
        println!("  {}", script.display());
    }

    println!("\nStatistics:");
    println!("  Total rows: {}", summary.total_rows());
    println!("  Hot posts: {}", summary.hot_posts);
    println!("  Like pool: {} codes", summary.like_pool);
    println!(
        "  Bytes written: {:.2} MB",
        sink.total_bytes() as f64 / (1024.0 * 1024.0)
    );
    println!("  Elapsed time: {:.3?}", elapsed);
    if elapsed.as_secs_f64() > 0.0 {
        println!(
            "  Throughput: {:.0} rows/s",
            summary.total_rows() as f64 / elapsed.as_secs_f64()
        );
    }

    if !scripts.is_empty() {
        println!("\nImport with:");
        println!("  ./import_all.sh [database_name] [mysql_user] [mysql_password]");
    }

    Ok(())
}

//! Check command CLI handler.

use crate::config::{CliOverrides, RunSettings};
use crate::progress::ProgressSink;
use fixture_gen::{CheckReport, Generator, InvariantSink, Scale};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// JSON output for the check command
#[derive(Serialize)]
pub(crate) struct CheckJsonOutput {
    scale: String,
    seed: u64,
    ok: bool,
    elapsed_secs: f64,
    total_rows: u64,
    segments: Vec<CheckSegment>,
    hot_posts: HotPostStats,
    total_issues: u64,
    issues: Vec<String>,
}

#[derive(Serialize)]
pub(crate) struct CheckSegment {
    segment: String,
    rows: u64,
    expected: u64,
}

#[derive(Serialize)]
pub(crate) struct HotPostStats {
    hot_posts: u64,
    replied: u64,
    min_root_replies: u64,
    max_root_replies: u64,
    non_hot_root_replies: u64,
    average_root_replies_all_posts: f64,
}

fn to_json(settings: &RunSettings, report: &CheckReport, elapsed_secs: f64) -> CheckJsonOutput {
    CheckJsonOutput {
        scale: settings.scale.to_string(),
        seed: settings.seed,
        ok: report.is_ok(),
        elapsed_secs,
        total_rows: report.total_rows(),
        segments: report
            .segments
            .iter()
            .map(|s| CheckSegment {
                segment: s.segment.file_stem(),
                rows: s.rows,
                expected: s.expected,
            })
            .collect(),
        hot_posts: HotPostStats {
            hot_posts: report.hot_posts,
            replied: report.replied_hot_posts,
            min_root_replies: report.min_hot_root_replies,
            max_root_replies: report.max_hot_root_replies,
            non_hot_root_replies: report.non_hot_root_replies,
            average_root_replies_all_posts: report.average_root_replies,
        },
        total_issues: report.total_issues,
        issues: report.issues.clone(),
    }
}

pub fn run(
    scale: Option<Scale>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    json: bool,
    progress: bool,
) -> anyhow::Result<()> {
    let settings = RunSettings::load(
        config.as_deref(),
        &CliOverrides {
            scale,
            seed,
            ..Default::default()
        },
    )?;

    let mut generator =
        Generator::new(settings.seed, settings.plan.clone()).with_batch_size(settings.batch_size);
    let start_time = Instant::now();

    let checker = InvariantSink::new(&settings.plan);
    let report = if progress && !json {
        let mut tracked = ProgressSink::new(checker, settings.plan.clone())?;
        generator.generate(&mut tracked)?;
        tracked.into_inner().finish()
    } else {
        let mut checker = checker;
        generator.generate(&mut checker)?;
        checker.finish()
    };
    let elapsed = start_time.elapsed();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&to_json(&settings, &report, elapsed.as_secs_f64()))?
        );
    } else {
        println!("\nSegments:");
        for s in &report.segments {
            let mark = if s.rows == s.expected { "✓" } else { "✗" };
            println!(
                "  {} {:<20} {:>12} / {} rows",
                mark,
                s.segment.file_stem(),
                s.rows,
                s.expected
            );
        }

        println!("\nHot posts:");
        println!(
            "  {} of {} received root replies ({}..={} each)",
            report.replied_hot_posts,
            report.hot_posts,
            report.min_hot_root_replies,
            report.max_hot_root_replies
        );
        println!(
            "  Average over all posts: {:.2}",
            report.average_root_replies
        );
        println!("  Root replies on non-hot posts: {}", report.non_hot_root_replies);
        println!("  Elapsed time: {:.3?}", elapsed);

        if report.is_ok() {
            println!("\n✓ All invariants hold ({} rows)", report.total_rows());
        } else {
            println!("\n✗ {} invariant violations:", report.total_issues);
            for issue in &report.issues {
                println!("  - {}", issue);
            }
            if report.total_issues > report.issues.len() as u64 {
                println!(
                    "  ... and {} more",
                    report.total_issues - report.issues.len() as u64
                );
            }
        }
    }

    if !report.is_ok() {
        std::process::exit(1);
    }

    Ok(())
}

//! Plan command CLI handler.

use crate::config::{CliOverrides, RunSettings};
use fixture_gen::codes::code;
use fixture_gen::likes::ITERATION_FACTOR;
use fixture_gen::{CodeKind, FixturePlan, Scale, Segment};
use serde::Serialize;
use std::path::PathBuf;

/// JSON output for the plan command
#[derive(Serialize)]
pub(crate) struct PlanJsonOutput {
    scale: String,
    seed: u64,
    batch_size: usize,
    total_rows: u64,
    segments: Vec<PlanSegment>,
    hot_posts: HotPosts,
    like_pool: LikePool,
}

#[derive(Serialize)]
pub(crate) struct PlanSegment {
    file: String,
    table: String,
    rows: u64,
    truncates: bool,
}

#[derive(Serialize)]
pub(crate) struct HotPosts {
    total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    boards: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviews: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct LikePool {
    boards: u64,
    reviews: u64,
    replies: u64,
    total: u64,
    max_visits: u64,
}

fn code_range(kind: CodeKind, range: Option<(u64, u64)>) -> Option<String> {
    range.map(|(first, last)| format!("{} .. {}", code(kind, first), code(kind, last)))
}

pub(crate) fn build_output(settings: &RunSettings) -> PlanJsonOutput {
    let plan = &settings.plan;
    let hot = plan.hot_set();
    let pool = plan.candidate_pool();
    let [(_, pool_boards), (_, pool_reviews), (_, pool_replies)] = pool.breakdown();

    PlanJsonOutput {
        scale: settings.scale.to_string(),
        seed: settings.seed,
        batch_size: settings.batch_size,
        total_rows: plan.total_rows(),
        segments: Segment::ALL
            .iter()
            .map(|s| PlanSegment {
                file: format!("{}.sql", s.file_stem()),
                table: s.table().name().to_string(),
                rows: plan.rows_in(*s),
                truncates: s.truncates(),
            })
            .collect(),
        hot_posts: HotPosts {
            total: hot.len(),
            boards: code_range(CodeKind::Board, hot.board_range()),
            reviews: code_range(CodeKind::Review, hot.review_range()),
        },
        like_pool: LikePool {
            boards: pool_boards,
            reviews: pool_reviews,
            replies: pool_replies,
            total: pool.len(),
            max_visits: pool.len() * ITERATION_FACTOR,
        },
    }
}

pub(crate) fn print_plan(settings: &RunSettings) {
    let out = build_output(settings);
    let plan: &FixturePlan = &settings.plan;

    println!("Fixture plan ({} scale, seed {})", out.scale, out.seed);
    println!("\nSegments:");
    for segment in &out.segments {
        let mode = if segment.truncates {
            "truncate"
        } else {
            "append"
        };
        println!(
            "  {:<24} {:>12} rows  -> {} ({})",
            segment.file, segment.rows, segment.table, mode
        );
    }
    println!("  {:<24} {:>12} rows", "total", out.total_rows);

    println!("\nReply tree:");
    println!(
        "  Root replies: {} over {} hot posts (~{} each)",
        plan.root_replies,
        out.hot_posts.total,
        if out.hot_posts.total > 0 {
            plan.root_replies / out.hot_posts.total
        } else {
            0
        }
    );
    if let Some(range) = &out.hot_posts.boards {
        println!("  Hot boards: {}", range);
    }
    if let Some(range) = &out.hot_posts.reviews {
        println!("  Hot reviews: {}", range);
    }

    println!("\nLikes:");
    println!(
        "  Candidate pool: {} codes ({} boards, {} reviews, {} replies)",
        out.like_pool.total, out.like_pool.boards, out.like_pool.reviews, out.like_pool.replies
    );
    println!(
        "  Target: {} unique likes (at most {} candidate visits)",
        plan.likes, out.like_pool.max_visits
    );
    println!("  Batch size: {} rows per INSERT", out.batch_size);
}

pub fn run(scale: Option<Scale>, config: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let settings = RunSettings::load(
        config.as_deref(),
        &CliOverrides {
            scale,
            ..Default::default()
        },
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&build_output(&settings))?);
    } else {
        print_plan(&settings);
    }

    if let Err(e) = settings.plan.validate() {
        eprintln!("\nWarning: {}", e);
    }

    Ok(())
}

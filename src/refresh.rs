use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use crate::aggregate;
use crate::args::Args;
use crate::dominant::dominant_by_group;
use crate::palette::ColorAssignment;
use crate::record::Field;
use crate::source;
use crate::stats::RefreshSnapshot;
use crate::utils::format_number;

/// One full refresh: fetch every source, build the canonical dataset, and
/// derive every view the dashboard consumes. Any load failure aborts the
/// refresh before aggregation; the caller keeps its previous snapshot.
pub fn run_refresh(args: &Args) -> Result<RefreshSnapshot> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "refresh", group_by = args.group_by.label(), "Starting dataset refresh");

    let sources = source::sheet_sources(&args.sheet_id, &args.tables)?;
    let client = source::http_client(Duration::from_secs(args.timeout))
        .context("Failed to build HTTP client")?;

    let tables = source::fetch_all(&client, &sources, args.workers)?;
    let dataset = source::build_dataset(&tables)?;

    let aggregation_start = Instant::now();
    let mut colors = ColorAssignment::new();
    let top_districts = if dataset.is_empty() {
        Vec::new()
    } else {
        aggregate::top_n(&dataset, Field::District, args.top)?
    };
    let snapshot = RefreshSnapshot {
        total_societies: dataset.len() as u64,
        sector_state_counts: aggregate::counts_by_keys(&dataset, Field::State, Field::Sector),
        districts_per_sector: aggregate::distinct_count_by(&dataset, Field::Sector, Field::District),
        states_per_sector: aggregate::distinct_count_by(&dataset, Field::Sector, Field::State),
        societies_per_sector: aggregate::value_counts(&dataset, Field::Sector),
        registrations_over_time: aggregate::cumulative_series(&dataset),
        top_districts,
        dominant_sectors: dominant_by_group(&dataset, args.group_by, &mut colors),
    };
    info!(
        action = "aggregate",
        component = "refresh",
        sector_count = colors.len(),
        duration_ms = aggregation_start.elapsed().as_millis(),
        "Derived aggregate views"
    );

    info!(
        action = "complete",
        component = "refresh",
        record_count = snapshot.total_societies,
        duration_ms = total_start_time.elapsed().as_millis(),
        "Refresh completed successfully"
    );
    Ok(snapshot)
}

pub fn print_snapshot(snapshot: &RefreshSnapshot, args: &Args) {
    println!("\n--- Multi State Cooperative Societies ---");
    println!("Total societies: {}", format_number(snapshot.total_societies));

    if let (Some(first), Some(last)) = (
        snapshot.registrations_over_time.first(),
        snapshot.registrations_over_time.last(),
    ) {
        println!(
            "Registrations from {} to {}",
            first.date.format("%B %-d, %Y"),
            last.date.format("%B %-d, %Y")
        );
    }

    println!("\nSocieties per sector:");
    for row in &snapshot.societies_per_sector {
        println!("- {}: {} societies", row.value, format_number(row.count));
    }

    println!("\nDistricts per sector:");
    for row in &snapshot.districts_per_sector {
        println!("- {}: {} districts", row.key, format_number(row.distinct));
    }

    println!("\nStates per sector:");
    for row in &snapshot.states_per_sector {
        println!("- {}: {} states", row.key, format_number(row.distinct));
    }

    println!(
        "\nTop {} districts by societies:",
        snapshot.top_districts.len()
    );
    for row in &snapshot.top_districts {
        println!("- {}: {} societies", row.value, format_number(row.count));
    }

    println!(
        "\nDominant sector by {}:",
        args.group_by.label().to_lowercase()
    );
    for entry in &snapshot.dominant_sectors {
        println!(
            "- {}: {} ({} of {} societies, {:.0}%) {}",
            entry.group,
            entry.sector,
            format_number(entry.count),
            format_number(entry.total),
            entry.share * 100.0,
            entry.color
        );
    }
}

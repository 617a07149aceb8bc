//! Inspecting, charting and exporting coverage results.

use crate::{status_error, ApiArgs, AreaArgs};
use ftm_core::geojson::FeatureCollection;
use ftm_data::export::to_csv;
use ftm_data::repository::ResultsRepository;
use ftm_data::trend::ElevationChart;
use ftm_data::view::{ResultsView, Selection};
use log::{info, warn};

async fn load_repository(api: &ApiArgs) -> anyhow::Result<ResultsRepository> {
    let client = api.client()?;
    let mut repo = ResultsRepository::new();
    repo.fetch_all(&client).await.map_err(status_error)?;
    for rejected in repo.rejected_rows() {
        warn!("Ignoring malformed result {}", rejected);
    }
    Ok(repo)
}

/// The area to show: the one asked for, every area with `--all`, otherwise
/// the most recently analysed one.
fn resolve_area(repo: &ResultsRepository, args: &AreaArgs) -> Option<String> {
    if args.all {
        return None;
    }
    args.area
        .clone()
        .or_else(|| repo.most_recent_area().map(str::to_string))
}

fn select(repo: &ResultsRepository, args: &AreaArgs) -> Selection {
    let area = resolve_area(repo, args);
    match &area {
        Some(name) => info!("Selecting results for area {}", name),
        None => info!("Selecting results for all areas"),
    }
    let selection = ResultsView::new(repo.records()).select(area.as_deref());
    for warning in selection.warnings() {
        warn!("{}", warning);
    }
    selection
}

fn format_table(selection: &Selection) -> String {
    let mut lines = vec![format!(
        "{:<16} {:>12} {:>10} {:>8} {:>10}",
        "Area", "Elevation", "Detected", "Total", "Coverage %"
    )];
    for r in &selection.records {
        lines.push(format!(
            "{:<16} {:>12} {:>10} {:>8} {:>10.2}",
            r.area_name, r.elevation_band, r.detected_points, r.total_points, r.coverage_percentage
        ));
    }
    lines.join("\n")
}

pub async fn run_results(api: &ApiArgs, args: &AreaArgs) -> anyhow::Result<()> {
    let repo = load_repository(api).await?;
    if repo.is_empty() {
        println!("No results yet.");
        return Ok(());
    }
    let selection = select(&repo, args);
    println!("{}", format_table(&selection));
    let skipped = selection.excluded.len() + repo.rejected_rows().len();
    if skipped > 0 {
        println!("{} record(s) skipped, see log for details", skipped);
    }
    Ok(())
}

pub async fn run_export(api: &ApiArgs, args: &AreaArgs, output: &str) -> anyhow::Result<()> {
    let repo = load_repository(api).await?;
    let selection = select(&repo, args);
    let csv = to_csv(&selection.records)?;
    std::fs::write(output, csv)?;
    info!("Wrote {} records to {}", selection.records.len(), output);
    Ok(())
}

pub async fn run_chart(api: &ApiArgs, args: &AreaArgs) -> anyhow::Result<()> {
    let repo = load_repository(api).await?;
    let selection = select(&repo, args);
    let chart = ElevationChart::from_selection(&selection);
    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}

pub async fn run_center(api: &ApiArgs, area: Option<String>) -> anyhow::Result<()> {
    let client = api.client()?;
    let area = match area {
        Some(area) => area,
        None => {
            let mut repo = ResultsRepository::new();
            repo.fetch_all(&client).await.map_err(status_error)?;
            match repo.most_recent_area() {
                Some(name) => name.to_string(),
                None => anyhow::bail!("No analysed areas yet"),
            }
        }
    };
    let collection = client.fetch_geojson(&area).await.map_err(status_error)?;
    println!("{}", format_center(&collection));
    Ok(())
}

/// Map center on the first line, then one `band coverage` line per feature.
fn format_center(collection: &FeatureCollection) -> String {
    let center = collection.map_center();
    let mut lines = vec![format!("{} {}", center.lat, center.lng)];
    for (elevation, coverage) in collection.coverage_by_elevation() {
        lines.push(format!("{:>12} {:>10.2}", elevation, coverage));
    }
    lines.join("\n")
}

pub async fn run_areas(api: &ApiArgs) -> anyhow::Result<()> {
    let client = api.client()?;
    let mut repo = ResultsRepository::new();
    repo.fetch_all(&client).await.map_err(status_error)?;
    let most_recent = repo.most_recent_area().map(str::to_string);
    for area in repo.area_catalog() {
        let marker = if Some(&area) == most_recent.as_ref() { " *" } else { "" };
        println!("{}{}", area, marker);
    }

    match client.fetch_user_polygons().await {
        Ok(polygons) => {
            for p in polygons {
                println!(
                    "submitted {}: {} to {}, band {}, distance {}",
                    p.area_name,
                    p.arg_s.as_deref().unwrap_or("?"),
                    p.arg_e.as_deref().unwrap_or("?"),
                    p.arg_b.as_deref().unwrap_or("?"),
                    p.arg_d.as_deref().unwrap_or("?"),
                );
            }
        }
        Err(e) => warn!("Could not list submissions: {}", e.user_message()),
    }
    Ok(())
}

pub async fn run_reset(api: &ApiArgs) -> anyhow::Result<()> {
    let client = api.client()?;
    client.reset().await.map_err(status_error)?;
    println!("Backend results cleared");
    Ok(())
}

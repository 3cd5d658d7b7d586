use tracing::info;

use spacecal::config::Config;
use spacecal::engine::SlotGrid;
use spacecal::service::CalendarService;
use spacecal::store::{Dataset, InMemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the snapshot; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = Config::from_env();
    spacecal::observability::init(config.metrics_port)?;

    let grid = SlotGrid::from_config(&config.grid)?;
    let now = chrono::Local::now().naive_local();
    let anchor = config.date.unwrap_or(now.date());

    info!("spacecal loading {}", config.data_path.display());
    info!("  view: {:?} anchored at {anchor}", config.view);
    if !config.filter.is_empty() {
        info!("  filter: {:?}", config.filter);
    }
    info!(
        "  grid: {:02}:00-{:02}:59 every {} min ({} slots)",
        config.grid.start_hour,
        config.grid.end_hour,
        config.grid.slot_minutes,
        grid.len()
    );
    info!(
        "  metrics: {}",
        config
            .metrics_port
            .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let raw = tokio::fs::read(&config.data_path).await?;
    let dataset: Dataset = serde_json::from_slice(&raw)?;
    let store = InMemoryStore::from_dataset(dataset);
    info!(
        "loaded {} resources, {} bookings",
        store.resource_count(),
        store.booking_count()
    );

    let service = CalendarService::new(store, grid);
    let snapshot = service.calendar(config.view, anchor, &config.filter, now).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

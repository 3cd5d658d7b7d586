use std::net::SocketAddr;

// ── Calendar rendering ──────────────────────────────────────────

/// Counter: calendar snapshots built.
pub const CALENDAR_BUILDS_TOTAL: &str = "spacecal_calendar_builds_total";

/// Histogram: occupancy resolution time in seconds.
pub const OCCUPANCY_RESOLVE_SECONDS: &str = "spacecal_occupancy_resolve_seconds";

/// Counter: bookings left off the grid. Labels: reason.
pub const SKIPPED_BOOKINGS_TOTAL: &str = "spacecal_skipped_bookings_total";

// ── Availability ────────────────────────────────────────────────

/// Counter: availability checks run.
pub const AVAILABILITY_CHECKS_TOTAL: &str = "spacecal_availability_checks_total";

/// Counter: checks that found at least one conflicting booking.
pub const CONFLICTS_TOTAL: &str = "spacecal_conflicts_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

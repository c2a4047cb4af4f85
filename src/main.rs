//! Stroke unit clinical records demo
//!
//! Seeds a registry with the demo roster and prints the resulting alert
//! inbox. The web layer this system normally sits behind is out of
//! scope; this binary is the workflow end to end.

use anyhow::Context;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use strokeunit::registry::Registry;
use strokeunit::roles::Role;
use strokeunit::seed::seed_demo_data;
use strokeunit::settings;

fn main() -> anyhow::Result<()> {
    let settings = settings::load().context("failed to load settings")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).context("invalid log filter")?,
        )
        .init();

    let mut registry = Registry::new();

    if settings.seed_demo_data {
        let summary = seed_demo_data(&mut registry, Utc::now())?;
        info!(
            patients = summary.patients,
            alerts = summary.alerts,
            "registry ready"
        );
    }

    for alert in registry.unacknowledged_alerts(Role::Neurologist)? {
        info!(
            patient = %alert.alert.patient_id,
            severity = %alert.alert.alert_type,
            "{}",
            alert.alert.description
        );
    }

    Ok(())
}

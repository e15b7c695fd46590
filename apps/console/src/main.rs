//! # Fareline Console
//!
//! Scripted pricing session against a live engine. Plays the host role:
//! selects a vehicle, pushes a measured route, lets the "operator" adjust
//! the quote, then re-routes to show that the edits survive.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session Script                                                         │
//! │                                                                         │
//! │  1. spawn engine, await ready                                           │
//! │  2. RateApplier: pricing basis (hourly service, schedule's allowed)     │
//! │  3. RateApplier: vehicle defaults + fee rules + route measurement       │
//! │  4. setPayments, pull and print the initial quote                       │
//! │  5. operator edits gratuity and mileage                                 │
//! │  6. re-route pushes new miles; the user's mileage must survive          │
//! │  7. pull and print the adjusted quote, shut down                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fareline_core::{PricingSnapshot, Provenance, RateKey};
use fareline_engine::{
    EngineConfig, EngineHandle, EngineMessage, EngineService, HostMessage, LocalEdit,
};
use fareline_host::{AdditionalFeeSetting, RateApplier, RouteMeasurement, VehicleRateSchedule};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EngineConfig::load_or_default(None);
    info!(service = %config.service.label, "starting pricing engine");

    let (handle, mut outbound) = EngineService::spawn(config);

    match outbound.recv().await {
        Some(EngineMessage::Ready(payload)) => {
            info!(protocol = payload.protocol_version, "engine ready")
        }
        _ => anyhow::bail!("engine failed to announce readiness"),
    }

    let mut sedan = VehicleRateSchedule::new("Executive Sedan");
    sedan.hourly_rate = Some(65.0);
    sedan.per_mile_rate = Some(3.50);
    sedan.default_gratuity_percent = Some(20.0);
    sedan.included_miles = 2.0;
    sedan.allowed_pricing_types = vec!["HOURLY".to_string(), "DISTANCE".to_string()];

    let applier = RateApplier::new(sedan).with_fees(vec![
        AdditionalFeeSetting::percentage("Fuel Surcharge", 10.0),
        AdditionalFeeSetting::fixed("Tolls", 12.0),
        AdditionalFeeSetting::multiplier("Peak Season", 1.15).disabled(),
    ]);

    // Hourly service: hourly and distance rows participate, passenger
    // pricing stays hidden even though the route reports a headcount
    applier.apply_service_type(&handle, "HOURLY").await?;

    let route = RouteMeasurement {
        miles: Some(22.5),
        hours: Some(2.0),
        passengers: Some(3),
        airport_stops: 1,
        ..Default::default()
    };
    applier.apply(&handle, &route).await?;

    handle.send(HostMessage::set_payments(100.0)).await?;

    let quote = pull_snapshot(&handle, &mut outbound).await?;
    print_breakdown("Initial quote", &quote);

    // The operator trims the gratuity and corrects the mileage by hand
    handle.edit(LocalEdit::Gratuity { percent: 18.0 }).await?;
    handle
        .edit(LocalEdit::Quantity {
            key: RateKey::Mile,
            value: 25.0,
        })
        .await?;

    // A re-route arrives afterwards; the typed mileage must survive it
    let reroute = RouteMeasurement {
        miles: Some(30.0),
        ..Default::default()
    };
    applier.apply_route(&handle, &reroute).await?;

    let quote = pull_snapshot(&handle, &mut outbound).await?;
    print_breakdown("After operator adjustments", &quote);

    handle.shutdown().await?;
    while outbound.recv().await.is_some() {}
    info!("pricing engine stopped");

    Ok(())
}

/// Pulls a fresh snapshot via getRates, draining interim pushes.
async fn pull_snapshot(
    handle: &EngineHandle,
    outbound: &mut mpsc::Receiver<EngineMessage>,
) -> Result<PricingSnapshot> {
    handle.send(HostMessage::GetRates).await?;
    loop {
        match outbound.recv().await {
            Some(EngineMessage::RatesData(snapshot)) => return Ok(snapshot),
            Some(message) => debug!(message = message.type_name(), "engine update"),
            None => anyhow::bail!("engine stopped before replying to getRates"),
        }
    }
}

/// Prints one quote the way a reservation screen would lay it out.
fn print_breakdown(title: &str, snapshot: &PricingSnapshot) {
    println!();
    println!("=== {title} ===");

    for row in &snapshot.rows {
        if !row.visible {
            continue;
        }
        let origin = if row.quantity_source == Provenance::User {
            "  (user)"
        } else {
            ""
        };
        println!(
            "  {:<16} {:>8} x {:>9} = {:>10}{}",
            row.key.label(),
            row.quantity.to_string(),
            row.rate.to_string(),
            row.total.to_string(),
            origin,
        );
    }

    if !snapshot.additional_rates.is_empty() {
        println!("  {:-<16}", "");
        for fee in &snapshot.additional_rates {
            let status = if fee.active { "" } else { "  (inactive)" };
            println!(
                "  {:<16} {:>31}{}",
                fee.name,
                fee.total.to_string(),
                status
            );
        }
    }

    println!("  {:-<16}", "");
    println!("  {:<16} {:>31}", "Subtotal", snapshot.subtotal.to_string());
    println!(
        "  {:<16} {:>31}",
        format!("Gratuity {}", snapshot.gratuity_percent),
        snapshot.gratuity_total.to_string(),
    );
    println!(
        "  {:<16} {:>31}",
        "Additional",
        snapshot.additional_total.to_string(),
    );
    println!(
        "  {:<16} {:>31}",
        "Grand Total",
        snapshot.grand_total.to_string(),
    );
    println!(
        "  {:<16} {:>31}",
        "Payments",
        snapshot.payments_applied.to_string(),
    );
    println!(
        "  {:<16} {:>31}",
        "Balance Due",
        snapshot.balance_due.to_string(),
    );
}

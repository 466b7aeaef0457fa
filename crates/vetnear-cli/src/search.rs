//! Search command handlers for the CLI.

use vetnear_core::{AppConfig, Category, SearchRequest};
use vetnear_proximity::{
    build_query, NormalizedPlace, ProximityConfig, ProximityService, UserLocationContext,
};

fn service(config: &AppConfig) -> anyhow::Result<ProximityService> {
    Ok(ProximityService::new(&ProximityConfig::from_app_config(
        config,
    ))?)
}

/// Run the full concurrent search and print the results.
///
/// # Errors
///
/// Returns an error if the coordinates are invalid or the provider clients
/// cannot be built. Provider outages only empty the affected section.
pub(crate) async fn run_nearby(
    config: &AppConfig,
    lat: f64,
    lon: f64,
    radius: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let request = SearchRequest::new(Some(lat), Some(lon), radius, config.default_radius_km)?;
    let bundle = service(config)?.search(&request).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    if let Some(location) = &bundle.user_location {
        println!("Near: {}", describe_location(location));
        println!();
    }

    println!(
        "Veterinarians within {} km ({})",
        bundle.radius_km, bundle.counts.veterinarians
    );
    print_places(&bundle.veterinarians);
    println!();
    println!(
        "Animal shelters / NGOs within {} km ({})",
        bundle.ngo_radius_km, bundle.counts.ngos
    );
    print_places(&bundle.ngos);

    Ok(())
}

/// Reverse-geocode a point and print the location context.
///
/// # Errors
///
/// Returns an error if the coordinates are invalid or the provider fails
/// after all retries.
pub(crate) async fn run_reverse(config: &AppConfig, lat: f64, lon: f64) -> anyhow::Result<()> {
    let request = SearchRequest::new(Some(lat), Some(lon), None, config.default_radius_km)?;
    let location = service(config)?.reverse_geocode(request.center()).await?;
    println!("{}", serde_json::to_string_pretty(&location)?);
    Ok(())
}

/// Print the generated Overpass query. Makes no network call.
///
/// # Errors
///
/// Returns an error if the coordinates are invalid.
pub(crate) fn run_query(
    config: &AppConfig,
    lat: f64,
    lon: f64,
    radius: Option<f64>,
    category: Category,
) -> anyhow::Result<()> {
    let request = SearchRequest::new(Some(lat), Some(lon), radius, config.default_radius_km)?;
    let query = build_query(request.center(), request.radius_km() * 1000.0, category);
    println!("{query}");
    Ok(())
}

fn describe_location(location: &UserLocationContext) -> String {
    let parts: Vec<&str> = [&location.city, &location.state, &location.country]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .collect();
    if parts.is_empty() {
        location
            .display_address
            .clone()
            .unwrap_or_else(|| "unknown location".to_string())
    } else {
        parts.join(", ")
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        format!("{}...", value.chars().take(max).collect::<String>())
    } else {
        value.to_string()
    }
}

fn print_places(places: &[NormalizedPlace]) {
    if places.is_empty() {
        println!("  none found");
        return;
    }

    println!("{:<9}{:<34}{:<18}ADDRESS", "KM", "NAME", "PHONE");
    for place in places {
        println!(
            "{:<9.2}{:<34}{:<18}{}",
            place.distance_km,
            truncate(&place.name, 30),
            place.phone.as_deref().unwrap_or("-"),
            truncate(&place.address, 50)
        );
    }
}

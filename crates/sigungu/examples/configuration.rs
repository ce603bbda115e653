//! Configuration presets and debounced interactive search

use std::time::Duration;

use sigungu::{DistrictData, LocationService, ServiceConfigBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Shorter debounce and fewer suggestions for type-ahead
    let config = ServiceConfigBuilder::responsive().limit(3).build()?;
    println!("Responsive: {config:#?}");

    // Custom values with validation
    let custom = ServiceConfigBuilder::new()
        .min_query_chars(1)
        .debounce(Duration::from_millis(150))
        .timeout(Duration::from_secs(3))
        .build()?;
    println!("Custom debounce: {:?}", custom.session.debounce);

    // Invalid values are rejected at build time
    if let Err(e) = ServiceConfigBuilder::new().limit(0).build() {
        println!("Rejected: {e}");
    }

    let service = LocationService::builder()
        .data(DistrictData::embedded()?)
        .config(config)
        .build()?;

    // Simulated keystrokes: only the last one produces suggestions
    let session = service.session();
    let (first, second, last) = tokio::join!(
        session.search("강"),
        async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            session.search("강남").await
        },
        async {
            tokio::time::sleep(Duration::from_millis(80)).await;
            session.search("강남구").await
        },
    );
    println!("'강' → {first:?}");
    println!("'강남' → {second:?}");
    println!("'강남구' → {last:?}");

    Ok(())
}

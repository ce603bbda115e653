//! Resolving districts and places to coordinates
//!
//! Queries Open-Meteo (and Nominatim for free text), so it needs network access.

use sigungu::{LocationService, Resolution};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = sigungu::init_logging(tracing::Level::INFO);
    let service = LocationService::new_embedded()?;

    // Seeded in the local table, answered without a request
    print("서울특별시", &service.resolve("서울특별시").await);

    // Scored against admin1/admin2 so the Seoul district wins over namesakes
    print("서울특별시-중구", &service.resolve("서울특별시-중구").await);
    print("부산광역시-중구", &service.resolve("부산광역시-중구").await);

    // Second call is a cache hit
    print("서울특별시-중구", &service.resolve("서울특별시-중구").await);

    // Free text through the provider chain
    print("N Seoul Tower", &service.geocode("N Seoul Tower").await);

    println!("\nPlaces for '해운대구':");
    for place in service.search_places("해운대구").await {
        println!("  {place}");
    }

    println!("\n{}", service.info().summary());
    Ok(())
}

fn print(input: &str, resolution: &Resolution) {
    match resolution {
        Resolution::Found { point, origin } => println!("{input} → {point} [{origin:?}]"),
        Resolution::NotFound => println!("{input} → not found"),
        Resolution::Cancelled => println!("{input} → cancelled"),
    }
}

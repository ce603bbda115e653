//! Offline district search
//!
//! This example demonstrates district suggestions from the embedded data:
//! - Creating a service instance using embedded data
//! - Single and multi-token queries
//! - Queries too short to search

use sigungu::LocationService;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Embedded data, no downloads and no network for searching
    let service = LocationService::new_embedded()?;
    println!("{}\n", service.info().summary());

    for query in ["강남구", "서울 중구", "성남시 분당구", "해운대구", "제"] {
        println!("Searching for '{query}':");
        print_districts(&service.search_districts(query), 5);
    }

    Ok(())
}

fn print_districts(districts: &[String], limit: usize) {
    if districts.is_empty() {
        println!("  (no match)");
    }
    for (i, district) in districts.iter().take(limit).enumerate() {
        println!("  {}. {district}", i + 1);
    }
    if districts.len() > limit {
        println!("  ... and {} more", districts.len() - limit);
    }
}

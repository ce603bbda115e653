use sigungu_data_processing::{COORDS_FILE, CORPUS_FILE, LocalCoordinateTable, load_corpus, write_artifacts};
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    // SIGUNGU_EMBED_DIR swaps the shipped sample for a full corpus
    let data_dir = std::env::var("SIGUNGU_EMBED_DIR")
        .map_or_else(|_| manifest_dir.join("data"), PathBuf::from);

    let corpus_path = data_dir.join(CORPUS_FILE);
    let corpus = load_corpus(&corpus_path)?;
    let metadata = write_artifacts(corpus, &out_dir)?;
    println!(
        "cargo:warning=Embedded {} districts, {} tokens from {}",
        metadata.districts,
        metadata.tokens,
        corpus_path.display()
    );

    write_coords(&data_dir.join(COORDS_FILE), &out_dir.join(COORDS_FILE))?;

    println!("cargo:rerun-if-changed={}", corpus_path.display());
    println!("cargo:rerun-if-changed={}", data_dir.join(COORDS_FILE).display());
    println!("cargo:rerun-if-env-changed=SIGUNGU_EMBED_DIR");

    Ok(())
}

/// Copy the seed coordinate table, or embed an empty one when there is none.
fn write_coords(seed: &Path, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let table = if seed.exists() {
        LocalCoordinateTable::load(seed)?
    } else {
        println!("cargo:warning=No seed coordinate table, embedding an empty one");
        LocalCoordinateTable::new()
    };
    table.save(out)?;
    Ok(())
}

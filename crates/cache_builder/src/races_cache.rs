//! Races catalog cache builder.
//!
//! Reads a `races.yaml` source (the same shape `pitch_core::data` embeds),
//! indexes it by race name, and writes it through the same
//! MessagePack → LZ4 → SHA256 pipeline [`crate::build_cache`] uses for the
//! generic JSON case, retargeted at race/position data instead of
//! per-player attributes.

use anyhow::{Context, Result};
use pitch_core::models::Race;
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::CacheMetadata;

/// Race catalog indexed by singular name ("human", "orc", ...), the shape
/// a server wants at request time rather than the source's `Vec<Race>`.
pub type RaceIndex = FxHashMap<String, Race>;

#[derive(Debug, Default, Clone, Copy)]
pub struct ParseStats {
    pub races_read: usize,
    pub positions_read: usize,
}

/// Builds a races cache from a YAML source file (see `pitch_core::data`
/// for the embedded copy shipped inside `pitch_core` itself).
pub fn build_races_cache(
    input_yaml: &Path,
    output_msgpack_lz4: &Path,
    schema_version: &str,
) -> Result<(CacheMetadata, ParseStats)> {
    let yaml_str = fs::read_to_string(input_yaml)
        .with_context(|| format!("Failed to read races YAML: {}", input_yaml.display()))?;
    let original_size = yaml_str.len() as u64;

    let races: Vec<Race> =
        pitch_core::data::parse_races_yaml(&yaml_str).context("Failed to parse races YAML")?;

    let stats = ParseStats {
        races_read: races.len(),
        positions_read: races.iter().map(|r| r.positions.len()).sum(),
    };

    let index: RaceIndex = races.into_iter().map(|r| (r.singular.clone(), r)).collect();

    let msgpack_bytes =
        rmp_serde::to_vec(&index).context("Failed to serialize race index to MessagePack")?;
    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);
    let compressed_size = compressed.len() as u64;

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = format!("{:x}", hasher.finalize());

    if let Some(parent) = output_msgpack_lz4.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output_msgpack_lz4, &compressed)
        .with_context(|| format!("Failed to write cache file: {}", output_msgpack_lz4.display()))?;

    let metadata = CacheMetadata {
        schema_version: schema_version.to_string(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        original_size,
        compressed_size,
        compression_ratio: compressed_size as f64 / original_size as f64,
    };

    Ok((metadata, stats))
}

/// Loads a races cache built by [`build_races_cache`] back into a [`RaceIndex`].
pub fn load_races_cache(cache_file: &Path) -> Result<RaceIndex> {
    let compressed = fs::read(cache_file)
        .with_context(|| format!("Failed to read cache file: {}", cache_file.display()))?;
    let msgpack_bytes =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;
    let index: RaceIndex =
        rmp_serde::from_slice(&msgpack_bytes).context("Failed to deserialize race index")?;
    Ok(index)
}

/// Bytes of a prebuilt races cache embedded at compile time, when the
/// `embedded_races` feature is on. `cache_builder` itself does not ship one
/// (no checked-in binary artifact); a downstream crate that runs this
/// builder as part of its own build script is expected to point this at its
/// own output via `include_bytes!`.
pub fn has_embedded_races_cache() -> bool {
    cfg!(feature = "embedded_races")
}

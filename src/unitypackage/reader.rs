// src/unitypackage/reader.rs
//! Read a `.unitypackage` back into its assets

use super::guid::is_valid_guid;
use super::{ASSET_ENTRY, META_ENTRY, PATHNAME_ENTRY};
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tar::Archive;

/// One logical asset reassembled from its three records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedAsset {
    pub guid: String,
    pub pathname: String,
    pub meta: String,
    pub content: Vec<u8>,
}

/// Raw `(entry name, content)` pairs in archive order
pub fn read_records(path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let file = File::open(path).map_err(|e| Error::io_at("failed to open", path, e))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let mut records = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = entry.path()?.to_string_lossy().to_string();
        let mut content = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut content)?;
        records.push((name, content));
    }
    Ok(records)
}

#[derive(Default)]
struct PartialAsset {
    pathname: Option<String>,
    meta: Option<String>,
    content: Option<Vec<u8>>,
}

/// Group records by GUID, in order of first appearance
///
/// Fails with `NotFound` when an asset is missing one of its three records.
/// Records outside the `<guid>/<entry>` layout are ignored.
pub fn read_assets(path: &Path) -> Result<Vec<PackagedAsset>> {
    let mut order: Vec<String> = Vec::new();
    let mut partial: HashMap<String, PartialAsset> = HashMap::new();

    for (name, content) in read_records(path)? {
        let Some((guid, entry)) = name.split_once('/') else {
            continue;
        };
        if !is_valid_guid(guid) {
            continue;
        }

        let slot = partial.entry(guid.to_string()).or_insert_with(|| {
            order.push(guid.to_string());
            PartialAsset::default()
        });
        match entry {
            ASSET_ENTRY => slot.content = Some(content),
            META_ENTRY => slot.meta = Some(String::from_utf8_lossy(&content).to_string()),
            PATHNAME_ENTRY => slot.pathname = Some(String::from_utf8_lossy(&content).to_string()),
            _ => {}
        }
    }

    order
        .into_iter()
        .map(|guid| {
            let asset = partial.remove(&guid).unwrap_or_default();
            let missing = |entry: &str| Error::NotFound(format!("{}/{} in {}", guid, entry, path.display()));
            Ok(PackagedAsset {
                pathname: asset.pathname.ok_or_else(|| missing(PATHNAME_ENTRY))?,
                meta: asset.meta.ok_or_else(|| missing(META_ENTRY))?,
                content: asset.content.ok_or_else(|| missing(ASSET_ENTRY))?,
                guid,
            })
        })
        .collect()
}

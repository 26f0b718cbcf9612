// src/unitypackage/mod.rs
//! `.unitypackage` archive format
//!
//! A `.unitypackage` is a gzip-compressed tar stream. Every asset is stored as
//! three entries under a directory named after a random 32-hex GUID:
//!
//! ```text
//! <guid>/asset       raw file bytes
//! <guid>/asset.meta  importer metadata (YAML)
//! <guid>/pathname    project path, e.g. Assets/Foo/Runtime/Foo.dll
//! ```
//!
//! No directory entries are written; Unity recreates folders from the
//! pathname records.

mod guid;
mod reader;
mod writer;

pub use guid::{is_valid_guid, GuidGenerator, RandomGuids, GUID_LEN};
pub use reader::{read_assets, read_records, PackagedAsset};
pub use writer::{asset_meta, serialize, ArchiveSummary, UnityPackageWriter};

/// File extension of the archive
pub const ARCHIVE_EXTENSION: &str = "unitypackage";

/// Root segment of every virtual path
pub const VIRTUAL_ROOT: &str = "Assets";

/// Entry name for the asset content
pub const ASSET_ENTRY: &str = "asset";

/// Entry name for the importer metadata
pub const META_ENTRY: &str = "asset.meta";

/// Entry name for the virtual path
pub const PATHNAME_ENTRY: &str = "pathname";

/// Mode recorded on every tar entry
pub const ENTRY_MODE: u32 = 0o600;

/// `<package>.unitypackage`
pub fn archive_file_name(package_name: &str) -> String {
    format!("{}.{}", package_name, ARCHIVE_EXTENSION)
}

/// Build `Assets/<root>/<relative>` with forward slashes on every host
pub fn virtual_path(virtual_root: &str, relative: &std::path::Path) -> String {
    let mut segments = vec![VIRTUAL_ROOT.to_string()];
    segments.extend(
        virtual_root
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    );
    for component in relative.components() {
        if let std::path::Component::Normal(part) = component {
            segments.push(part.to_string_lossy().to_string());
        }
    }
    segments.join("/")
}

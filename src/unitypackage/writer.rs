// src/unitypackage/writer.rs
//! Serialize an export directory into a `.unitypackage`

use super::guid::{GuidGenerator, RandomGuids};
use super::{virtual_path, ASSET_ENTRY, ENTRY_MODE, META_ENTRY, PATHNAME_ENTRY};
use crate::error::{Error, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tar::Builder;
use tracing::{debug, info};
use walkdir::WalkDir;

/// `fileFormatVersion` written into every `.meta`
pub const META_FILE_FORMAT_VERSION: u32 = 2;

/// Importer metadata for a generic asset
///
/// The trailing spaces after the empty `userData`, `assetBundleName` and
/// `assetBundleVariant` keys match what the Unity editor writes.
pub fn asset_meta(guid: &str, time_created: i64) -> String {
    format!(
        "fileFormatVersion: {}\n\
         guid: {}\n\
         timeCreated: {}\n\
         licenseType: Free\n\
         DefaultImporter:\n\
         \x20 externalObjects: {{}}\n\
         \x20 userData: \n\
         \x20 assetBundleName: \n\
         \x20 assetBundleVariant: \n",
        META_FILE_FORMAT_VERSION, guid, time_created
    )
}

/// Result of serializing an export directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Archive written
    pub path: PathBuf,
    /// Logical assets (three tar records each)
    pub assets: usize,
}

impl ArchiveSummary {
    /// Number of tar records in the archive
    pub fn records(&self) -> usize {
        self.assets * 3
    }
}

/// `.unitypackage` writer with an injectable GUID source
pub struct UnityPackageWriter<G = RandomGuids> {
    guids: G,
    time_created: Option<i64>,
}

impl Default for UnityPackageWriter<RandomGuids> {
    fn default() -> Self {
        Self::new()
    }
}

impl UnityPackageWriter<RandomGuids> {
    pub fn new() -> Self {
        Self::with_guids(RandomGuids::from_entropy())
    }
}

impl<G: GuidGenerator> UnityPackageWriter<G> {
    pub fn with_guids(guids: G) -> Self {
        Self {
            guids,
            time_created: None,
        }
    }

    /// Pin `timeCreated` instead of using the current time
    pub fn with_time_created(mut self, secs: i64) -> Self {
        self.time_created = Some(secs);
        self
    }

    /// Write every file under `export_dir` into `out_file`
    ///
    /// Files appear under `Assets/<virtual_root>/<relative path>`. A failure
    /// part-way leaves a truncated archive behind; callers should delete
    /// `out_file` on error.
    pub fn serialize(
        &mut self,
        export_dir: &Path,
        virtual_root: &str,
        out_file: &Path,
    ) -> Result<ArchiveSummary> {
        let files = scan_export_files(export_dir)?;
        let time_created = self
            .time_created
            .unwrap_or_else(|| chrono::Utc::now().timestamp());

        let output =
            File::create(out_file).map_err(|e| Error::io_at("failed to create", out_file, e))?;
        let encoder = GzEncoder::new(BufWriter::new(output), Compression::default());
        let mut archive = Builder::new(encoder);

        for source in &files {
            let relative = source.strip_prefix(export_dir).map_err(|_| {
                Error::NotFound(format!("{} is outside the export directory", source.display()))
            })?;
            let pathname = virtual_path(virtual_root, relative);
            let content = fs::read(source).map_err(|e| Error::io_at("failed to read", source, e))?;

            let guid = self.guids.next_guid();
            debug!("Packing {} as {}", pathname, guid);

            append_record(&mut archive, &format!("{}/{}", guid, ASSET_ENTRY), &content, time_created)?;
            append_record(
                &mut archive,
                &format!("{}/{}", guid, META_ENTRY),
                asset_meta(&guid, time_created).as_bytes(),
                time_created,
            )?;
            append_record(
                &mut archive,
                &format!("{}/{}", guid, PATHNAME_ENTRY),
                pathname.as_bytes(),
                time_created,
            )?;
        }

        // Close innermost-first so both trailers land before the file is flushed
        let encoder = archive.into_inner()?;
        let mut output = encoder.finish()?;
        output.flush()?;

        info!("Wrote {} assets to {}", files.len(), out_file.display());
        Ok(ArchiveSummary {
            path: out_file.to_path_buf(),
            assets: files.len(),
        })
    }
}

/// Serialize with fresh random GUIDs and the current time
pub fn serialize(export_dir: &Path, virtual_root: &str, out_file: &Path) -> Result<ArchiveSummary> {
    UnityPackageWriter::new().serialize(export_dir, virtual_root, out_file)
}

/// Every non-directory entry under `export_dir`, in file-name order per directory
fn scan_export_files(export_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(export_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn append_record<W: Write>(
    archive: &mut Builder<W>,
    name: &str,
    data: &[u8],
    mtime: i64,
) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_mode(ENTRY_MODE);
    header.set_size(data.len() as u64);
    header.set_mtime(mtime.max(0) as u64);
    archive.append_data(&mut header, name, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unitypackage::{is_valid_guid, read_records};
    use tempfile::TempDir;

    #[test]
    fn test_asset_meta_format() {
        let meta = asset_meta("0123456789abcdef0123456789abcdef", 1700000000);
        let expected = "fileFormatVersion: 2\n\
                        guid: 0123456789abcdef0123456789abcdef\n\
                        timeCreated: 1700000000\n\
                        licenseType: Free\n\
                        DefaultImporter:\n  \
                        externalObjects: {}\n  \
                        userData: \n  \
                        assetBundleName: \n  \
                        assetBundleVariant: \n";
        assert_eq!(meta, expected);
    }

    #[test]
    fn test_serialize_records_per_file() {
        let export = TempDir::new().unwrap();
        fs::create_dir_all(export.path().join("Runtime")).unwrap();
        fs::write(export.path().join("Runtime/Foo.dll"), b"MZ fake dll").unwrap();
        fs::write(export.path().join("package.json"), b"{}").unwrap();

        let out = TempDir::new().unwrap();
        let out_file = out.path().join("Foo.unitypackage");
        let summary = UnityPackageWriter::with_guids(RandomGuids::seeded(3))
            .with_time_created(1700000000)
            .serialize(export.path(), "Foo", &out_file)
            .unwrap();

        assert_eq!(summary.assets, 2);
        assert_eq!(summary.records(), 6);

        let records = read_records(&out_file).unwrap();
        assert_eq!(records.len(), 6);
        for chunk in records.chunks(3) {
            let guid = chunk[0].0.split('/').next().unwrap();
            assert!(is_valid_guid(guid));
            assert_eq!(chunk[0].0, format!("{}/asset", guid));
            assert_eq!(chunk[1].0, format!("{}/asset.meta", guid));
            assert_eq!(chunk[2].0, format!("{}/pathname", guid));
        }
    }

    #[test]
    fn test_serialize_empty_dir_is_valid_archive() {
        let export = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let out_file = out.path().join("Empty.unitypackage");

        let summary = serialize(export.path(), "Empty", &out_file).unwrap();

        assert_eq!(summary.assets, 0);
        assert!(read_records(&out_file).unwrap().is_empty());
    }

    #[test]
    fn test_serialize_missing_export_dir() {
        let out = TempDir::new().unwrap();
        let result = serialize(
            &out.path().join("missing"),
            "Foo",
            &out.path().join("Foo.unitypackage"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_output_dir_missing() {
        let export = TempDir::new().unwrap();
        fs::write(export.path().join("a.txt"), b"a").unwrap();
        let out = TempDir::new().unwrap();

        let err = serialize(export.path(), "Foo", &out.path().join("no/such/dir/Foo.unitypackage"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

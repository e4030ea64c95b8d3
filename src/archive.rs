use crate::error::ArchiveError;
use crate::types::Region;
use crate::utils::{artifact_path, artifact_temp_file, base_file_name};
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::CompressionMethod;
use zip::write::FileOptions;

/// Bundle `files` into `{date}({region}).zip` inside `output_dir`
///
/// Each file is stored under its base name only. Inputs sharing a base name
/// are stored once (first occurrence wins). An existing archive at the target
/// path is replaced.
pub fn build_archive(
    output_dir: &Path,
    date: NaiveDate,
    region: Region,
    files: &[PathBuf],
) -> Result<PathBuf, ArchiveError> {
    let archive_path = artifact_path(output_dir, date, region, "zip");
    debug!(?archive_path, inputs = files.len(), "building archive");

    let mut tmp = artifact_temp_file(output_dir).map_err(|source| ArchiveError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let zip_err = |source| ArchiveError::Zip {
        path: archive_path.clone(),
        source,
    };

    let mut writer = zip::ZipWriter::new(tmp.as_file_mut());
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut added: Vec<String> = Vec::with_capacity(files.len());

    for file in files {
        let name = base_file_name(file).ok_or_else(|| ArchiveError::InvalidInput(file.clone()))?;
        if added.contains(&name) {
            debug!(?file, "skipping duplicate archive entry");
            continue;
        }

        let content = std::fs::read(file).map_err(|source| ArchiveError::Io {
            path: file.clone(),
            source,
        })?;
        writer.start_file(name.as_str(), options).map_err(zip_err)?;
        writer.write_all(&content).map_err(|source| ArchiveError::Io {
            path: archive_path.clone(),
            source,
        })?;
        added.push(name);
    }

    writer.finish().map_err(zip_err)?;
    // ZipWriter implements Drop; release its borrow of the temp file
    drop(writer);
    tmp.as_file().sync_all().map_err(|source| ArchiveError::Io {
        path: archive_path.clone(),
        source,
    })?;
    tmp.persist(&archive_path)
        .map_err(|e| ArchiveError::Io {
            path: archive_path.clone(),
            source: e.error,
        })?;

    info!(?archive_path, entries = added.len(), "archive created");
    Ok(archive_path)
}

/// Entry names of an existing archive, in stored order
pub fn archive_entries(path: &Path) -> Result<Vec<String>, ArchiveError> {
    let file = std::fs::File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let zip_err = |source| ArchiveError::Zip {
        path: path.to_path_buf(),
        source,
    };

    let mut archive = zip::ZipArchive::new(file).map_err(zip_err)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(zip_err)?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn write_inputs(dir: &Path) -> Vec<PathBuf> {
        let webp = dir.join("2024-01-15(Global).webp");
        let jpeg = dir.join("2024-01-15(Global).jpeg");
        std::fs::write(&webp, b"webp-bytes").unwrap();
        std::fs::write(&jpeg, b"jpeg-bytes").unwrap();
        vec![webp, jpeg.clone(), jpeg]
    }

    #[test]
    fn archive_is_named_by_date_and_region() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = write_inputs(temp_dir.path());

        let path = build_archive(temp_dir.path(), date(), Region::Global, &inputs).unwrap();

        assert_eq!(path, temp_dir.path().join("2024-01-15(Global).zip"));
        assert!(path.is_file());
    }

    #[test]
    fn entries_use_base_names_without_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = write_inputs(temp_dir.path());

        let path = build_archive(temp_dir.path(), date(), Region::Global, &inputs).unwrap();

        assert_eq!(
            archive_entries(&path).unwrap(),
            vec!["2024-01-15(Global).webp", "2024-01-15(Global).jpeg"]
        );
    }

    #[test]
    fn entries_preserve_content() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = write_inputs(temp_dir.path());
        let path = build_archive(temp_dir.path(), date(), Region::Global, &inputs).unwrap();

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("2024-01-15(Global).webp")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "webp-bytes");
    }

    #[test]
    fn inputs_from_other_directories_are_flattened() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        let file = nested.join("photo.jpeg");
        std::fs::write(&file, b"x").unwrap();

        let path = build_archive(temp_dir.path(), date(), Region::China, &[file]).unwrap();

        assert_eq!(archive_entries(&path).unwrap(), vec!["photo.jpeg"]);
    }

    #[test]
    fn rebuilding_replaces_previous_archive() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = write_inputs(temp_dir.path());
        build_archive(temp_dir.path(), date(), Region::Global, &inputs).unwrap();

        let path =
            build_archive(temp_dir.path(), date(), Region::Global, &inputs[..1]).unwrap();

        assert_eq!(
            archive_entries(&path).unwrap(),
            vec!["2024-01-15(Global).webp"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn archive_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let inputs = write_inputs(temp_dir.path());
        let path = build_archive(temp_dir.path(), date(), Region::Global, &inputs).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, crate::utils::ARTIFACT_MODE);
    }

    #[test]
    fn missing_input_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.jpeg");

        let err = build_archive(temp_dir.path(), date(), Region::Global, &[missing]).unwrap_err();

        assert!(matches!(err, ArchiveError::Io { .. }));
        assert!(!temp_dir.path().join("2024-01-15(Global).zip").exists());
    }
}

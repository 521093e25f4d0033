//! ZIP extraction of downloaded artifacts.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::progress::Progress;

/// Extraction errors
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to open the archive ({0})")]
    Open(#[source] ZipError),
    #[error("failed to get ZIP entry \"{entry}\"")]
    MissingEntry { entry: String },
    #[error("failed to read ZIP entry \"{entry}\" ({source})")]
    Entry {
        entry: String,
        #[source]
        source: ZipError,
    },
    #[error("ZIP entry \"{entry}\" points outside of the destination")]
    UnsafeEntry { entry: String },
    #[error("failed to open output file {path:?} for {entry} ({source})")]
    CreateOutput {
        entry: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decompress {entry} ({source})")]
    Decompress {
        entry: String,
        #[source]
        source: std::io::Error,
    },
}

/// An opened ZIP archive
pub struct ZipReader {
    archive: ZipArchive<File>,
}

impl ZipReader {
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).map_err(|e| ArchiveError::Open(ZipError::Io(e)))?;
        let archive = ZipArchive::new(file).map_err(ArchiveError::Open)?;
        debug!("Opened {:?} ({} entries)", path, archive.len());
        Ok(Self { archive })
    }

    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Extracts the entry `name` to `output`. The parent directory of
    /// `output` must exist.
    pub fn extract_entry(
        &mut self,
        name: &str,
        output: &Path,
        progress: &mut dyn Progress,
    ) -> Result<(), ArchiveError> {
        let mut entry = self.archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => ArchiveError::MissingEntry {
                entry: name.to_string(),
            },
            source => ArchiveError::Entry {
                entry: name.to_string(),
                source,
            },
        })?;
        write_entry(&mut entry, display_name(name), output, progress)
    }

    /// Extracts every file of the archive into `dir`, keeping the
    /// relative paths. Returns the written files.
    pub fn extract_all(
        &mut self,
        dir: &Path,
        progress: &mut dyn Progress,
    ) -> Result<Vec<PathBuf>, ArchiveError> {
        let mut written = Vec::with_capacity(self.archive.len());

        for index in 0..self.archive.len() {
            let mut entry = self.archive.by_index(index).map_err(|source| ArchiveError::Entry {
                entry: format!("#{}", index),
                source,
            })?;
            let name = entry.name().to_string();
            let relative = entry
                .enclosed_name()
                .map(Path::to_path_buf)
                .ok_or_else(|| ArchiveError::UnsafeEntry { entry: name.clone() })?;
            let output = dir.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&output).map_err(|source| ArchiveError::CreateOutput {
                    entry: name.clone(),
                    path: output.clone(),
                    source,
                })?;
                continue;
            }

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent).map_err(|source| ArchiveError::CreateOutput {
                    entry: name.clone(),
                    path: output.clone(),
                    source,
                })?;
            }
            write_entry(&mut entry, display_name(&name), &output, progress)?;
            written.push(output);
        }

        Ok(written)
    }
}

fn display_name(entry: &str) -> &str {
    entry.rsplit('/').find(|part| !part.is_empty()).unwrap_or(entry)
}

fn write_entry<R: Read>(
    reader: &mut R,
    name: &str,
    output: &Path,
    progress: &mut dyn Progress,
) -> Result<(), ArchiveError> {
    let mut file = File::create(output).map_err(|source| ArchiveError::CreateOutput {
        entry: name.to_string(),
        path: output.to_path_buf(),
        source,
    })?;

    progress.set_text(&format!("Extracting {}", name));
    std::io::copy(reader, &mut file).map_err(|source| ArchiveError::Decompress {
        entry: name.to_string(),
        source,
    })?;

    debug!("Extracted {} to {:?}", name, output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{ProgressFactory, TerminalProgressFactory};
    use std::io::Write;

    fn create_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("build-tools.zip");
        create_zip(&archive, &[("lib/d8.jar", b"d8"), ("lib/apksigner.jar", b"signer")]);

        let mut progress = TerminalProgressFactory::hidden().create("Extracting", false);
        let mut zip = ZipReader::open(&archive).unwrap();
        let output = tmp.path().join("d8.jar");
        zip.extract_entry("lib/d8.jar", &output, progress.as_mut()).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"d8");
        assert_eq!(progress.text(), "Extracting d8.jar");
    }

    #[test]
    fn test_missing_entry_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("platform.zip");
        create_zip(&archive, &[("android.jar", b"framework")]);

        let mut progress = TerminalProgressFactory::hidden().create("Extracting", false);
        let mut zip = ZipReader::open(&archive).unwrap();
        let output = tmp.path().join("out.jar");
        let err = zip.extract_entry("missing.jar", &output, progress.as_mut()).unwrap_err();

        assert!(matches!(err, ArchiveError::MissingEntry { ref entry } if entry == "missing.jar"));
        assert!(!output.exists());
    }

    #[test]
    fn test_output_open_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("platform.zip");
        create_zip(&archive, &[("android.jar", b"framework")]);

        let mut progress = TerminalProgressFactory::hidden().create("Extracting", false);
        let mut zip = ZipReader::open(&archive).unwrap();
        let output = tmp.path().join("no-such-dir").join("android.jar");
        let err = zip.extract_entry("android.jar", &output, progress.as_mut()).unwrap_err();

        assert!(matches!(err, ArchiveError::CreateOutput { .. }));
        assert!(err.to_string().contains("android.jar"));
    }

    #[test]
    fn test_extract_all() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("tools.zip");
        create_zip(
            &archive,
            &[("aapt2", b"aapt2"), ("zipalign", b"zipalign"), ("share/", b""), ("share/notice", b"n")],
        );

        let mut progress = TerminalProgressFactory::hidden().create("Extracting", false);
        let mut zip = ZipReader::open(&archive).unwrap();
        assert_eq!(zip.entry_names().len(), 4);

        let dest = tmp.path().join("bin");
        std::fs::create_dir(&dest).unwrap();
        let written = zip.extract_all(&dest, progress.as_mut()).unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(std::fs::read(dest.join("zipalign")).unwrap(), b"zipalign");
        assert_eq!(std::fs::read(dest.join("share/notice")).unwrap(), b"n");
    }

    #[test]
    fn test_not_an_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("garbage.zip");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        assert!(matches!(ZipReader::open(&path), Err(ArchiveError::Open(_))));
    }
}

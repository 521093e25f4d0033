//! SDK Installer
//!
//! Drives an installation run:
//!
//! 1. confirm overwriting an existing installation;
//! 2. download the manifest and choose an API version;
//! 3. install tools, build tools and the platform framework, in this order;
//! 4. install the time zone database and assets (asking first on updates);
//! 5. move everything into the SDK layout and record the installed version.
//!
//! Artifacts are extracted into a staging directory inside the SDK root and
//! only moved into place once every artifact of the run has been verified.
//! A run that fails before that point leaves the layout untouched. Moving
//! the files is a sequence of renames, not a single atomic step.

use std::fmt;
use std::path::Path;

use apm_core::{ApmError, InstalledVersionStore};
use tempfile::TempPath;
use tracing::{debug, info, warn};

use crate::archive::{ArchiveError, ZipReader};
use crate::fetch::{FetchError, Fetcher};
use crate::hashing::sha256_file;
use crate::layout::{HostArch, Jar, LayoutError, SdkFile, SdkLayout};
use crate::manifest::{AssetFile, Manifest};
use crate::progress::{Progress, ProgressFactory};
use crate::prompt::Prompt;
use crate::resolver::{download_manifest, select_version, ResolveError};

/// Repository with the manifest and the SDK artifacts
pub const REPOSITORY_URL: &str = "https://github.com/lem0nez/apm/raw/data/";

const STAGING_PREFIX: &str = ".staging-";

/// Unit of independent download, verification and extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactCategory {
    Tools,
    BuildTools,
    Platform,
    Tzdata,
    Assets,
}

impl ArtifactCategory {
    /// Categories that depend on the API version, in installation order
    pub const API_DEPENDENT: [ArtifactCategory; 3] = [
        ArtifactCategory::Tools,
        ArtifactCategory::BuildTools,
        ArtifactCategory::Platform,
    ];

    pub fn subject(self) -> &'static str {
        match self {
            ArtifactCategory::Tools => "tools",
            ArtifactCategory::BuildTools => "build tools",
            ArtifactCategory::Platform => "platform",
            ArtifactCategory::Tzdata => "time zone database",
            ArtifactCategory::Assets => "assets",
        }
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subject())
    }
}

/// Failure of a single artifact
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Tools aren't available for architecture {arch}. Try another API version, if available")]
    ToolsUnavailable { arch: HostArch },
    #[error("Couldn't find {subject} in the manifest{}", version_hint(.api))]
    NotInManifest {
        subject: &'static str,
        api: Option<String>,
    },
    #[error("URL to {subject} doesn't exist")]
    MissingUrl { subject: &'static str },
    #[error("Checksum of {subject} isn't published")]
    MissingChecksum { subject: String },
    #[error("Couldn't extract {subject}: no path provided for an entry")]
    MissingEntryPath { subject: &'static str },
    #[error("Android framework path doesn't exist")]
    MissingFramework,
    #[error("Couldn't open the temporary file ({0})")]
    Scratch(#[source] std::io::Error),
    #[error("Couldn't download {subject} ({source})")]
    Download {
        subject: String,
        #[source]
        source: FetchError,
    },
    #[error("Couldn't install {subject}: invalid checksum. Try to set up SDK again")]
    Checksum { subject: String },
    #[error("Couldn't extract {subject}: {source}")]
    Extract {
        subject: &'static str,
        #[source]
        source: ArchiveError,
    },
    #[error("Couldn't set permissions for {name} ({source})")]
    Permissions {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("No assets found in the manifest")]
    NoAssets,
    #[error("An asset doesn't have a name")]
    UnnamedAsset,
    #[error("Unknown asset {name}: there is no place to install it")]
    UnknownAsset { name: String },
    #[error("Couldn't install asset {name}: failed to open output file {path:?} ({source})")]
    Output {
        name: String,
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn version_hint(api: &Option<String>) -> String {
    match api {
        Some(api) => format!(" for API {}. Try another API version, if available", api),
        None => String::new(),
    }
}

/// Installation errors
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("SDK isn't available for the architecture of this machine")]
    UnsupportedHost,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Couldn't prepare the HTTP client ({0})")]
    Client(#[source] FetchError),
    #[error("Couldn't prepare SDK directories: {0}")]
    Layout(#[from] LayoutError),
    #[error("Couldn't create a staging directory ({0})")]
    Staging(#[source] std::io::Error),
    #[error("Couldn't create a temporary file ({0})")]
    Scratch(#[source] std::io::Error),
    #[error("{source}")]
    Artifact {
        category: ArtifactCategory,
        #[source]
        source: ArtifactError,
    },
    #[error("Couldn't move installed files into place ({0})")]
    Commit(#[source] std::io::Error),
    #[error("Couldn't preserve API version: {0}")]
    Persist(#[source] ApmError),
}

impl InstallError {
    /// Whether a progress indicator already showed this error
    pub fn is_reported(&self) -> bool {
        match self {
            InstallError::Resolve(e) => e.is_reported(),
            InstallError::Artifact { .. } => true,
            _ => false,
        }
    }
}

/// How an installation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The SDK with this API version is installed
    Installed(u32),
    /// The user chose to keep the existing installation
    Kept,
}

/// Where to download from and for which architecture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Repository URL ending with a slash
    pub base_url: String,
    pub arch: HostArch,
}

impl InstallOptions {
    /// Default repository and the architecture of this machine
    pub fn for_host() -> Result<Self, InstallError> {
        let arch = HostArch::current().ok_or(InstallError::UnsupportedHost)?;
        Ok(Self::new(REPOSITORY_URL, arch))
    }

    pub fn new(base_url: &str, arch: HostArch) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url, arch }
    }
}

/// Installs the SDK into a layout
pub struct SdkInstaller {
    layout: SdkLayout,
    options: InstallOptions,
}

impl SdkInstaller {
    pub fn new(layout: SdkLayout, options: InstallOptions) -> Self {
        Self { layout, options }
    }

    pub fn layout(&self) -> &SdkLayout {
        &self.layout
    }

    /// Runs an interactive installation. `existing` is the currently
    /// installed API version, if any.
    pub async fn install(
        &self,
        existing: Option<u32>,
        store: &mut dyn InstalledVersionStore,
        progress_factory: &dyn ProgressFactory,
        prompt: &mut dyn Prompt,
    ) -> Result<InstallOutcome, InstallError> {
        let existing = existing.filter(|api| *api != 0);
        if let Some(api) = existing {
            let question = format!(
                "You have already installed SDK with API {}.\nDo you want to override it?",
                api
            );
            if !prompt.confirm(&question, Some(false)) {
                info!("Keeping installed SDK (API {})", api);
                return Ok(InstallOutcome::Kept);
            }
        }

        let fetcher = Fetcher::new().map_err(InstallError::Client)?;
        let manifest = download_manifest(&fetcher, &self.options.base_url, progress_factory).await?;
        let api = select_version(&manifest, prompt)?;
        let api_str = api.to_string();
        prompt.say(&format!("Installing SDK (API {}):", api));

        self.layout.create_dirs()?;
        remove_stale_staging(self.layout.root());
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(self.layout.root())
            .map_err(InstallError::Staging)?;
        let staged = SdkLayout::with_root(staging.path());
        staged.create_dirs()?;
        // Used to store downloaded archives.
        let scratch = tempfile::Builder::new()
            .prefix("apm-")
            .tempfile()
            .map_err(InstallError::Scratch)?
            .into_temp_path();
        debug!("Staging into {:?}, scratch file {:?}", staging.path(), scratch);

        let run = Run {
            fetcher,
            base_url: &self.options.base_url,
            arch: self.options.arch,
            manifest: &manifest,
            scratch,
            staged,
            progress_factory,
        };

        for category in ArtifactCategory::API_DEPENDENT {
            let mut progress = progress_factory.create(&preparing_text(category), false);
            let result = match category {
                ArtifactCategory::Tools => run.install_tools(&api_str, progress.as_mut()).await,
                ArtifactCategory::BuildTools => {
                    run.install_build_tools(&api_str, progress.as_mut()).await
                }
                _ => run.install_framework(&api_str, progress.as_mut()).await,
            };
            finish(progress, category, result)?;
        }

        let install_independent = match existing {
            // Ask only when updating a complete installation.
            Some(_) if self.layout.has_version_independent_files() => {
                let update =
                    prompt.confirm("Do you want to update API independent files?", Some(true));
                if update {
                    prompt.say("Updating API independent files:");
                }
                update
            }
            _ => true,
        };

        if install_independent {
            let mut progress =
                progress_factory.create(&preparing_text(ArtifactCategory::Tzdata), false);
            let result = run.install_tzdata(progress.as_mut()).await;
            finish(progress, ArtifactCategory::Tzdata, result)?;

            run.install_assets().await?;
        }

        let moved = commit(staging.path(), self.layout.root()).map_err(InstallError::Commit)?;
        info!("Moved {} files into {:?}", moved, self.layout.root());

        store.set_installed_version(api).map_err(InstallError::Persist)?;
        prompt.say("SDK installed.");
        Ok(InstallOutcome::Installed(api))
    }
}

fn preparing_text(category: ArtifactCategory) -> String {
    format!("Preparing to download {}", category.subject())
}

/// Finishes the progress indicator of an artifact with the outcome
fn finish(
    mut progress: Box<dyn Progress>,
    category: ArtifactCategory,
    result: Result<String, ArtifactError>,
) -> Result<(), InstallError> {
    match result {
        Ok(message) => {
            info!("{}", message);
            progress.finish(true, &message);
            Ok(())
        }
        Err(source) => {
            warn!("Installing {} failed: {}", category, source);
            progress.finish(false, &source.to_string());
            Err(InstallError::Artifact { category, source })
        }
    }
}

/// Removes staging directories left behind by interrupted runs.
fn remove_stale_staging(root: &Path) -> usize {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Can't list {:?}: {}", root, e);
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX) || !path.is_dir() {
            continue;
        }
        match std::fs::remove_dir_all(&path) {
            Ok(()) => {
                info!("Removed stale staging directory {:?}", path);
                removed += 1;
            }
            Err(e) => warn!("Couldn't remove stale staging directory {:?}: {}", path, e),
        }
    }
    removed
}

/// Moves every file from `staging` to the same relative path in `root`.
fn commit(staging: &Path, root: &Path) -> std::io::Result<usize> {
    let mut moved = 0;
    for entry in std::fs::read_dir(staging)? {
        let entry = entry?;
        let target = root.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir_all(&target)?;
            moved += commit(&entry.path(), &target)?;
        } else {
            std::fs::rename(entry.path(), &target)?;
            moved += 1;
        }
    }
    Ok(moved)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// A download that must match a published checksum
struct Download<'a> {
    url: String,
    checksum: &'a str,
    subject: String,
    show_size: bool,
}

/// State shared by the artifact installers of one run
struct Run<'a> {
    fetcher: Fetcher,
    base_url: &'a str,
    arch: HostArch,
    manifest: &'a Manifest,
    scratch: TempPath,
    staged: SdkLayout,
    progress_factory: &'a dyn ProgressFactory,
}

impl Run<'_> {
    async fn install_tools(
        &self,
        api: &str,
        progress: &mut dyn Progress,
    ) -> Result<String, ArtifactError> {
        let arch = self.arch;
        let archive = self
            .manifest
            .tool_archive(api, arch.name())
            .ok_or(ArtifactError::ToolsUnavailable { arch })?;
        let checksum = archive
            .sha256
            .as_deref()
            .ok_or_else(|| ArtifactError::MissingChecksum {
                subject: format!("tools for architecture {}", arch),
            })?;

        progress.set_text("Downloading tools");
        let download = Download {
            url: format!("{}tools/api-{}/{}.zip", self.base_url, api, arch),
            checksum,
            subject: ArtifactCategory::Tools.subject().to_string(),
            show_size: true,
        };
        self.download_to_scratch(&download, progress).await?;

        let subject = ArtifactCategory::Tools.subject();
        let extract_err = |source: ArchiveError| ArtifactError::Extract { subject, source };
        let mut zip = ZipReader::open(&self.scratch).map_err(extract_err)?;
        let written = zip
            .extract_all(&self.staged.tools_dir(), progress)
            .map_err(extract_err)?;

        for path in &written {
            make_executable(path).map_err(|source| ArtifactError::Permissions {
                name: file_name(path),
                source,
            })?;
        }
        Ok(format!("Tools for {} installed", arch))
    }

    async fn install_build_tools(
        &self,
        api: &str,
        progress: &mut dyn Progress,
    ) -> Result<String, ArtifactError> {
        let subject = ArtifactCategory::BuildTools.subject();
        let bundle = self
            .manifest
            .build_tools(api)
            .ok_or_else(|| ArtifactError::NotInManifest {
                subject,
                api: Some(api.to_string()),
            })?;
        let url = bundle.url.clone().ok_or(ArtifactError::MissingUrl { subject })?;
        let checksum = bundle
            .sha256
            .as_deref()
            .ok_or_else(|| ArtifactError::MissingChecksum { subject: subject.to_string() })?;

        progress.set_determined(true);
        progress.set_text("Downloading build tools");
        let download = Download {
            url,
            checksum,
            subject: subject.to_string(),
            show_size: true,
        };
        self.download_to_scratch(&download, progress).await?;

        // Large archive, opening takes a while.
        progress.set_text("Opening archive with build tools");
        let extract_err = |source: ArchiveError| ArtifactError::Extract { subject, source };
        let mut zip = ZipReader::open(&self.scratch).map_err(extract_err)?;

        for entry in &bundle.entries {
            let name = Path::new(entry)
                .file_name()
                .ok_or(ArtifactError::MissingEntryPath { subject })?;
            let output = self.staged.jars_dir().join(name);
            zip.extract_entry(entry, &output, progress).map_err(extract_err)?;
        }
        Ok("Build tools installed".to_string())
    }

    async fn install_framework(
        &self,
        api: &str,
        progress: &mut dyn Progress,
    ) -> Result<String, ArtifactError> {
        let subject = ArtifactCategory::Platform.subject();
        let bundle = self
            .manifest
            .platform(api)
            .ok_or_else(|| ArtifactError::NotInManifest {
                subject,
                api: Some(api.to_string()),
            })?;
        let url = bundle.url.clone().ok_or(ArtifactError::MissingUrl { subject })?;
        let checksum = bundle
            .sha256
            .as_deref()
            .ok_or_else(|| ArtifactError::MissingChecksum { subject: subject.to_string() })?;
        let framework = bundle
            .framework
            .as_deref()
            .filter(|path| !path.is_empty())
            .ok_or(ArtifactError::MissingFramework)?;

        progress.set_determined(true);
        progress.set_text("Downloading platform");
        let download = Download {
            url,
            checksum,
            subject: subject.to_string(),
            show_size: true,
        };
        self.download_to_scratch(&download, progress).await?;

        progress.set_text("Opening archive with Android framework");
        let extract_err = |source: ArchiveError| ArtifactError::Extract { subject, source };
        let mut zip = ZipReader::open(&self.scratch).map_err(extract_err)?;
        zip.extract_entry(framework, &self.staged.library_path(Jar::Framework), progress)
            .map_err(extract_err)?;
        Ok("Android framework installed".to_string())
    }

    async fn install_tzdata(&self, progress: &mut dyn Progress) -> Result<String, ArtifactError> {
        let subject = ArtifactCategory::Tzdata.subject();
        let not_found = || ArtifactError::NotInManifest {
            subject: "the latest time zone database",
            api: None,
        };
        let bundle = self.manifest.latest_tzdata().ok_or_else(not_found)?;
        if bundle.label.is_empty() {
            return Err(not_found());
        }
        let checksum = bundle
            .sha256
            .as_deref()
            .ok_or_else(|| ArtifactError::MissingChecksum { subject: subject.to_string() })?;

        progress.set_text("Downloading time zone database");
        let download = Download {
            url: format!("{}tzdata/{}.zip", self.base_url, bundle.label),
            checksum,
            subject: subject.to_string(),
            show_size: true,
        };
        self.download_to_scratch(&download, progress).await?;

        let extract_err = |source: ArchiveError| ArtifactError::Extract { subject, source };
        let mut zip = ZipReader::open(&self.scratch).map_err(extract_err)?;
        let output = self.staged.file_path(SdkFile::Tzdata);
        zip.extract_entry(SdkFile::Tzdata.file_name(), &output, progress)
            .map_err(extract_err)?;
        Ok(format!("Time zone database {} installed", bundle.label))
    }

    /// Each asset gets its own progress indicator.
    async fn install_assets(&self) -> Result<(), InstallError> {
        let assets = self.manifest.assets();
        if assets.is_empty() {
            let progress = self
                .progress_factory
                .create(&preparing_text(ArtifactCategory::Assets), false);
            return finish(progress, ArtifactCategory::Assets, Err(ArtifactError::NoAssets));
        }

        for asset in assets {
            let mut progress = self
                .progress_factory
                .create(&preparing_text(ArtifactCategory::Assets), false);
            let result = self.install_asset(asset, progress.as_mut()).await;
            finish(progress, ArtifactCategory::Assets, result)?;
        }
        Ok(())
    }

    async fn install_asset(
        &self,
        asset: &AssetFile,
        progress: &mut dyn Progress,
    ) -> Result<String, ArtifactError> {
        let name = asset.name.as_str();
        if name.is_empty() {
            return Err(ArtifactError::UnnamedAsset);
        }
        let subject = format!("asset {}", name);
        let checksum = asset
            .sha256
            .as_deref()
            .ok_or_else(|| ArtifactError::MissingChecksum { subject: subject.clone() })?;

        let (file, friendly_name) = match known_asset(name) {
            Some(asset) => asset,
            None => return Err(ArtifactError::UnknownAsset { name: name.to_string() }),
        };
        let path = self.staged.file_path(file);
        let output = tokio::fs::File::create(&path)
            .await
            .map_err(|source| ArtifactError::Output {
                name: name.to_string(),
                path: path.clone(),
                source,
            })?;

        progress.set_text(&format!("Downloading {}", name));
        let download = Download {
            url: format!("{}assets/{}", self.base_url, name),
            checksum,
            subject,
            show_size: false,
        };
        if let Err(e) = self.download_verified(output, &path, &download, progress).await {
            if let Err(remove_err) = std::fs::remove_file(&path) {
                debug!("Couldn't remove {:?}: {}", path, remove_err);
            }
            return Err(e);
        }
        Ok(format!("{} downloaded", friendly_name))
    }

    async fn download_to_scratch(
        &self,
        download: &Download<'_>,
        progress: &mut dyn Progress,
    ) -> Result<(), ArtifactError> {
        let output = tokio::fs::File::create(&self.scratch)
            .await
            .map_err(ArtifactError::Scratch)?;
        self.download_verified(output, &self.scratch, download, progress).await
    }

    /// Downloads into `output`, closes it and compares the checksum of
    /// the file at `path`.
    async fn download_verified(
        &self,
        mut output: tokio::fs::File,
        path: &Path,
        download: &Download<'_>,
        progress: &mut dyn Progress,
    ) -> Result<(), ArtifactError> {
        let result = self
            .fetcher
            .download(&mut output, &download.url, progress, download.show_size)
            .await;
        drop(output);
        result.map_err(|source| ArtifactError::Download {
            subject: download.subject.clone(),
            source,
        })?;

        progress.set_determined(false);
        progress.set_text("Calculating checksum");
        let actual = sha256_file(path);
        if actual != download.checksum {
            warn!(
                "Checksum mismatch for {}: expected {}, got {}",
                download.subject, download.checksum, actual
            );
            return Err(ArtifactError::Checksum {
                subject: download.subject.clone(),
            });
        }
        Ok(())
    }
}

/// Local file and display name of an asset known by file name
fn known_asset(name: &str) -> Option<(SdkFile, &'static str)> {
    [
        (SdkFile::DebugKeystore, "Debug keystore"),
        (SdkFile::ProjectTemplate, "Project template"),
    ]
    .into_iter()
    .find(|(file, _)| file.file_name() == name)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_assets() {
        assert_eq!(known_asset("debug.jks").map(|a| a.0), Some(SdkFile::DebugKeystore));
        assert_eq!(
            known_asset("project-template.zip").map(|a| a.0),
            Some(SdkFile::ProjectTemplate)
        );
        // The time zone database comes from its own archive.
        assert_eq!(known_asset("tzdata"), None);
        assert_eq!(known_asset("bogus.bin"), None);
    }

    #[test]
    fn test_options_normalize_url() {
        let options = InstallOptions::new("http://localhost:8080/data", HostArch::X86_64);
        assert_eq!(options.base_url, "http://localhost:8080/data/");
    }

    #[test]
    fn test_error_messages() {
        let err = ArtifactError::NotInManifest {
            subject: "build tools",
            api: Some("24".into()),
        };
        assert_eq!(
            err.to_string(),
            "Couldn't find build tools in the manifest for API 24. Try another API version, if available"
        );

        let err = ArtifactError::Checksum { subject: "platform".into() };
        assert!(err.to_string().contains("invalid checksum"));
    }

    #[test]
    fn test_commit_moves_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        let staging = tmp.path().join("staging");
        let root = tmp.path().join("root");
        std::fs::create_dir_all(staging.join("bin")).unwrap();
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::write(staging.join("bin/aapt2"), b"new").unwrap();
        std::fs::write(staging.join("tzdata"), b"tz").unwrap();
        std::fs::write(root.join("bin/aapt2"), b"old").unwrap();

        assert_eq!(commit(&staging, &root).unwrap(), 2);
        assert_eq!(std::fs::read(root.join("bin/aapt2")).unwrap(), b"new");
        assert_eq!(std::fs::read(root.join("tzdata")).unwrap(), b"tz");
        assert!(!staging.join("tzdata").exists());
    }

    #[test]
    fn test_remove_stale_staging() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join(".staging-a1b2/bin")).unwrap();
        std::fs::write(root.join(".staging-a1b2/bin/aapt2"), b"half").unwrap();
        std::fs::create_dir(root.join(".staging-c3d4")).unwrap();
        std::fs::create_dir(root.join("bin")).unwrap();
        std::fs::write(root.join(".staging-note"), b"not a directory").unwrap();

        assert_eq!(remove_stale_staging(root), 2);
        assert!(!root.join(".staging-a1b2").exists());
        assert!(!root.join(".staging-c3d4").exists());
        assert!(root.join("bin").is_dir());
        assert!(root.join(".staging-note").is_file());

        assert_eq!(remove_stale_staging(&root.join("missing")), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_make_executable() {
        use std::os::unix::fs::PermissionsExt;

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o640)).unwrap();
        make_executable(file.path()).unwrap();

        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o751);
    }
}

//! Android SDK Acquisition
//!
//! Downloads, verifies and installs the SDK used to build applications:
//! - Native tools (`aapt2`, `zipalign`) for the host architecture
//! - Build tools and the platform framework for an API version
//! - The time zone database and static assets

pub mod archive;
pub mod fetch;
pub mod hashing;
pub mod installer;
pub mod layout;
pub mod manifest;
pub mod progress;
pub mod prompt;
pub mod resolver;

pub use archive::{ArchiveError, ZipReader};
pub use fetch::{FetchError, Fetcher};
pub use hashing::sha256_file;
pub use installer::{
    ArtifactCategory, ArtifactError, InstallError, InstallOptions, InstallOutcome, SdkInstaller,
    REPOSITORY_URL,
};
pub use layout::{HostArch, Jar, LayoutError, SdkFile, SdkLayout, Tool};
pub use manifest::{Manifest, ManifestError};
pub use progress::{Progress, ProgressFactory, TerminalProgressFactory};
pub use prompt::{Prompt, TerminalPrompt};
pub use resolver::{download_manifest, select_version, ResolveError};

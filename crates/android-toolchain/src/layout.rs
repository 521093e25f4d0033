//! SDK Layout
//!
//! Fixed on-disk layout of an installed SDK and the host architecture
//! names used by the manifest.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Name of the SDK root directory inside the data directory
const ROOT_DIR_NAME: &str = "apm";
/// Fallback root directory inside the home directory
const HOME_ROOT_DIR_NAME: &str = ".apm";
/// Architecture-specific executables
const TOOLS_SUBDIR_NAME: &str = "bin";
/// JAR files
const JARS_SUBDIR_NAME: &str = "lib";

/// Layout errors
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Neither data nor home directory can be determined")]
    NoDataDir,
    #[error("Couldn't create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Architecture-specific executables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Compiles and packages APK resources
    Aapt2,
    /// Aligns an APK to reduce memory usage
    Zipalign,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Aapt2, Tool::Zipalign];

    pub fn file_name(self) -> &'static str {
        match self {
            Tool::Aapt2 => "aapt2",
            Tool::Zipalign => "zipalign",
        }
    }
}

/// JAR artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jar {
    Apksigner,
    /// Compiles Java bytecode to DEX bytecode
    D8,
    /// Bootstrap class path for the Java compiler
    Framework,
}

impl Jar {
    pub const ALL: [Jar; 3] = [Jar::Apksigner, Jar::D8, Jar::Framework];

    pub fn file_name(self) -> &'static str {
        match self {
            Jar::Apksigner => "apksigner.jar",
            Jar::D8 => "d8.jar",
            Jar::Framework => "android.jar",
        }
    }
}

/// Version independent files in the SDK root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkFile {
    /// Keystore used to sign debug APKs
    DebugKeystore,
    ProjectTemplate,
    /// Time zone database required by aapt2
    Tzdata,
}

impl SdkFile {
    pub const ALL: [SdkFile; 3] = [
        SdkFile::DebugKeystore,
        SdkFile::ProjectTemplate,
        SdkFile::Tzdata,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SdkFile::DebugKeystore => "debug.jks",
            SdkFile::ProjectTemplate => "project-template.zip",
            SdkFile::Tzdata => "tzdata",
        }
    }
}

/// Host architecture, named the way the manifest names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostArch {
    X86_64,
    I386,
    Aarch64,
    Arm,
    Mips64,
    Mips,
}

impl HostArch {
    /// Architecture this binary was built for, if the SDK supports it
    pub fn current() -> Option<Self> {
        if cfg!(target_arch = "x86_64") {
            Some(HostArch::X86_64)
        } else if cfg!(target_arch = "x86") {
            Some(HostArch::I386)
        } else if cfg!(target_arch = "aarch64") {
            Some(HostArch::Aarch64)
        } else if cfg!(target_arch = "arm") {
            Some(HostArch::Arm)
        } else if cfg!(target_arch = "mips64") {
            Some(HostArch::Mips64)
        } else if cfg!(target_arch = "mips") {
            Some(HostArch::Mips)
        } else {
            None
        }
    }

    /// Name used in the manifest and in download URLs
    pub fn name(self) -> &'static str {
        match self {
            HostArch::X86_64 => "x86_64",
            HostArch::I386 => "i386",
            HostArch::Aarch64 => "aarch64",
            HostArch::Arm => "armel",
            HostArch::Mips64 => "mips64el",
            HostArch::Mips => "mipsel",
        }
    }
}

impl std::fmt::Display for HostArch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Paths of an SDK installation. None of the getters guarantee that
/// the file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLayout {
    root: PathBuf,
}

impl SdkLayout {
    /// Layout rooted in the platform data directory, falling back to a
    /// dot-directory in the home directory
    pub fn from_env() -> Result<Self, LayoutError> {
        let root = dirs::data_dir()
            .map(|dir| dir.join(ROOT_DIR_NAME))
            .or_else(|| dirs::home_dir().map(|home| home.join(HOME_ROOT_DIR_NAME)))
            .ok_or(LayoutError::NoDataDir)?;
        Ok(Self::with_root(root))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.root.join(TOOLS_SUBDIR_NAME)
    }

    pub fn jars_dir(&self) -> PathBuf {
        self.root.join(JARS_SUBDIR_NAME)
    }

    pub fn tool_path(&self, tool: Tool) -> PathBuf {
        self.tools_dir().join(tool.file_name())
    }

    pub fn library_path(&self, jar: Jar) -> PathBuf {
        self.jars_dir().join(jar.file_name())
    }

    pub fn file_path(&self, file: SdkFile) -> PathBuf {
        self.root.join(file.file_name())
    }

    /// Every path an installation consists of
    pub fn all_paths(&self) -> Vec<PathBuf> {
        Tool::ALL
            .iter()
            .map(|t| self.tool_path(*t))
            .chain(Jar::ALL.iter().map(|j| self.library_path(*j)))
            .chain(SdkFile::ALL.iter().map(|f| self.file_path(*f)))
            .collect()
    }

    /// Whether every version independent file is present
    pub fn has_version_independent_files(&self) -> bool {
        SdkFile::ALL
            .iter()
            .all(|f| self.file_path(*f).try_exists().unwrap_or(false))
    }

    /// Creates the root, tools and JARs directories. Existing
    /// directories are left as they are.
    pub fn create_dirs(&self) -> Result<(), LayoutError> {
        for dir in [self.root.clone(), self.tools_dir(), self.jars_dir()] {
            std::fs::create_dir_all(&dir)
                .map_err(|source| LayoutError::CreateDir { path: dir.clone(), source })?;
        }
        debug!("SDK directories ready in {:?}", self.root);
        Ok(())
    }
}

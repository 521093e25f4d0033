//! CLI commands for APM
//!
//! Each command loads the configuration itself so it can be run from
//! scripts without any other setup.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use apm_android_toolchain::{
    InstallOptions, InstallOutcome, SdkInstaller, SdkLayout, TerminalProgressFactory,
    TerminalPrompt,
};
use apm_core::{AppConfig, InstalledVersionStore};
use tracing::info;

fn load_config() -> Result<AppConfig> {
    AppConfig::load().map_err(|e| anyhow!(e.user_message()))
}

fn sdk_layout(sdk_dir: Option<&PathBuf>) -> Result<SdkLayout> {
    match sdk_dir {
        Some(dir) => Ok(SdkLayout::with_root(dir)),
        None => Ok(SdkLayout::from_env()?),
    }
}

/// Download and install the Android SDK
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupCommand {
    /// Repository to download the manifest and artifacts from
    #[arg(long, value_name = "URL")]
    pub repository: Option<String>,

    /// Install into this directory instead of the default data directory
    #[arg(long, value_name = "DIR")]
    pub sdk_dir: Option<PathBuf>,
}

impl SetupCommand {
    /// Execute the setup command
    pub async fn execute(&self) -> Result<()> {
        let mut config = load_config()?;
        let layout = sdk_layout(self.sdk_dir.as_ref())?;

        let mut options = InstallOptions::for_host()?;
        if let Some(url) = &self.repository {
            options = InstallOptions::new(url, options.arch);
        }
        info!("Setting up SDK in {:?} from {}", layout.root(), options.base_url);

        let installer = SdkInstaller::new(layout, options);
        let progress = TerminalProgressFactory::new(config.ui.progress_width);
        let mut prompt = TerminalPrompt::stdio();
        let existing = config.installed_version();

        match installer.install(existing, &mut config, &progress, &mut prompt).await? {
            InstallOutcome::Installed(api) => info!("SDK with API {} installed", api),
            InstallOutcome::Kept => info!("Installed SDK left as is"),
        }
        Ok(())
    }
}

/// Show the installed SDK version and files
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusCommand {
    /// SDK directory to inspect instead of the default data directory
    #[arg(long, value_name = "DIR")]
    pub sdk_dir: Option<PathBuf>,
}

impl StatusCommand {
    /// Execute the status command
    pub fn execute(&self) -> Result<()> {
        let config = load_config()?;
        let layout = sdk_layout(self.sdk_dir.as_ref())?;
        for line in status_lines(&layout, config.installed_version()) {
            println!("{}", line);
        }
        Ok(())
    }
}

/// Report of an installation, one line per layout path
pub fn status_lines(layout: &SdkLayout, installed: Option<u32>) -> Vec<String> {
    let mut lines = vec![match installed {
        Some(api) => format!("SDK (API {}): {}", api, layout.root().display()),
        None => "SDK isn't installed. Run `apm setup` to install it".to_string(),
    }];

    for path in layout.all_paths() {
        let mark = if path.is_file() { '✓' } else { '✗' };
        lines.push(format!("  {} {}", mark, path.display()));
    }
    lines
}

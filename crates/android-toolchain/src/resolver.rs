//! Manifest resolution and API version selection.

use tracing::{debug, info};

use crate::fetch::{FetchError, Fetcher};
use crate::manifest::{Manifest, ManifestError};
use crate::progress::ProgressFactory;
use crate::prompt::Prompt;

/// Manifest file name relative to the repository URL
pub const MANIFEST_FILE_NAME: &str = "manifest.xml";

/// Resolution errors
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Couldn't download the manifest file ({0})")]
    Download(#[source] FetchError),
    #[error("Couldn't parse the manifest file. {0}")]
    Parse(#[source] ManifestError),
    #[error("No available API versions found")]
    NoVersions,
    #[error("No API version chosen")]
    Cancelled,
}

impl ResolveError {
    /// Whether the error was already shown by a progress indicator
    pub fn is_reported(&self) -> bool {
        matches!(self, ResolveError::Download(_) | ResolveError::Parse(_))
    }
}

/// Downloads and parses the manifest from `base_url`. Failures finish the
/// progress indicator with the failure message.
pub async fn download_manifest(
    fetcher: &Fetcher,
    base_url: &str,
    progress_factory: &dyn ProgressFactory,
) -> Result<Manifest, ResolveError> {
    let mut progress = progress_factory.create("Downloading manifest", false);
    let url = format!("{}{}", base_url, MANIFEST_FILE_NAME);

    let result = match fetcher.get_text(&url).await {
        Ok(body) => Manifest::parse(&body).map_err(ResolveError::Parse),
        Err(e) => Err(ResolveError::Download(e)),
    };

    match result {
        Ok(manifest) => {
            debug!(
                "Manifest lists {} tool sets, {} build tools, {} platforms",
                manifest.tool_sets.len(),
                manifest.build_tools.len(),
                manifest.platforms.len()
            );
            progress.finish(true, "Manifest downloaded");
            Ok(manifest)
        }
        Err(e) => {
            progress.finish(false, &e.to_string());
            Err(e)
        }
    }
}

/// Picks the API version to install.
///
/// A single available version is taken without asking. Otherwise the
/// versions are listed and the user is asked until a listed version is
/// entered.
pub fn select_version(manifest: &Manifest, prompt: &mut dyn Prompt) -> Result<u32, ResolveError> {
    let versions = manifest.available_versions();
    let mut iter = versions.iter();
    let (first, second) = (iter.next(), iter.next());

    match (first, second) {
        (None, _) => return Err(ResolveError::NoVersions),
        // TODO: ask for confirmation once the manifest offers a choice
        // for every architecture.
        (Some(only), None) => {
            info!("Only API {} is available", only);
            return Ok(*only);
        }
        _ => {}
    }

    prompt.say("Choose API version:");
    for (num, api) in versions.iter().enumerate() {
        prompt.say(&format!("  {}. API {}", num + 1, api));
    }

    loop {
        let answer = prompt.ask("version> ").ok_or(ResolveError::Cancelled)?;
        match answer.parse::<u32>() {
            Err(_) => prompt.warn("Invalid input! Try again"),
            Ok(api) if versions.contains(&api) => return Ok(api),
            Ok(_) => prompt.warn("Wrong version! Try again"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::TerminalPrompt;
    use std::io::Cursor;

    fn manifest_with(apis: &[&str]) -> Manifest {
        let sets: String = apis
            .iter()
            .map(|api| format!(r#"<set api="{}"><zip sha256="x">x86_64</zip></set>"#, api))
            .collect();
        Manifest::parse(&format!("<manifest><tools>{}</tools></manifest>", sets)).unwrap()
    }

    fn prompt(input: &str) -> TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>, Vec<u8>> {
        TerminalPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), Vec::new())
    }

    #[test]
    fn test_no_versions() {
        let mut p = prompt("28\n");
        let err = select_version(&manifest_with(&["0", "abc"]), &mut p).unwrap_err();

        assert!(matches!(err, ResolveError::NoVersions));
        assert!(p.output().is_empty());
    }

    #[test]
    fn test_single_version_is_selected_silently() {
        let mut p = prompt("");
        assert_eq!(select_version(&manifest_with(&["28", "28"]), &mut p).unwrap(), 28);
        assert!(p.output().is_empty());
    }

    #[test]
    fn test_invalid_choices_reprompt() {
        let mut p = prompt("abc\n0\n27\n-1\n26\n");
        let api = select_version(&manifest_with(&["28", "24", "26"]), &mut p).unwrap();
        assert_eq!(api, 26);

        let output = String::from_utf8(p.output().clone()).unwrap();
        assert!(output.starts_with("Choose API version:\n  1. API 24\n  2. API 26\n  3. API 28\n"));
        assert_eq!(output.matches("version> ").count(), 5);

        let errors = String::from_utf8(p.errors().clone()).unwrap();
        assert_eq!(errors.lines().count(), 4);
        assert_eq!(errors.matches("Wrong version!").count(), 2);
    }

    #[test]
    fn test_undecodable_choice_reprompts() {
        let input = b"\xff\xfe\n26\n".to_vec();
        let mut p = TerminalPrompt::new(Cursor::new(input), Vec::new(), Vec::new());
        let api = select_version(&manifest_with(&["26", "28"]), &mut p).unwrap();
        assert_eq!(api, 26);

        let errors = String::from_utf8(p.errors().clone()).unwrap();
        assert_eq!(errors, "error: Invalid input! Try again\n");
    }

    #[test]
    fn test_end_of_input_cancels() {
        let mut p = prompt("99\n");
        let err = select_version(&manifest_with(&["26", "28"]), &mut p).unwrap_err();
        assert!(matches!(err, ResolveError::Cancelled));
    }
}

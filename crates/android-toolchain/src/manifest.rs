//! SDK manifest
//!
//! The manifest is an XML document listing the available SDK versions.
//! Only the parts needed for installation are kept:
//!
//! ```xml
//! <manifest>
//!   <tools>
//!     <set api="28"><zip sha256="...">x86_64</zip></set>
//!   </tools>
//!   <build-tools>
//!     <zip api="28" url="..." sha256="..."><jar>lib/d8.jar</jar></zip>
//!   </build-tools>
//!   <platforms>
//!     <zip api="28" url="..." sha256="..."><framework>android.jar</framework></zip>
//!   </platforms>
//!   <tzdata><zip latest="true" sha256="...">2021a</zip></tzdata>
//!   <assets><file sha256="...">debug.jks</file></assets>
//! </manifest>
//! ```

use std::collections::BTreeSet;

use roxmltree::{Document, Node};

const ROOT_NODE_NAME: &str = "manifest";

/// Manifest parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("{0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Invalid manifest structure: {0}")]
    InvalidStructure(String),
}

/// Architecture-specific tools archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArchive {
    pub arch: String,
    pub sha256: Option<String>,
}

/// Tools for one API version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    pub api: Option<String>,
    pub archives: Vec<ToolArchive>,
}

/// Build tools archive and the entries to extract from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildToolsBundle {
    pub api: Option<String>,
    pub url: Option<String>,
    pub sha256: Option<String>,
    /// Entry paths in document order. Empty strings are kept so the
    /// installer can reject them.
    pub entries: Vec<String>,
}

/// Platform archive and the path of the framework JAR inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformBundle {
    pub api: Option<String>,
    pub url: Option<String>,
    pub sha256: Option<String>,
    pub framework: Option<String>,
}

/// Time zone database archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TzdataBundle {
    pub latest: bool,
    /// Free-form version label, e.g. `2021a`
    pub label: String,
    pub sha256: Option<String>,
}

/// Standalone asset file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    pub name: String,
    pub sha256: Option<String>,
}

/// Parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub tool_sets: Vec<ToolSet>,
    pub build_tools: Vec<BuildToolsBundle>,
    pub platforms: Vec<PlatformBundle>,
    pub tzdata: Vec<TzdataBundle>,
    pub assets: Vec<AssetFile>,
}

impl Manifest {
    pub fn parse(xml: &str) -> Result<Self, ManifestError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != ROOT_NODE_NAME {
            return Err(ManifestError::InvalidStructure(format!(
                "root element is <{}>, expected <{}>",
                root.tag_name().name(),
                ROOT_NODE_NAME
            )));
        }

        let mut manifest = Manifest::default();
        for section in elements(root) {
            match section.tag_name().name() {
                "tools" => manifest.tool_sets.extend(
                    elements_named(section, "set").map(|set| ToolSet {
                        api: attr(set, "api"),
                        archives: elements_named(set, "zip")
                            .map(|zip| ToolArchive {
                                arch: text(zip),
                                sha256: attr(zip, "sha256"),
                            })
                            .collect(),
                    }),
                ),
                "build-tools" => manifest.build_tools.extend(
                    elements_named(section, "zip").map(|zip| BuildToolsBundle {
                        api: attr(zip, "api"),
                        url: attr(zip, "url"),
                        sha256: attr(zip, "sha256"),
                        entries: elements(zip).map(text).collect(),
                    }),
                ),
                "platforms" => manifest.platforms.extend(
                    elements_named(section, "zip").map(|zip| PlatformBundle {
                        api: attr(zip, "api"),
                        url: attr(zip, "url"),
                        sha256: attr(zip, "sha256"),
                        framework: elements_named(zip, "framework").next().map(text),
                    }),
                ),
                "tzdata" => manifest.tzdata.extend(
                    elements_named(section, "zip").map(|zip| TzdataBundle {
                        latest: zip.attribute("latest") == Some("true"),
                        label: text(zip),
                        sha256: attr(zip, "sha256"),
                    }),
                ),
                "assets" => manifest.assets.extend(
                    elements_named(section, "file").map(|file| AssetFile {
                        name: text(file),
                        sha256: attr(file, "sha256"),
                    }),
                ),
                _ => {}
            }
        }
        Ok(manifest)
    }

    /// Distinct non-zero API versions that have tools, ascending
    pub fn available_versions(&self) -> BTreeSet<u32> {
        self.tool_sets
            .iter()
            .filter_map(|set| set.api.as_deref())
            .filter_map(|api| api.trim().parse::<u32>().ok())
            .filter(|api| *api != 0)
            .collect()
    }

    pub fn tool_archive(&self, api: &str, arch: &str) -> Option<&ToolArchive> {
        self.tool_sets
            .iter()
            .filter(|set| set.api.as_deref() == Some(api))
            .flat_map(|set| set.archives.iter())
            .find(|archive| archive.arch == arch)
    }

    pub fn build_tools(&self, api: &str) -> Option<&BuildToolsBundle> {
        self.build_tools
            .iter()
            .find(|bundle| bundle.api.as_deref() == Some(api))
    }

    pub fn platform(&self, api: &str) -> Option<&PlatformBundle> {
        self.platforms
            .iter()
            .find(|bundle| bundle.api.as_deref() == Some(api))
    }

    pub fn latest_tzdata(&self) -> Option<&TzdataBundle> {
        self.tzdata.iter().find(|bundle| bundle.latest)
    }

    pub fn assets(&self) -> &[AssetFile] {
        &self.assets
    }
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn elements_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    elements(node).filter(move |child| child.tag_name().name() == name)
}

/// Attribute value; empty values count as absent
fn attr(node: Node, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn text(node: Node) -> String {
    node.text().map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest>
  <tools>
    <set api="26">
      <zip sha256="aa">x86_64</zip>
      <zip sha256="">aarch64</zip>
    </set>
    <set api="28"><zip sha256="bb">x86_64</zip></set>
    <set api="0"><zip sha256="cc">x86_64</zip></set>
    <set api="next"><zip sha256="dd">x86_64</zip></set>
    <set api="26"><zip sha256="ee">armel</zip></set>
  </tools>
  <build-tools>
    <zip api="28" url="https://example.com/bt-28.zip" sha256="ff">
      <jar>lib/apksigner.jar</jar>
      <jar>lib/d8.jar</jar>
    </zip>
  </build-tools>
  <platforms>
    <zip api="28" url="https://example.com/p-28.zip" sha256="11">
      <framework>android-9/android.jar</framework>
    </zip>
  </platforms>
  <tzdata>
    <zip sha256="22">2020a</zip>
    <zip latest="true" sha256="33">2021a</zip>
  </tzdata>
  <assets>
    <file sha256="44">debug.jks</file>
    <file>project-template.zip</file>
  </assets>
</manifest>"#;

    #[test]
    fn test_available_versions() {
        let manifest = Manifest::parse(SAMPLE_MANIFEST).unwrap();
        let versions: Vec<u32> = manifest.available_versions().into_iter().collect();
        assert_eq!(versions, vec![26, 28]);
    }

    #[test]
    fn test_tool_lookup() {
        let manifest = Manifest::parse(SAMPLE_MANIFEST).unwrap();

        assert_eq!(
            manifest.tool_archive("26", "x86_64").and_then(|a| a.sha256.as_deref()),
            Some("aa")
        );
        // Second set with the same version is searched too.
        assert_eq!(
            manifest.tool_archive("26", "armel").and_then(|a| a.sha256.as_deref()),
            Some("ee")
        );
        // Empty checksum counts as missing.
        assert_eq!(manifest.tool_archive("26", "aarch64").unwrap().sha256, None);
        assert!(manifest.tool_archive("28", "aarch64").is_none());
        assert!(manifest.tool_archive("24", "x86_64").is_none());
    }

    #[test]
    fn test_bundles() {
        let manifest = Manifest::parse(SAMPLE_MANIFEST).unwrap();

        let build_tools = manifest.build_tools("28").unwrap();
        assert_eq!(build_tools.entries, vec!["lib/apksigner.jar", "lib/d8.jar"]);
        assert!(manifest.build_tools("26").is_none());

        let platform = manifest.platform("28").unwrap();
        assert_eq!(platform.framework.as_deref(), Some("android-9/android.jar"));
        assert_eq!(platform.url.as_deref(), Some("https://example.com/p-28.zip"));

        let tzdata = manifest.latest_tzdata().unwrap();
        assert_eq!(tzdata.label, "2021a");
        assert_eq!(tzdata.sha256.as_deref(), Some("33"));

        assert_eq!(manifest.assets().len(), 2);
        assert_eq!(manifest.assets()[1].sha256, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Manifest::parse("<manifest><tools></manifest>"),
            Err(ManifestError::Xml(_))
        ));
        assert!(matches!(
            Manifest::parse("<config/>"),
            Err(ManifestError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::parse("<manifest/>").unwrap();
        assert!(manifest.available_versions().is_empty());
        assert!(manifest.latest_tzdata().is_none());
    }
}

//! `.testgen.yml` 配置
//!
//! 所有字段可选：
//!
//! ```yaml
//! skip_dirs: [generated, third_party]
//! test_dirs: [spec, it]
//! languages:
//!   java:
//!     test_file_patterns: ['^.+Spec\.java$']
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra directory names skipped during a project scan.
    pub skip_dirs: Vec<String>,
    /// Extra directory segments marking test files, for every language.
    pub test_dirs: Vec<String>,
    /// Per editor language id.
    pub languages: BTreeMap<String, LanguageOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageOverrides {
    /// Regexes matched against the bare file name.
    pub test_file_patterns: Vec<String>,
}

impl Config {
    pub const FILE_NAME: &'static str = ".testgen.yml";

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).context("invalid testgen config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject `test_file_patterns` entries that are not valid regexes.
    pub fn validate(&self) -> Result<()> {
        for (id, overrides) in &self.languages {
            for source in &overrides.test_file_patterns {
                Regex::new(source)
                    .with_context(|| format!("invalid test_file_patterns entry for {id}: {source}"))?;
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load `<root>/.testgen.yml` when present, defaults otherwise.
    pub fn discover(root: &Path) -> Result<Self> {
        let candidate = root.join(Self::FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
skip_dirs: [generated]
test_dirs: [spec]
languages:
  java:
    test_file_patterns: ['^.+Spec\.java$']
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.skip_dirs, vec!["generated"]);
        assert_eq!(config.test_dirs, vec!["spec"]);
        assert_eq!(config.languages["java"].test_file_patterns, vec![r"^.+Spec\.java$"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let config = Config::from_yaml("test_dirs: [e2e]\n").unwrap();
        assert!(config.skip_dirs.is_empty());
        assert!(config.languages.is_empty());
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(Config::from_yaml("skip_dirs: {not: [a list").is_err());
    }

    #[test]
    fn test_invalid_pattern_rejected_at_load() {
        let yaml = "languages:\n  python:\n    test_file_patterns: ['(unclosed']\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("invalid test_file_patterns entry for python"));

        let dir = tempdir().unwrap();
        let path = dir.path().join(Config::FILE_NAME);
        fs::write(&path, yaml).unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("(unclosed"));
    }

    #[test]
    fn test_discover() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), Config::default());

        let mut file = File::create(dir.path().join(Config::FILE_NAME)).unwrap();
        writeln!(file, "skip_dirs: [vendor]").unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.skip_dirs, vec!["vendor"]);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}

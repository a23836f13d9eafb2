// ============================================================================
// 测试文件识别 - Test-File Classifier
// ============================================================================
//
// 纯路径/字符串计算，不访问文件系统：
// 1. 任一目录段为测试目录 (test / tests / tst ...) → 测试文件
// 2. 文件名符合该语言的测试命名规则 → 测试文件
// 3. 不支持的语言 → 永远 false，绝不报错
//
// ============================================================================

use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::Config;
use crate::document::SourceDocument;
use crate::language::Language;

/// Built-in convention check for a path under an editor language id.
pub fn is_test_file(path: &str, language_id: &str) -> bool {
    match Language::from_id(language_id) {
        Some(lang) => matches_builtin(path, lang),
        None => false,
    }
}

/// Document-handle form of [`is_test_file`].
pub fn is_test_document<D: SourceDocument + ?Sized>(doc: &D) -> bool {
    is_test_file(&doc.path().to_string_lossy(), doc.language_id())
}

fn matches_builtin(path: &str, lang: Language) -> bool {
    let profile = lang.profile();
    let (dirs, file_name) = split_path(path);
    dirs.iter().any(|seg| profile.is_test_dir(seg)) || profile.is_test_file_name(file_name)
}

/// Split on both `/` and `\`; the last non-empty segment is the file name.
fn split_path(path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let file_name = segments.pop().unwrap_or("");
    (segments, file_name)
}

/// Classifier with user-configured markers on top of the built-in conventions.
#[derive(Debug, Default)]
pub struct TestClassifier {
    extra_dirs: Vec<String>,
    extra_patterns: HashMap<Language, Vec<Regex>>,
}

impl TestClassifier {
    pub fn new(config: &Config) -> Result<Self> {
        let mut extra_patterns: HashMap<Language, Vec<Regex>> = HashMap::new();
        for (id, overrides) in &config.languages {
            let Some(lang) = Language::from_id(id) else {
                tracing::warn!("ignoring test patterns for unsupported language '{id}'");
                continue;
            };
            for source in &overrides.test_file_patterns {
                let re = Regex::new(source)
                    .with_context(|| format!("invalid test_file_patterns entry for {id}: {source}"))?;
                extra_patterns.entry(lang).or_default().push(re);
            }
        }
        Ok(Self {
            extra_dirs: config.test_dirs.clone(),
            extra_patterns,
        })
    }

    pub fn is_test(&self, path: &str, language_id: &str) -> bool {
        let Some(lang) = Language::from_id(language_id) else {
            return false;
        };
        if matches_builtin(path, lang) {
            return true;
        }
        let (dirs, file_name) = split_path(path);
        if dirs.iter().any(|seg| self.extra_dirs.iter().any(|d| d == seg)) {
            return true;
        }
        self.extra_patterns
            .get(&lang)
            .is_some_and(|patterns| patterns.iter().any(|re| re.is_match(file_name)))
    }

    pub fn is_test_document<D: SourceDocument + ?Sized>(&self, doc: &D) -> bool {
        self.is_test(&doc.path().to_string_lossy(), doc.language_id())
    }
}

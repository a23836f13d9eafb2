//! 项目扫描
//!
//! 遍历目录 → 并行读取/分类/提取 → 测试文件配对 focal file → 汇总报告。
//!
//! 与单文件 API 一样，单个文件失败不会中断扫描：读取失败的文件
//! 记录 warn 日志后跳过。

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::classify::TestClassifier;
use crate::config::Config;
use crate::document::{Document, SourceDocument};
use crate::extract::{extract_classes, extract_functions};
use crate::focal::FocalIndex;
use crate::language::Language;

/// Directories never worth descending into.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git", "node_modules", "target", "build", "dist", "__pycache__", ".venv", "venv",
];

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: String,
    pub scanned_at: String,
    pub files: Vec<FileEntry>,
    pub summary: BTreeMap<Language, LanguageSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub path: String,
    pub language: Language,
    pub is_test: bool,
    pub functions: usize,
    pub classes: usize,
    /// For test files: the source file it most likely exercises.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageSummary {
    pub files: usize,
    pub test_files: usize,
    pub functions: usize,
    pub classes: usize,
}

impl ScanReport {
    pub fn test_files(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().filter(|f| f.is_test)
    }

    /// Human readable summary.
    pub fn render(&self) -> String {
        let mut out = format!(
            "📋 Scan: {}\n----------------------------------------\n",
            self.root
        );
        for (lang, s) in &self.summary {
            out.push_str(&format!(
                "{:<16} {:>4} files ({} tests), {} functions, {} classes\n",
                lang.id(),
                s.files,
                s.test_files,
                s.functions,
                s.classes
            ));
        }
        let tests: Vec<_> = self.test_files().collect();
        if !tests.is_empty() {
            out.push_str("----------------------------------------\nTest files:\n");
            for t in tests {
                match &t.focal {
                    Some(focal) => out.push_str(&format!("- {} → {}\n", t.path, focal)),
                    None => out.push_str(&format!("- {} (no focal file)\n", t.path)),
                }
            }
        }
        out
    }
}

fn is_skipped(entry: &DirEntry, skip: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    DEFAULT_SKIP_DIRS.contains(&name.as_ref()) || skip.iter().any(|s| s == name.as_ref())
}

/// Scan a directory (or a single file) and classify every supported source file.
///
/// Report paths are relative to `root`, so conventions are judged on the
/// project layout only.
pub fn scan_project(root: &Path, config: &Config) -> Result<ScanReport> {
    if !root.exists() {
        bail!("path not found: {}", root.display());
    }
    let classifier = TestClassifier::new(config)?;

    let paths: Vec<_> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_skipped(e, &config.skip_dirs))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| Language::from_path(e.path()).is_some())
        .map(|e| e.into_path())
        .collect();

    tracing::info!("scanning {} source files under {}", paths.len(), root.display());

    let mut documents: Vec<Document> = paths
        .par_iter()
        .filter_map(|path| match Document::open(path) {
            Ok(doc) => Some(doc.relative_to(root)),
            Err(e) => {
                tracing::warn!("skipping {}: {e:#}", path.display());
                None
            }
        })
        .collect();
    documents.sort_by(|a, b| a.path().cmp(b.path()));

    let index = FocalIndex::new(&documents, &classifier);

    let files: Vec<FileEntry> = documents
        .par_iter()
        .filter_map(|doc| {
            let language = doc.language()?;
            let profile = language.profile();
            let is_test = classifier.is_test_document(doc);
            let focal = if is_test {
                index.resolve(doc).map(|p| p.display().to_string())
            } else {
                None
            };
            tracing::debug!("{} test={is_test}", doc.path().display());
            Some(FileEntry {
                path: doc.path().display().to_string(),
                language,
                is_test,
                functions: extract_functions(doc.text(), Some(&profile.functions)).len(),
                classes: extract_classes(doc.text(), Some(&profile.classes)).len(),
                focal,
            })
        })
        .collect();

    let mut summary: BTreeMap<Language, LanguageSummary> = BTreeMap::new();
    for f in &files {
        let s = summary.entry(f.language).or_default();
        s.files += 1;
        s.test_files += usize::from(f.is_test);
        s.functions += f.functions;
        s.classes += f.classes;
    }

    Ok(ScanReport {
        root: root.display().to_string(),
        scanned_at: chrono::Local::now().to_rfc3339(),
        files,
        summary,
    })
}

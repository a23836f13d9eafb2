// ============================================================================
// Test Generation Source Utilities - Library Interface
// ============================================================================
//
// 启发式源码工具：声明提取 (函数/类/import) 与测试文件识别，
// 以及基于二者的 focal file 配对和项目扫描。
// The main binary (main.rs) uses these modules directly.

pub mod classify;
pub mod cli;
pub mod config;
pub mod document;
pub mod extract;
pub mod focal;
pub mod language;
pub mod scan;

pub use classify::{is_test_document, is_test_file, TestClassifier};
pub use document::{Document, SourceDocument};
pub use extract::{
    classes_for, count_substring_matches, extract_classes, extract_declarations, extract_functions,
    extract_imports, functions_for, Declaration, DeclarationKind, DeclarationPattern,
};
pub use language::{profile_for, Language, LanguageProfile};

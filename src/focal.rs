// ============================================================================
// Focal File 解析 - 测试文件 ↔ 被测源文件
// ============================================================================
//
// 两阶段匹配:
// 1. 文件名推断: FooTest.java → Foo.java, test_foo.py → foo.py ...
//    多个同名候选时，取与测试文件共享路径前缀最长的那个
// 2. 内容匹配: 测试文件的 import/函数/类名 与候选源文件的函数/类名
//    做子串计数 (count_substring_matches)，取得分最高者
//
// ============================================================================

use std::path::{Component, Path, PathBuf};

use crate::classify::TestClassifier;
use crate::document::SourceDocument;
use crate::extract::{count_substring_matches, extract_classes, extract_functions, extract_imports};
use crate::language::Language;

fn file_name(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()
}

/// Candidate source file names for a test file. Non-test names yield nothing.
pub fn guess_source_file_names(test_path: &Path, language: Language) -> Vec<String> {
    let Some(name) = file_name(test_path) else {
        return Vec::new();
    };

    let mut guesses = Vec::new();
    match language.family() {
        Language::Java => {
            if let Some(stem) = name.strip_suffix(".java") {
                for suffix in ["Tests", "Test", "IT"] {
                    if let Some(base) = stem.strip_suffix(suffix) {
                        guesses.push(base.to_string());
                    }
                }
                if let Some(base) = stem.strip_prefix("Test") {
                    if base.starts_with(|c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_') {
                        guesses.push(base.to_string());
                    }
                }
            }
            finish(guesses, ".java")
        }
        Language::Python => {
            let (stem, ext) = match name.strip_suffix(".pyi") {
                Some(stem) => (stem, ".pyi"),
                None => (name.strip_suffix(".py").unwrap_or(""), ".py"),
            };
            if let Some(base) = stem.strip_prefix("test_") {
                guesses.push(base.to_string());
            }
            if let Some(base) = stem.strip_suffix("_test") {
                guesses.push(base.to_string());
            }
            finish(guesses, ext)
        }
        Language::TypeScript | Language::JavaScript => {
            for marker in [".test.", ".spec."] {
                if let Some((base, ext)) = name.rsplit_once(marker) {
                    if !base.is_empty() && !ext.is_empty() && !ext.contains('.') {
                        guesses.push(format!("{base}.{ext}"));
                    }
                }
            }
            finish(guesses, "")
        }
        _ => {
            if let Some(base) = name.strip_suffix("_test.go") {
                guesses.push(base.to_string());
            }
            finish(guesses, ".go")
        }
    }
}

fn finish(bases: Vec<String>, ext: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for base in bases {
        let candidate = format!("{base}{ext}");
        if !base.is_empty() && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Conventional test file names for a source file; empty when it already is a test.
pub fn guess_test_file_names(source_path: &Path, language: Language) -> Vec<String> {
    let Some(name) = file_name(source_path) else {
        return Vec::new();
    };
    if language.profile().is_test_file_name(name) {
        return Vec::new();
    }
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return Vec::new();
    };
    if stem.is_empty() {
        return Vec::new();
    }

    match language.family() {
        Language::Java => vec![format!("{stem}Test.{ext}"), format!("{stem}Tests.{ext}"), format!("Test{stem}.{ext}")],
        Language::Python => vec![format!("test_{stem}.{ext}"), format!("{stem}_test.{ext}")],
        Language::TypeScript | Language::JavaScript => {
            vec![format!("{stem}.test.{ext}"), format!("{stem}.spec.{ext}")]
        }
        _ => vec![format!("{stem}_test.{ext}")],
    }
}

/// Find the source file a test exercises among `candidates`.
pub fn find_focal_file<T, C>(test: &T, candidates: &[C]) -> Option<PathBuf>
where
    T: SourceDocument + ?Sized,
    C: SourceDocument,
{
    FocalIndex::new(candidates, &TestClassifier::default()).resolve(test)
}

/// Pre-extracted declaration names of every non-test source candidate.
#[derive(Debug, Default)]
pub struct FocalIndex {
    entries: Vec<FocalEntry>,
}

#[derive(Debug)]
struct FocalEntry {
    path: PathBuf,
    family: Language,
    names: Vec<String>,
}

impl FocalIndex {
    pub fn new<C: SourceDocument>(candidates: &[C], classifier: &TestClassifier) -> Self {
        let entries = candidates
            .iter()
            .filter(|doc| !classifier.is_test_document(*doc))
            .filter_map(|doc| {
                let lang = doc.language()?;
                let profile = lang.profile();
                let mut names = extract_classes(doc.text(), Some(&profile.classes));
                names.extend(extract_functions(doc.text(), Some(&profile.functions)));
                Some(FocalEntry {
                    path: doc.path().to_path_buf(),
                    family: lang.family(),
                    names,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn same_family<'a>(&'a self, family: Language, exclude: &'a Path) -> impl Iterator<Item = &'a FocalEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.family == family && e.path.as_path() != exclude)
    }

    pub fn resolve<T: SourceDocument + ?Sized>(&self, test: &T) -> Option<PathBuf> {
        let lang = test.language()?;
        let family = lang.family();

        // 阶段 1: 文件名
        let guesses = guess_source_file_names(test.path(), lang);
        let mut best: Option<(&FocalEntry, usize)> = None;
        for entry in self.same_family(family, test.path()) {
            let Some(name) = file_name(&entry.path) else { continue };
            if !guesses.iter().any(|g| g == name) {
                continue;
            }
            let shared = shared_prefix(&entry.path, test.path());
            if best.map_or(true, |(_, s)| shared > s) {
                best = Some((entry, shared));
            }
        }
        if let Some((entry, _)) = best {
            tracing::debug!("focal by name: {} -> {}", test.path().display(), entry.path.display());
            return Some(entry.path.clone());
        }

        // 阶段 2: 内容
        let profile = lang.profile();
        let mut test_names = extract_imports(test.text(), &profile.imports);
        test_names.extend(extract_classes(test.text(), Some(&profile.classes)));
        test_names.extend(extract_functions(test.text(), Some(&profile.functions)));
        if test_names.is_empty() {
            return None;
        }

        let mut best: Option<(&FocalEntry, usize)> = None;
        for entry in self.same_family(family, test.path()) {
            let score = count_substring_matches(&entry.names, &test_names);
            if score > 0 && best.map_or(true, |(_, s)| score > s) {
                best = Some((entry, score));
            }
        }
        best.map(|(entry, score)| {
            tracing::debug!(
                "focal by content: {} -> {} (score {score})",
                test.path().display(),
                entry.path.display()
            );
            entry.path.clone()
        })
    }
}

/// Number of leading directory components two paths share.
fn shared_prefix(a: &Path, b: &Path) -> usize {
    fn dirs(p: &Path) -> Vec<Component<'_>> {
        p.parent().map(|d| d.components().collect()).unwrap_or_default()
    }
    dirs(a)
        .iter()
        .zip(dirs(b).iter())
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn guesses(path: &str, lang: Language) -> Vec<String> {
        guess_source_file_names(Path::new(path), lang)
    }

    #[test]
    fn test_guess_java() {
        assert_eq!(guesses("src/test/FooTest.java", Language::Java), vec!["Foo.java"]);
        assert_eq!(guesses("FooTests.java", Language::Java), vec!["Foo.java"]);
        assert_eq!(guesses("FooIT.java", Language::Java), vec!["Foo.java"]);
        assert_eq!(guesses("TestFoo.java", Language::Java), vec!["Foo.java"]);
        assert_eq!(guesses("TestFooTest.java", Language::Java), vec!["TestFoo.java", "FooTest.java"]);
        assert!(guesses("Foo.java", Language::Java).is_empty());
        assert!(guesses("Test.java", Language::Java).is_empty());
    }

    #[test]
    fn test_guess_python() {
        assert_eq!(guesses("tests/test_util.py", Language::Python), vec!["util.py"]);
        assert_eq!(guesses("util_test.py", Language::Python), vec!["util.py"]);
        assert!(guesses("util.py", Language::Python).is_empty());
    }

    #[test]
    fn test_guess_typescript() {
        assert_eq!(guesses("src/cart.test.ts", Language::TypeScript), vec!["cart.ts"]);
        assert_eq!(guesses("src/App.spec.tsx", Language::TypeScriptReact), vec!["App.tsx"]);
        assert_eq!(guesses("lib/a.b.test.js", Language::JavaScript), vec!["a.b.js"]);
        assert!(guesses("src/cart.ts", Language::TypeScript).is_empty());
    }

    #[test]
    fn test_guess_go() {
        assert_eq!(guesses("pkg/cart_test.go", Language::Go), vec!["cart.go"]);
        assert!(guesses("pkg/cart.go", Language::Go).is_empty());
    }

    #[test]
    fn test_guess_test_names_inverts_conventions() {
        let names = guess_test_file_names(Path::new("src/Foo.java"), Language::Java);
        assert_eq!(names, vec!["FooTest.java", "FooTests.java", "TestFoo.java"]);
        for name in &names {
            assert!(guesses(name, Language::Java).contains(&"Foo.java".to_string()));
        }

        let names = guess_test_file_names(Path::new("util.py"), Language::Python);
        assert_eq!(names, vec!["test_util.py", "util_test.py"]);
        assert_eq!(guess_test_file_names(Path::new("cart.ts"), Language::TypeScript), vec!["cart.test.ts", "cart.spec.ts"]);
        assert_eq!(guess_test_file_names(Path::new("cart.go"), Language::Go), vec!["cart_test.go"]);
        assert!(guess_test_file_names(Path::new("FooTest.java"), Language::Java).is_empty());
    }

    #[test]
    fn test_focal_by_name_prefers_closest_path() {
        let test = Document::new("svc/orders/src/test/java/OrderServiceTest.java", "java", "class OrderServiceTest {}");
        let candidates = vec![
            Document::new("svc/billing/src/main/java/OrderService.java", "java", "class OrderService {}"),
            Document::new("svc/orders/src/main/java/OrderService.java", "java", "class OrderService {}"),
            Document::new("svc/orders/src/main/java/Other.java", "java", "class Other {}"),
        ];
        assert_eq!(
            find_focal_file(&test, &candidates),
            Some(PathBuf::from("svc/orders/src/main/java/OrderService.java"))
        );
    }

    #[test]
    fn test_focal_ignores_other_languages_and_tests() {
        let test = Document::new("tests/test_cart.py", "python", "");
        let candidates = vec![
            Document::new("web/cart.py.ts", "typescript", ""),
            Document::new("tests/test_cart.py", "python", ""),
        ];
        assert_eq!(find_focal_file(&test, &candidates), None);
    }

    #[test]
    fn test_focal_by_content() {
        let test = Document::new(
            "tests/test_checkout_flow.py",
            "python",
            "from shop.pricing import compute_total\n\ndef test_compute_total_applies_discount():\n    assert compute_total([]) == 0\n",
        );
        let candidates = vec![
            Document::new("shop/inventory.py", "python", "def restock(item):\n    pass\n"),
            Document::new("shop/pricing.py", "python", "def compute_total(items):\n    return 0\n\ndef apply_discount(total):\n    return total\n"),
        ];
        assert_eq!(find_focal_file(&test, &candidates), Some(PathBuf::from("shop/pricing.py")));
    }

    #[test]
    fn test_focal_none_without_overlap() {
        let test = Document::new("tests/test_misc.py", "python", "def test_nothing():\n    pass\n");
        let candidates = vec![Document::new("shop/inventory.py", "python", "def restock(item):\n    pass\n")];
        assert_eq!(find_focal_file(&test, &candidates), None);
    }

    #[test]
    fn test_focal_unsupported_language() {
        let test = Document::new("test/thing.cbl", "cobol", "");
        let candidates: Vec<Document> = vec![Document::new("thing.cbl", "cobol", "")];
        assert_eq!(find_focal_file(&test, &candidates), None);
    }

    #[test]
    fn test_index_skips_tests() {
        let docs = vec![
            Document::new("src/cart.ts", "typescript", "export function add() {}"),
            Document::new("src/cart.test.ts", "typescript", "it('adds', () => {});"),
            Document::new("README", "plaintext", ""),
        ];
        let index = FocalIndex::new(&docs, &TestClassifier::default());
        assert_eq!(index.len(), 1);
        assert!(!index.is_empty());
    }
}

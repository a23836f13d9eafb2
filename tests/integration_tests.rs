// ============================================================================
// Integration Tests - Fixture Project Scan and Focal Pairing
// ============================================================================
//
// These tests run the public library API against `fixtures/sample-project`:
// 1. Declaration extraction on realistic files (comments, strings, nesting)
// 2. Test-file classification with directory markers and naming conventions
// 3. Project scan honouring `.testgen.yml` and pairing tests with focal files

use std::fs;
use std::path::{Path, PathBuf};

use testgen_scan::config::Config;
use testgen_scan::focal::find_focal_file;
use testgen_scan::scan::{scan_project, LanguageSummary};
use testgen_scan::{
    classes_for, functions_for, is_test_document, is_test_file, Document, Language, SourceDocument,
};

mod common {
    use std::path::PathBuf;

    /// Helper to get the fixtures directory path
    pub fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    pub fn sample_project() -> PathBuf {
        fixtures_dir().join("sample-project")
    }
}

fn read(rel: &str) -> String {
    fs::read_to_string(common::sample_project().join(rel)).expect("fixture should exist")
}

// ============================================================================
// Declaration extraction on fixtures
// ============================================================================

#[test]
fn test_java_fixture_declarations() {
    let code = read("orders/src/main/java/com/example/orders/OrderService.java");
    assert_eq!(functions_for(&code, "java"), vec!["totalFor", "recent", "sum"]);
    assert_eq!(classes_for(&code, "java"), vec!["OrderService", "Totals"]);
}

#[test]
fn test_python_fixture_declarations() {
    let code = read("shop/shop/pricing.py");
    assert_eq!(
        functions_for(&code, "python"),
        vec!["__init__", "parse", "compute_total", "line_total", "refresh_prices"]
    );
    assert_eq!(classes_for(&code, "python"), vec!["PriceList"]);
}

#[test]
fn test_typescript_fixture_declarations() {
    let code = read("web/src/cart.ts");
    assert_eq!(functions_for(&code, "typescript"), vec!["add", "total", "emptyCart"]);
    assert_eq!(classes_for(&code, "typescript"), vec!["CartLine", "Cart"]);

    let test_code = read("web/src/cart.test.ts");
    assert!(functions_for(&test_code, "typescript").is_empty());
}

#[test]
fn test_go_fixture_declarations() {
    let code = read("tools/cart.go");
    assert_eq!(functions_for(&code, "go"), vec!["Summary"]);
    assert_eq!(classes_for(&code, "go"), vec!["Cart"]);
}

fn read_snippet(name: &str) -> String {
    fs::read_to_string(common::fixtures_dir().join("extraction").join(name)).expect("fixture should exist")
}

#[test]
fn test_mocha_callbacks_are_not_functions() {
    let code = read_snippet("cart.spec.js");
    assert_eq!(functions_for(&code, "javascript"), vec!["makeItem"]);
    assert!(classes_for(&code, "javascript").is_empty());
    assert!(is_test_file("test/cart.spec.js", "javascript"));
}

#[test]
fn test_regex_literals_keep_following_declarations() {
    let code = read_snippet("slug.ts");
    assert_eq!(functions_for(&code, "typescript"), vec!["slugify", "next"]);
    assert_eq!(classes_for(&code, "typescript"), vec!["Slugger"]);
}

#[test]
fn test_go_grouped_types() {
    let code = read_snippet("store.go");
    assert_eq!(classes_for(&code, "go"), vec!["Item", "Repository"]);
    assert_eq!(functions_for(&code, "go"), vec!["NewItem"]);
}

#[test]
fn test_empty_and_unsupported_inputs() {
    for lang in Language::ALL {
        assert!(functions_for("", lang.id()).is_empty());
        assert!(classes_for("", lang.id()).is_empty());
    }
    let code = read("shop/shop/pricing.py");
    assert!(functions_for(&code, "ruby").is_empty());
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_canonical_names_per_language() {
    let cases = [
        ("java", "MyClass.java", "FooTest.java"),
        ("python", "util.py", "test_foo.py"),
        ("typescript", "Foo.ts", "Foo.test.ts"),
        ("typescriptreact", "Foo.tsx", "Foo.spec.tsx"),
        ("javascript", "foo.js", "foo.test.js"),
        ("javascriptreact", "Foo.jsx", "Foo.test.jsx"),
        ("go", "cart.go", "cart_test.go"),
    ];
    for (lang, source, test) in cases {
        assert!(!is_test_file(&format!("src/{source}"), lang), "{source} is not a {lang} test");
        assert!(is_test_file(&format!("src/{test}"), lang), "{test} is a {lang} test");
        for marker in ["test", "tests", "tst"] {
            assert!(is_test_file(&format!("pkg/{marker}/{source}"), lang));
        }
    }
}

#[test]
fn test_classification_of_fixture_documents() {
    let root = common::sample_project();
    let test = Document::open(root.join("shop/tests/test_checkout.py"))
        .unwrap()
        .relative_to(&root);
    assert!(is_test_document(&test));

    let source = Document::open(root.join("shop/shop/pricing.py"))
        .unwrap()
        .relative_to(&root);
    assert!(!is_test_document(&source));

    // The file need not exist.
    assert!(is_test_file("does/not/exist/WidgetTest.java", "java"));
}

// ============================================================================
// Focal file pairing
// ============================================================================

fn open_relative(root: &Path, rel: &str) -> Document {
    Document::open(root.join(rel)).unwrap().relative_to(root)
}

#[test]
fn test_find_focal_file_by_content() {
    let root = common::sample_project();
    let test = open_relative(&root, "shop/tests/test_checkout.py");
    let candidates = vec![
        open_relative(&root, "shop/shop/pricing.py"),
        open_relative(&root, "web/src/cart.ts"),
    ];
    assert_eq!(
        find_focal_file(&test, &candidates),
        Some(PathBuf::from("shop/shop/pricing.py"))
    );
}

#[test]
fn test_find_focal_file_by_name() {
    let root = common::sample_project();
    let test = open_relative(&root, "orders/src/test/java/com/example/orders/OrderServiceTest.java");
    let candidates = vec![open_relative(&root, "orders/src/main/java/com/example/orders/OrderService.java")];
    let focal = find_focal_file(&test, &candidates).unwrap();
    assert!(focal.ends_with("OrderService.java"));
    assert_eq!(test.language(), Some(Language::Java));
}

// ============================================================================
// Full project scan
// ============================================================================

#[test]
fn test_scan_sample_project() {
    let root = common::sample_project();
    let config = Config::discover(&root).unwrap();
    assert_eq!(config.skip_dirs, vec!["generated"]);

    let report = scan_project(&root, &config).unwrap();

    assert!(report.files.iter().all(|f| !f.path.contains("generated")));
    assert_eq!(report.files.len(), 9);

    insta::assert_json_snapshot!(report.summary, @r###"
    {
      "java": {
        "files": 2,
        "test_files": 1,
        "functions": 5,
        "classes": 3
      },
      "python": {
        "files": 2,
        "test_files": 1,
        "functions": 6,
        "classes": 1
      },
      "typescript": {
        "files": 2,
        "test_files": 1,
        "functions": 3,
        "classes": 2
      },
      "typescriptreact": {
        "files": 1,
        "test_files": 1,
        "functions": 0,
        "classes": 0
      },
      "go": {
        "files": 2,
        "test_files": 1,
        "functions": 2,
        "classes": 1
      }
    }
    "###);

    let focal_of = |suffix: &str| {
        report
            .files
            .iter()
            .find(|f| f.path.ends_with(suffix))
            .and_then(|f| f.focal.clone())
    };
    assert!(focal_of("OrderServiceTest.java").unwrap().ends_with("OrderService.java"));
    assert!(focal_of("test_checkout.py").unwrap().ends_with("pricing.py"));
    assert!(focal_of("cart.test.ts").unwrap().ends_with("cart.ts"));
    assert!(focal_of("cart_test.go").unwrap().ends_with("cart.go"));
    assert_eq!(focal_of("render.tsx"), None);

    let typescript = &report.summary[&Language::TypeScript];
    assert_eq!(typescript, &LanguageSummary { files: 2, test_files: 1, functions: 3, classes: 2 });
}

#[test]
fn test_scan_report_serializes() {
    let root = common::sample_project();
    let report = scan_project(&root, &Config::discover(&root).unwrap()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert!(json["scanned_at"].as_str().is_some());
    assert_eq!(json["files"].as_array().unwrap().len(), report.files.len());
    assert!(json["summary"]["go"]["files"].as_u64() == Some(2));
}

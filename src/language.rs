// ============================================================================
// 语言配置 - Language Profiles
// ============================================================================
//
// 每种语言一个静态 profile：函数/类声明规则、import 规则、
// 测试文件命名规则、测试目录标记、注释/字符串词法。
// 所有正则在首次访问时编译一次 (once_cell::sync::Lazy)。
//
// ============================================================================

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::{DeclarationKind, DeclarationPattern, Syntax};

/// Editor language identifiers understood by the extractor and classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Python,
    TypeScript,
    TypeScriptReact,
    JavaScript,
    JavaScriptReact,
    Go,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::Java,
        Language::Python,
        Language::TypeScript,
        Language::TypeScriptReact,
        Language::JavaScript,
        Language::JavaScriptReact,
        Language::Go,
    ];

    /// Resolve an editor language id. Unsupported ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "java" => Some(Language::Java),
            "python" => Some(Language::Python),
            "typescript" => Some(Language::TypeScript),
            "typescriptreact" => Some(Language::TypeScriptReact),
            "javascript" => Some(Language::JavaScript),
            "javascriptreact" => Some(Language::JavaScriptReact),
            "go" => Some(Language::Go),
            _ => None,
        }
    }

    /// Infer the language from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "java" => Some(Language::Java),
            "py" | "pyi" => Some(Language::Python),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::TypeScriptReact),
            "js" | "mjs" | "cjs" => Some(Language::JavaScript),
            "jsx" => Some(Language::JavaScriptReact),
            "go" => Some(Language::Go),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::TypeScriptReact => "typescriptreact",
            Language::JavaScript => "javascript",
            Language::JavaScriptReact => "javascriptreact",
            Language::Go => "go",
        }
    }

    /// The language whose profile this one shares (TSX → TypeScript, JSX → JavaScript).
    pub fn family(&self) -> Language {
        match self {
            Language::TypeScriptReact => Language::TypeScript,
            Language::JavaScriptReact => Language::JavaScript,
            other => *other,
        }
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        match self.family() {
            Language::Java => &JAVA,
            Language::Python => &PYTHON,
            Language::TypeScript => &TYPESCRIPT,
            Language::JavaScript => &JAVASCRIPT,
            _ => &GO,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Profile lookup by editor language id.
pub fn profile_for(language_id: &str) -> Option<&'static LanguageProfile> {
    Language::from_id(language_id).map(|lang| lang.profile())
}

/// Compiled rules for one language family.
pub struct LanguageProfile {
    pub key: &'static str,
    pub extensions: &'static [&'static str],
    pub functions: DeclarationPattern,
    pub classes: DeclarationPattern,
    pub imports: DeclarationPattern,
    /// Matched against the bare file name.
    pub test_file_patterns: Vec<Regex>,
    /// Directory segments that mark everything beneath them as tests.
    pub test_dirs: &'static [&'static str],
    pub syntax: Syntax,
}

impl LanguageProfile {
    pub fn is_test_file_name(&self, file_name: &str) -> bool {
        self.test_file_patterns.iter().any(|re| re.is_match(file_name))
    }

    pub fn is_test_dir(&self, segment: &str) -> bool {
        self.test_dirs.contains(&segment)
    }
}

impl fmt::Debug for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageProfile")
            .field("key", &self.key)
            .field("extensions", &self.extensions)
            .field("test_dirs", &self.test_dirs)
            .finish_non_exhaustive()
    }
}

const TEST_DIRS: &[&str] = &["test", "tests", "tst"];
const JS_TEST_DIRS: &[&str] = &["test", "tests", "tst", "__tests__"];

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources.iter().map(|s| Regex::new(s).unwrap()).collect()
}

// ============================================================================
// Java
// ============================================================================

const JAVA_SYNTAX: Syntax = Syntax {
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    triple_quotes: true,
    regex_literals: false,
};

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "try", "void", "volatile", "while",
];

// 返回类型位置上出现这些词说明是语句或构造器，而不是方法声明
const JAVA_NON_TYPES: &[&str] = &[
    "return", "new", "throw", "else", "case", "yield", "assert", "package", "import",
    "public", "protected", "private", "static", "final", "abstract", "synchronized",
    "native", "default", "strictfp", "transient", "volatile", "record",
];

static JAVA: Lazy<LanguageProfile> = Lazy::new(|| LanguageProfile {
    key: "java",
    extensions: &["java"],
    functions: DeclarationPattern::new(
        DeclarationKind::Function,
        &[concat!(
            r"(?m)^[ \t]*(?:@[\w.]+(?:\([^)]*\))?\s+)*",
            r"(?:(?:public|protected|private|static|final|abstract|synchronized|native|default|strictfp)\s+)*",
            r"(?:<[^{};()]*>\s+)?",
            r"(?P<ret>[A-Za-z_$][\w$.]*(?:<[^{};()]*>)?(?:\s*\[\s*\])*)",
            r"\s+(?P<name>[A-Za-z_$][\w$]*)\s*\(",
        )],
        JAVA_SYNTAX,
    )
    .reserved(JAVA_KEYWORDS)
    .reserved_prefixes(JAVA_NON_TYPES),
    classes: DeclarationPattern::new(
        DeclarationKind::Class,
        &[concat!(
            r"(?m)^[ \t]*(?:@[\w.]+(?:\([^)]*\))?\s+)*",
            r"(?:(?:public|protected|private|static|final|abstract|sealed|non-sealed|strictfp)\s+)*",
            r"(?:class|interface|enum|record|@interface)\s+(?P<name>[A-Za-z_$][\w$]*)",
        )],
        JAVA_SYNTAX,
    )
    .reserved(JAVA_KEYWORDS),
    imports: DeclarationPattern::new(
        DeclarationKind::Import,
        &[r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?(?P<name>[\w.]+(?:\.\*)?)[ \t]*;"],
        JAVA_SYNTAX,
    ),
    test_file_patterns: patterns(&[
        r"^.+Tests?\.java$",
        r"^.+IT\.java$",
        r"^Test[A-Z0-9_].*\.java$",
    ]),
    test_dirs: TEST_DIRS,
    syntax: JAVA_SYNTAX,
});

// ============================================================================
// Python
// ============================================================================

const PYTHON_SYNTAX: Syntax = Syntax {
    line_comments: &["#"],
    block_comment: None,
    quotes: &['"', '\''],
    triple_quotes: true,
    regex_literals: false,
};

static PYTHON: Lazy<LanguageProfile> = Lazy::new(|| LanguageProfile {
    key: "python",
    extensions: &["py", "pyi"],
    functions: DeclarationPattern::new(
        DeclarationKind::Function,
        &[r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+(?P<name>[A-Za-z_]\w*)[ \t]*(?:\[[^\]]*\])?[ \t]*\("],
        PYTHON_SYNTAX,
    ),
    classes: DeclarationPattern::new(
        DeclarationKind::Class,
        &[r"(?m)^[ \t]*class[ \t]+(?P<name>[A-Za-z_]\w*)"],
        PYTHON_SYNTAX,
    ),
    imports: DeclarationPattern::new(
        DeclarationKind::Import,
        &[
            r"(?m)^[ \t]*from[ \t]+(?P<name>\.*[\w.]*)[ \t]+import\b",
            r"(?m)^[ \t]*import[ \t]+(?P<name>[\w.]+)",
        ],
        PYTHON_SYNTAX,
    ),
    test_file_patterns: patterns(&[r"^test_.+\.pyi?$", r"^.+_test\.pyi?$"]),
    test_dirs: TEST_DIRS,
    syntax: PYTHON_SYNTAX,
});

// ============================================================================
// TypeScript / JavaScript
// ============================================================================

const JS_SYNTAX: Syntax = Syntax {
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\'', '`'],
    triple_quotes: false,
    regex_literals: true,
};

const JS_RESERVED: &[&str] = &[
    "if", "for", "while", "switch", "catch", "function", "return", "with", "else", "do",
    "try", "new", "typeof", "await", "yield", "super", "import", "export",
];

const JS_FUNCTION_PATTERNS: &[&str] = &[
    r"\bfunction\b\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*(?:<[^>]*>\s*)?\(",
    concat!(
        r"\b(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::[^=;]+?)?=\s*(?:async\s+)?",
        r"(?:function\b|(?:<[^>]*>\s*)?\([^)]*\)\s*(?::[^=;{]+?)?=>|[A-Za-z_$][\w$]*\s*=>)",
    ),
    concat!(
        r"(?m)^[ \t]*(?:(?:public|private|protected|static|async|readonly|override|abstract|get|set|export|default)\s+)*",
        r#"\*?[ \t]*(?P<name>#?[A-Za-z_$][\w$]*)\s*(?:<[^>(){};]*>\s*)?\([^()'"`]*\)\s*(?::[^{;=]+)?\{"#,
    ),
    concat!(
        r"(?m)^[ \t]*(?:(?:public|private|protected|static|readonly|override)\s+)+",
        r"(?P<name>#?[A-Za-z_$][\w$]*)\s*(?::[^=;]+?)?=\s*(?:async\s+)?",
        r"(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*(?::[^=;{]+?)?=>",
    ),
];

const JS_IMPORT_PATTERNS: &[&str] = &[
    r#"(?m)^[ \t]*import\b[^;'"]*?\bfrom[ \t]*['"](?P<name>[^'"\n]+)['"]"#,
    r#"(?m)^[ \t]*import[ \t]*['"](?P<name>[^'"\n]+)['"]"#,
    r#"\brequire\(\s*['"](?P<name>[^'"\n]+)['"]\s*\)"#,
];

static TYPESCRIPT: Lazy<LanguageProfile> = Lazy::new(|| LanguageProfile {
    key: "typescript",
    extensions: &["ts", "tsx", "mts", "cts"],
    functions: DeclarationPattern::new(DeclarationKind::Function, JS_FUNCTION_PATTERNS, JS_SYNTAX)
        .reserved(JS_RESERVED),
    classes: DeclarationPattern::new(
        DeclarationKind::Class,
        &[
            r"\b(?:class|interface|enum)\s+(?P<name>[A-Za-z_$][\w$]*)",
            r"(?m)^[ \t]*(?:export\s+)?(?:declare\s+)?type\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?:<[^=]*>)?\s*=",
        ],
        JS_SYNTAX,
    )
    .reserved(JS_RESERVED),
    imports: DeclarationPattern::new(DeclarationKind::Import, JS_IMPORT_PATTERNS, JS_SYNTAX)
        .reads_literals(),
    test_file_patterns: patterns(&[r"^.+\.(?:test|spec)\.[cm]?tsx?$"]),
    test_dirs: JS_TEST_DIRS,
    syntax: JS_SYNTAX,
});

static JAVASCRIPT: Lazy<LanguageProfile> = Lazy::new(|| LanguageProfile {
    key: "javascript",
    extensions: &["js", "jsx", "mjs", "cjs"],
    functions: DeclarationPattern::new(DeclarationKind::Function, JS_FUNCTION_PATTERNS, JS_SYNTAX)
        .reserved(JS_RESERVED),
    classes: DeclarationPattern::new(
        DeclarationKind::Class,
        &[r"\bclass\s+(?P<name>[A-Za-z_$][\w$]*)"],
        JS_SYNTAX,
    )
    .reserved(JS_RESERVED),
    imports: DeclarationPattern::new(DeclarationKind::Import, JS_IMPORT_PATTERNS, JS_SYNTAX)
        .reads_literals(),
    test_file_patterns: patterns(&[r"^.+\.(?:test|spec)\.[cm]?jsx?$"]),
    test_dirs: JS_TEST_DIRS,
    syntax: JS_SYNTAX,
});

// ============================================================================
// Go
// ============================================================================

const GO_SYNTAX: Syntax = Syntax {
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\'', '`'],
    triple_quotes: false,
    regex_literals: false,
};

static GO: Lazy<LanguageProfile> = Lazy::new(|| LanguageProfile {
    key: "go",
    extensions: &["go"],
    functions: DeclarationPattern::new(
        DeclarationKind::Function,
        &[r"(?m)^func\s*(?:\([^)]*\)\s*)?(?P<name>[A-Za-z_]\w*)\s*(?:\[[^\]]*\]\s*)?\("],
        GO_SYNTAX,
    ),
    classes: DeclarationPattern::new(
        DeclarationKind::Class,
        &[r"(?m)^[ \t]*type\s+(?P<name>[A-Za-z_]\w*)\s*(?:\[[^\]]*\]\s*)?(?:struct|interface)\b"],
        GO_SYNTAX,
    )
    // type ( ... ) 分组声明：gofmt 下每项缩进一个 tab，右括号顶格
    .grouped(
        r"(?m)^type[ \t]*\(",
        r"(?m)^\t(?P<name>[A-Za-z_]\w*)[ \t]*(?:\[[^\]]*\][ \t]*)?(?:struct|interface)\b",
    ),
    imports: DeclarationPattern::new(
        DeclarationKind::Import,
        &[
            r#"(?m)^import[ \t]+(?:[\w.]+[ \t]+)?"(?P<name>[^"\n]+)""#,
            r#"(?m)^[ \t]+(?:[\w.]+[ \t]+)?"(?P<name>[^"\n]+)"[ \t]*$"#,
        ],
        GO_SYNTAX,
    )
    .reads_literals(),
    test_file_patterns: patterns(&[r"^.+_test\.go$"]),
    test_dirs: TEST_DIRS,
    syntax: GO_SYNTAX,
});

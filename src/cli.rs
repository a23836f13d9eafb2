//! CLI 模式处理器
//!
//! 提供命令行接口，默认输出人类可读格式
//! 使用 --json 参数可输出 JSON 格式

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use serde_json::{json, Value};

use crate::classify::{is_test_file, TestClassifier};
use crate::config::Config;
use crate::document::{Document, SourceDocument};
use crate::extract::{extract_declarations, extract_imports, Declaration};
use crate::focal::{guess_source_file_names, guess_test_file_names, FocalIndex};
use crate::language::Language;
use crate::scan::scan_project;

/// CLI Commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 🔍 提取函数/方法声明
    Functions {
        /// 源文件路径
        #[arg(short, long)]
        file: PathBuf,

        /// 语言 ID (默认按扩展名推断)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// 🔍 提取类/类型声明
    Classes {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        language: Option<String>,
    },

    /// 📦 提取 import
    Imports {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        language: Option<String>,
    },

    /// 🧪 判断是否为测试文件 (文件无需存在)
    IsTest {
        #[arg(short, long)]
        path: String,

        /// 语言 ID: java, python, typescript, typescriptreact, javascript, javascriptreact, go
        #[arg(short, long)]
        language: String,
    },

    /// 🎯 查找测试文件对应的被测源文件
    Focal {
        /// 测试文件路径
        #[arg(short, long)]
        file: PathBuf,

        /// 搜索根目录
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },

    /// 🛰️ 扫描项目
    Scan {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// 配置文件 (默认 <path>/.testgen.yml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// ℹ️ 支持的语言
    Languages,
}

/// 处理 CLI 命令
///
/// json_output: 是否输出 JSON 格式（默认 false，输出人类可读格式）
pub fn handle_command(cmd: Command, json_output: bool) -> Result<()> {
    let result = run(cmd, json_output);

    match result {
        Ok(value) => {
            if json_output {
                let output = json!({
                    "success": true,
                    "data": value
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_value(&value);
            }
        }
        Err(e) => {
            if json_output {
                let output = json!({
                    "success": false,
                    "error": format!("{e:#}")
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                eprintln!("❌ {e:#}");
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Execute a command and produce its output value (a string in human mode).
pub fn run(cmd: Command, json_output: bool) -> Result<Value> {
    match cmd {
        Command::Functions { file, language } => {
            let doc = open(&file, language.as_deref())?;
            let decls = declarations(&doc, |lang| &lang.profile().functions)?;
            Ok(render_declarations(&doc, "functions", &decls, json_output))
        }

        Command::Classes { file, language } => {
            let doc = open(&file, language.as_deref())?;
            let decls = declarations(&doc, |lang| &lang.profile().classes)?;
            Ok(render_declarations(&doc, "classes", &decls, json_output))
        }

        Command::Imports { file, language } => {
            let doc = open(&file, language.as_deref())?;
            let lang = supported(&doc)?;
            let imports = extract_imports(doc.text(), &lang.profile().imports);
            if json_output {
                Ok(json!({ "file": doc.path().display().to_string(), "imports": imports }))
            } else {
                Ok(json!(imports.join("\n")))
            }
        }

        Command::IsTest { path, language } => {
            let verdict = is_test_file(&path, &language);
            if json_output {
                Ok(json!({ "path": path, "language": language, "is_test": verdict }))
            } else {
                Ok(json!(if verdict { "true" } else { "false" }))
            }
        }

        Command::Focal { file, root } => focal(&file, &root, json_output),

        Command::Scan { path, config } => {
            let config = match config {
                Some(c) => Config::load(&c)?,
                None => Config::discover(&path)?,
            };
            let report = scan_project(&path, &config)?;
            if json_output {
                Ok(serde_json::to_value(&report)?)
            } else {
                Ok(json!(report.render()))
            }
        }

        Command::Languages => {
            let languages: Vec<Value> = Language::ALL
                .iter()
                .map(|lang| {
                    let profile = lang.profile();
                    json!({
                        "id": lang.id(),
                        "profile": profile.key,
                        "extensions": profile.extensions,
                        "test_dirs": profile.test_dirs,
                        "test_file_patterns": profile
                            .test_file_patterns
                            .iter()
                            .map(|re| re.as_str())
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            if json_output {
                Ok(Value::Array(languages))
            } else {
                let lines: Vec<String> = Language::ALL
                    .iter()
                    .map(|lang| format!("{:<16} .{}", lang.id(), lang.profile().extensions.join(" .")))
                    .collect();
                Ok(json!(lines.join("\n")))
            }
        }
    }
}

fn open(file: &Path, language: Option<&str>) -> Result<Document> {
    match language {
        Some(id) => Document::open_as(file, id),
        None => Document::open(file),
    }
}

fn supported(doc: &Document) -> Result<Language> {
    doc.language()
        .ok_or_else(|| anyhow!("unsupported language '{}' for {}", doc.language_id(), doc.path().display()))
}

fn declarations(
    doc: &Document,
    pick: impl Fn(&Language) -> &'static crate::extract::DeclarationPattern,
) -> Result<Vec<Declaration>> {
    let lang = supported(doc)?;
    Ok(extract_declarations(doc.text(), pick(&lang)))
}

fn render_declarations(doc: &Document, label: &str, decls: &[Declaration], json_output: bool) -> Value {
    if json_output {
        json!({
            "file": doc.path().display().to_string(),
            "language": doc.language_id(),
            label: decls,
        })
    } else {
        let lines: Vec<String> = decls.iter().map(|d| format!("{:>5}  {}", d.line, d.name)).collect();
        json!(lines.join("\n"))
    }
}

fn focal(file: &Path, root: &Path, json_output: bool) -> Result<Value> {
    let test = Document::open(file)?.relative_to(root);
    let lang = supported(&test)?;
    let config = Config::discover(root)?;
    let classifier = TestClassifier::new(&config)?;

    if !classifier.is_test_document(&test) {
        let suggestions = guess_test_file_names(test.path(), lang);
        return if json_output {
            Ok(json!({ "file": file.display().to_string(), "is_test": false, "suggested_test_names": suggestions }))
        } else {
            Ok(json!(format!(
                "{} is not a test file. Conventional test names: {}",
                file.display(),
                suggestions.join(", ")
            )))
        };
    }

    let report = scan_project(root, &config)
        .with_context(|| format!("failed to scan {}", root.display()))?;
    let candidates: Vec<Document> = report
        .files
        .iter()
        .filter(|f| !f.is_test && f.language.family() == lang.family())
        .filter_map(|f| Document::open(root.join(&f.path)).ok())
        .map(|doc| doc.relative_to(root))
        .collect();
    let focal = FocalIndex::new(&candidates, &classifier)
        .resolve(&test)
        .map(|p| root.join(p));

    if json_output {
        Ok(json!({
            "file": file.display().to_string(),
            "is_test": true,
            "guessed_names": guess_source_file_names(test.path(), lang),
            "focal": focal.as_ref().map(|p| p.display().to_string()),
        }))
    } else {
        Ok(json!(match focal {
            Some(p) => format!("{} → {}", file.display(), p.display()),
            None => format!("{}: no focal file found under {}", file.display(), root.display()),
        }))
    }
}

/// 打印 Value，智能处理字符串和其他类型
fn print_value(value: &Value) {
    match value {
        Value::String(s) => println!("{s}"),
        _ => println!("{}", serde_json::to_string_pretty(value).unwrap_or_default()),
    }
}

// ============================================================================
// 声明提取 - Declaration Extractor
// ============================================================================
//
// 基于正则的启发式提取：函数/方法名、类/类型名、import。
// 不是完整的语法分析器，允许少量误报/漏报，但已知 fixture 不能回退。
//
// 流程:
// 1. mask_non_code: 遮蔽注释与字符串，保留字节偏移
// 2. 每条正则独立匹配，按 `name` 捕获组取名字
// 3. 过滤保留字，按源码出现位置合并排序
//
// ============================================================================

mod mask;

pub use mask::{mask_non_code, Syntax};

use std::ops::Range;

use memchr::memchr_iter;
use regex::Regex;
use serde::Serialize;

use crate::language::profile_for;

/// What a pattern extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Function,
    Class,
    Import,
}

/// One extracted name with its 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub line: usize,
}

/// A pattern rule: regexes exposing a `name` capture, applied to masked source.
#[derive(Debug, Clone)]
pub struct DeclarationPattern {
    kind: DeclarationKind,
    regexes: Vec<Regex>,
    syntax: Syntax,
    /// Names that can never be declarations (keywords).
    reserved: &'static [&'static str],
    /// Values of the optional `ret` capture that disqualify a match.
    reserved_prefixes: &'static [&'static str],
    /// Match against the original text so string contents (import paths) survive.
    reads_literals: bool,
    /// `(opener, item)`: `item` only applies inside a parenthesised group
    /// started by `opener` and closed by a `)` at the start of a line.
    group: Option<(Regex, Regex)>,
}

impl DeclarationPattern {
    /// Build from static pattern sources. Panics on an invalid regex.
    pub fn new(kind: DeclarationKind, sources: &[&str], syntax: Syntax) -> Self {
        Self::try_new(kind, sources, syntax).unwrap()
    }

    pub fn try_new(kind: DeclarationKind, sources: &[&str], syntax: Syntax) -> Result<Self, regex::Error> {
        let regexes = sources
            .iter()
            .map(|s| Regex::new(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            kind,
            regexes,
            syntax,
            reserved: &[],
            reserved_prefixes: &[],
            reads_literals: false,
            group: None,
        })
    }

    pub fn reserved(mut self, words: &'static [&'static str]) -> Self {
        self.reserved = words;
        self
    }

    pub fn reserved_prefixes(mut self, words: &'static [&'static str]) -> Self {
        self.reserved_prefixes = words;
        self
    }

    pub fn reads_literals(mut self) -> Self {
        self.reads_literals = true;
        self
    }

    /// Also match `item` inside groups such as Go's `type ( ... )`. Panics on an invalid regex.
    pub fn grouped(mut self, opener: &str, item: &str) -> Self {
        self.group = Some((Regex::new(opener).unwrap(), Regex::new(item).unwrap()));
        self
    }
}

/// Ordered function/method names. `None` (unsupported language) yields nothing.
pub fn extract_functions(text: &str, pattern: Option<&DeclarationPattern>) -> Vec<String> {
    names(text, pattern)
}

/// Ordered class/type names. `None` (unsupported language) yields nothing.
pub fn extract_classes(text: &str, pattern: Option<&DeclarationPattern>) -> Vec<String> {
    names(text, pattern)
}

/// Imported module or package paths, in source order.
pub fn extract_imports(text: &str, pattern: &DeclarationPattern) -> Vec<String> {
    names(text, Some(pattern))
}

/// Function names for an editor language id; unsupported ids yield nothing.
pub fn functions_for(text: &str, language_id: &str) -> Vec<String> {
    extract_functions(text, profile_for(language_id).map(|p| &p.functions))
}

/// Class/type names for an editor language id; unsupported ids yield nothing.
pub fn classes_for(text: &str, language_id: &str) -> Vec<String> {
    extract_classes(text, profile_for(language_id).map(|p| &p.classes))
}

fn names(text: &str, pattern: Option<&DeclarationPattern>) -> Vec<String> {
    match pattern {
        Some(pattern) => extract_declarations(text, pattern)
            .into_iter()
            .map(|d| d.name)
            .collect(),
        None => Vec::new(),
    }
}

/// Run every regex of `pattern` over `text` and merge hits in source order.
///
/// Duplicates are kept, except that two regexes reporting the same name at
/// the same offset count once.
pub fn extract_declarations(text: &str, pattern: &DeclarationPattern) -> Vec<Declaration> {
    if text.is_empty() {
        return Vec::new();
    }

    let masked = mask_non_code(text, &pattern.syntax);
    let haystack = if pattern.reads_literals { text } else { masked.as_str() };

    let mut hits: Vec<(usize, &str)> = Vec::new();
    for re in &pattern.regexes {
        collect(pattern, re, haystack, 0..haystack.len(), text, &masked, &mut hits);
    }
    if let Some((opener, item)) = &pattern.group {
        for open in opener.find_iter(haystack) {
            let start = open.end();
            let end = haystack[start..]
                .find("\n)")
                .map_or(haystack.len(), |i| start + i + 1);
            collect(pattern, item, haystack, start..end, text, &masked, &mut hits);
        }
    }

    hits.sort_by_key(|(offset, _)| *offset);
    hits.dedup();

    let lines = LineIndex::new(&masked);
    hits.into_iter()
        .map(|(offset, name)| Declaration {
            name: name.to_string(),
            kind: pattern.kind,
            line: lines.line_of(offset),
        })
        .collect()
}

fn collect<'h>(
    pattern: &DeclarationPattern,
    re: &Regex,
    haystack: &'h str,
    range: Range<usize>,
    text: &str,
    masked: &str,
    hits: &mut Vec<(usize, &'h str)>,
) {
    let base = range.start;
    for caps in re.captures_iter(&haystack[range]) {
        let Some(name) = caps.name("name") else { continue };
        if name.as_str().is_empty() || pattern.reserved.contains(&name.as_str()) {
            continue;
        }
        if let Some(ret) = caps.name("ret") {
            if pattern.reserved_prefixes.contains(&ret.as_str()) {
                continue;
            }
        }
        if pattern.reads_literals {
            let whole = caps.get(0).map_or(name.start(), |m| m.start());
            if !starts_in_code(text, masked, base + whole) {
                continue;
            }
        }
        hits.push((base + name.start(), name.as_str()));
    }
}

/// True when the first non-blank byte at or after `offset` survived masking.
fn starts_in_code(original: &str, masked: &str, offset: usize) -> bool {
    let original = &original.as_bytes()[offset..];
    let masked = &masked.as_bytes()[offset..];
    match original.iter().position(|b| !b.is_ascii_whitespace()) {
        Some(i) => original[i] == masked[i],
        None => false,
    }
}

/// Count the `needles` that occur (case-insensitively) inside at least one haystack.
pub fn count_substring_matches(needles: &[String], haystacks: &[String]) -> usize {
    let haystacks: Vec<String> = haystacks.iter().map(|h| h.to_lowercase()).collect();
    needles
        .iter()
        .map(|n| n.to_lowercase())
        .filter(|n| !n.is_empty() && haystacks.iter().any(|h| h.contains(n.as_str())))
        .count()
}

/// Byte offset → 1-based line number.
struct LineIndex {
    breaks: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        Self { breaks: memchr_iter(b'\n', text.as_bytes()).collect() }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.breaks.partition_point(|&b| b < offset) + 1
    }
}

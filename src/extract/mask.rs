//! 注释/字符串遮蔽
//!
//! 在正则匹配之前，把注释和字符串字面量的内容替换为空格，
//! 避免 `// def fake():` 或 `"class Foo"` 之类的文本被当成声明。
//!
//! 遮蔽结果与原文 **字节长度相同、换行位置相同**：
//! - 多字节字符替换为同等字节数的空格
//! - 字符串保留引号本身，只遮蔽内容
//! - 注释连同注释符号一起遮蔽

use memchr::memchr;

/// Lexical conventions needed to find comments and string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
    pub line_comments: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    pub quotes: &'static [char],
    /// `"""` / `'''` blocks (Python docstrings, Java text blocks).
    pub triple_quotes: bool,
    /// JS `/.../` regex literals, told apart from division by the preceding token.
    pub regex_literals: bool,
}

const TRIPLE_QUOTES: [&str; 2] = ["\"\"\"", "'''"];

// 这些字符或关键字之后的 `/` 开始一个正则字面量，而不是除号
const REGEX_PRECEDERS: &str = "(,=:[!&|?{};+-*%<>~^";
const REGEX_KEYWORDS: &[&str] = &["return", "typeof", "case", "do", "else", "in", "of", "void", "yield", "await"];

/// Blank out comments and string-literal bodies, preserving byte offsets and line breaks.
///
/// Unterminated comments and strings are masked to the end of input
/// (strings other than backtick templates stop at the end of the line).
pub fn mask_non_code(text: &str, syntax: &Syntax) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if syntax.line_comments.iter().any(|p| rest.starts_with(p)) {
            let end = memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len());
            blank(&mut out, &rest[..end]);
            rest = &rest[end..];
            continue;
        }

        if let Some((open, close)) = syntax.block_comment {
            if rest.starts_with(open) {
                let end = rest[open.len()..]
                    .find(close)
                    .map(|i| open.len() + i + close.len())
                    .unwrap_or(rest.len());
                blank(&mut out, &rest[..end]);
                rest = &rest[end..];
                continue;
            }
        }

        if syntax.triple_quotes {
            if let Some(delim) = TRIPLE_QUOTES.iter().find(|d| rest.starts_with(**d)) {
                let body = &rest[delim.len()..];
                match body.find(delim) {
                    Some(i) => {
                        out.push_str(delim);
                        blank(&mut out, &body[..i]);
                        out.push_str(delim);
                        rest = &body[i + delim.len()..];
                    }
                    None => {
                        out.push_str(delim);
                        blank(&mut out, body);
                        rest = "";
                    }
                }
                continue;
            }
        }

        if syntax.regex_literals && c == '/' && regex_allowed(&out) {
            if let Some(end) = regex_end(rest) {
                out.push('/');
                blank(&mut out, &rest[1..end - 1]);
                out.push('/');
                rest = &rest[end..];
                continue;
            }
        }

        if syntax.quotes.contains(&c) {
            let end = string_end(rest, c);
            let body_end = if end > c.len_utf8() && rest[..end].ends_with(c) {
                end - c.len_utf8()
            } else {
                end
            };
            out.push(c);
            blank(&mut out, &rest[c.len_utf8()..body_end]);
            out.push_str(&rest[body_end..end]);
            rest = &rest[end..];
            continue;
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Byte offset just past the closing quote (or where the literal gives up).
fn string_end(s: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, ch) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\n' if quote != '`' => return i,
            ch if ch == quote => return i + ch.len_utf8(),
            _ => {}
        }
    }
    s.len()
}

/// Whether a `/` following the already masked text `before` opens a regex literal.
fn regex_allowed(before: &str) -> bool {
    let before = before.trim_end_matches([' ', '\t', '\r']);
    match before.chars().next_back() {
        None | Some('\n') => true,
        Some(ch) if REGEX_PRECEDERS.contains(ch) => true,
        Some(ch) if is_word_char(ch) => {
            let word: Vec<char> = before.chars().rev().take_while(|c| is_word_char(*c)).collect();
            let word: String = word.into_iter().rev().collect();
            REGEX_KEYWORDS.contains(&word.as_str())
        }
        Some(_) => false,
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Byte offset just past the closing `/`, or `None` when the line ends first.
fn regex_end(s: &str) -> Option<usize> {
    let mut escaped = false;
    let mut in_class = false;
    for (i, ch) in s.char_indices().skip(1) {
        if ch == '\n' {
            return None;
        }
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn blank(out: &mut String, s: &str) {
    for ch in s.chars() {
        if ch == '\n' {
            out.push('\n');
        } else {
            for _ in 0..ch.len_utf8() {
                out.push(' ');
            }
        }
    }
}

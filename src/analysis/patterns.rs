//! Per-language pattern profiles
//!
//! Each language is described by one [`LanguageProfile`] entry. Adding a
//! language means adding a table entry here; the metric code never branches
//! on the language itself.

use crate::models::Language;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// How a language delimits blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// Block extent follows indentation (function ends at a dedent)
    Indentation,
    /// Block extent follows `{` / `}`
    Braces,
}

/// How type information shows up in source text
#[derive(Debug)]
pub enum Typing {
    /// Mandatory static types; always considered annotated
    Static,
    /// Optional annotations, detected by pattern
    Optional(Regex),
    /// No annotation syntax we can detect
    Untyped,
}

#[derive(Debug)]
pub struct LanguageProfile {
    pub block_style: BlockStyle,
    pub function_header: Option<Regex>,
    pub comment_patterns: Vec<Regex>,
    pub typing: Typing,
}

const HASH_COMMENT: &str = r"#.*$";
const LINE_COMMENT: &str = r"//.*$";
/// Single-line `/* ... */` only; lines inside a multi-line block are not counted
const BLOCK_COMMENT: &str = r"/\*.*?\*/";
const INLINE_ANNOTATION: &str = r"\w+\s*:\s*\w+";
const JS_FUNCTION: &str = r"^\s*(export\s+)?(default\s+)?(async\s+)?(function\s*\*?\s*\w+|(const|let|var)\s+\w+\s*=\s*(async\s+)?\([^)]*\)\s*=>)";

static PROFILES: OnceLock<HashMap<Language, LanguageProfile>> = OnceLock::new();
static UNKNOWN: OnceLock<LanguageProfile> = OnceLock::new();

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

fn c_family_comments() -> Vec<Regex> {
    vec![re(LINE_COMMENT), re(BLOCK_COMMENT)]
}

fn build_profiles() -> HashMap<Language, LanguageProfile> {
    let mut profiles = HashMap::new();

    profiles.insert(
        Language::Python,
        LanguageProfile {
            block_style: BlockStyle::Indentation,
            function_header: Some(re(r"^\s*(async\s+)?def\s+\w+")),
            comment_patterns: vec![re(HASH_COMMENT)],
            typing: Typing::Optional(re(INLINE_ANNOTATION)),
        },
    );
    profiles.insert(
        Language::Ruby,
        LanguageProfile {
            block_style: BlockStyle::Indentation,
            function_header: Some(re(r"^\s*def\s+\w+")),
            comment_patterns: vec![re(HASH_COMMENT)],
            typing: Typing::Optional(re(INLINE_ANNOTATION)),
        },
    );
    profiles.insert(
        Language::JavaScript,
        LanguageProfile {
            block_style: BlockStyle::Braces,
            function_header: Some(re(JS_FUNCTION)),
            comment_patterns: c_family_comments(),
            typing: Typing::Untyped,
        },
    );
    profiles.insert(
        Language::TypeScript,
        LanguageProfile {
            block_style: BlockStyle::Braces,
            function_header: Some(re(JS_FUNCTION)),
            comment_patterns: c_family_comments(),
            typing: Typing::Optional(re(INLINE_ANNOTATION)),
        },
    );
    profiles.insert(
        Language::Go,
        LanguageProfile {
            block_style: BlockStyle::Braces,
            function_header: Some(re(r"^\s*func\s+(\([^)]*\)\s*)?\w+")),
            comment_patterns: c_family_comments(),
            typing: Typing::Static,
        },
    );
    profiles.insert(
        Language::Rust,
        LanguageProfile {
            block_style: BlockStyle::Braces,
            function_header: Some(re(
                r#"^\s*(pub(\([^)]*\))?\s+)?(const\s+)?(async\s+)?(unsafe\s+)?(extern\s+"[^"]*"\s+)?fn\s+\w+"#,
            )),
            comment_patterns: c_family_comments(),
            typing: Typing::Static,
        },
    );
    profiles.insert(
        Language::Java,
        LanguageProfile {
            block_style: BlockStyle::Braces,
            function_header: Some(re(r"^\s*(public|private|protected|static).*\w+\s*\(")),
            comment_patterns: c_family_comments(),
            typing: Typing::Static,
        },
    );
    profiles.insert(
        Language::C,
        LanguageProfile {
            block_style: BlockStyle::Braces,
            function_header: Some(re(r"^\w+\s+\w+\s*\(")),
            comment_patterns: c_family_comments(),
            typing: Typing::Static,
        },
    );
    profiles.insert(
        Language::Cpp,
        LanguageProfile {
            block_style: BlockStyle::Braces,
            function_header: Some(re(r"^\w+\s+\w+\s*\(|^\w+::\w+\s*\(")),
            comment_patterns: c_family_comments(),
            typing: Typing::Static,
        },
    );
    profiles.insert(
        Language::Php,
        LanguageProfile {
            block_style: BlockStyle::Braces,
            function_header: Some(re(
                r"^\s*((public|private|protected)\s+)?(static\s+)?function\s+\w+",
            )),
            comment_patterns: vec![re(LINE_COMMENT), re(BLOCK_COMMENT), re(HASH_COMMENT)],
            typing: Typing::Optional(re(INLINE_ANNOTATION)),
        },
    );

    profiles
}

/// Profile for `language`; unknown languages get brace nesting and nothing else
pub fn profile(language: Language) -> &'static LanguageProfile {
    PROFILES
        .get_or_init(build_profiles)
        .get(&language)
        .unwrap_or_else(|| {
            UNKNOWN.get_or_init(|| LanguageProfile {
                block_style: BlockStyle::Braces,
                function_header: None,
                comment_patterns: Vec::new(),
                typing: Typing::Untyped,
            })
        })
}

static COMPLEXITY: OnceLock<Regex> = OnceLock::new();

/// Control-flow keywords counted by the line-level complexity score
pub fn complexity_keywords() -> &'static Regex {
    COMPLEXITY.get_or_init(|| {
        re(r"(?i)\b(if|else|elif|for|while|switch|case|catch|except|and|or)\b|&&|\|\|")
    })
}

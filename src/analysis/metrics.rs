//! Per-file heuristic metrics
//!
//! Every function here tolerates empty or whitespace-only input and returns
//! zeroed metrics instead of failing.

use crate::analysis::patterns::{complexity_keywords, BlockStyle, LanguageProfile, Typing};

/// Lines longer than this many characters count as "too long"
pub const LONG_LINE_THRESHOLD: usize = 120;

/// Spaces per nesting level for indentation-delimited languages
pub const INDENT_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineStats {
    pub avg: f64,
    pub max: usize,
    pub too_long_pct: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FunctionStats {
    pub avg: f64,
    pub max: usize,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NestingStats {
    pub avg: f64,
    pub max: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComplexityStats {
    pub avg: f64,
    pub max: usize,
    pub total: usize,
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

pub fn line_lengths(content: &str) -> LineStats {
    if is_blank(content) {
        return LineStats::default();
    }

    let lengths: Vec<usize> = content.lines().map(|l| l.chars().count()).collect();
    if lengths.is_empty() {
        return LineStats::default();
    }

    let too_long = lengths.iter().filter(|&&n| n > LONG_LINE_THRESHOLD).count();
    let as_f64: Vec<f64> = lengths.iter().map(|&n| n as f64).collect();

    LineStats {
        avg: round_to(mean(&as_f64), 1),
        max: lengths.iter().copied().max().unwrap_or(0),
        too_long_pct: round_to(too_long as f64 / lengths.len() as f64 * 100.0, 1),
    }
}

/// Function headers are found with the profile's pattern. Extent is only
/// measured for indentation-delimited languages: a function runs from its
/// header until the next non-blank line indented at or left of the header.
/// Brace-delimited functions are counted but contribute no length.
pub fn function_lengths(content: &str, profile: &LanguageProfile) -> FunctionStats {
    let header = match &profile.function_header {
        Some(h) if !is_blank(content) => h,
        _ => return FunctionStats::default(),
    };

    let lines: Vec<&str> = content.lines().collect();
    let measure_extent = profile.block_style == BlockStyle::Indentation;

    let mut lengths: Vec<usize> = Vec::new();
    let mut count = 0;
    // (start line, header indentation)
    let mut open: Option<(usize, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        if header.is_match(line) {
            count += 1;
            if let Some((start, _)) = open.take() {
                if measure_extent && i > start {
                    lengths.push(i - start);
                }
            }
            open = Some((i, indent_of(line)));
        } else if let Some((start, header_indent)) = open {
            if measure_extent && !is_blank(line) && indent_of(line) <= header_indent {
                lengths.push(i - start);
                open = None;
            }
        }
    }

    if let Some((start, _)) = open {
        if measure_extent && lines.len() > start {
            lengths.push(lines.len() - start);
        }
    }

    if lengths.is_empty() {
        return FunctionStats {
            count,
            ..Default::default()
        };
    }

    let as_f64: Vec<f64> = lengths.iter().map(|&n| n as f64).collect();
    FunctionStats {
        avg: round_to(mean(&as_f64), 1),
        max: lengths.iter().copied().max().unwrap_or(0),
        count,
    }
}

/// Indentation languages: indent width / 4 per non-blank line.
/// Brace languages: running brace depth, sampled before the line's own braces.
pub fn nesting_depth(content: &str, profile: &LanguageProfile) -> NestingStats {
    if is_blank(content) {
        return NestingStats::default();
    }

    let mut depths: Vec<usize> = Vec::new();
    match profile.block_style {
        BlockStyle::Indentation => {
            for line in content.lines().filter(|l| !is_blank(l)) {
                depths.push(indent_of(line) / INDENT_WIDTH);
            }
        }
        BlockStyle::Braces => {
            let mut depth: i64 = 0;
            for line in content.lines().filter(|l| !is_blank(l)) {
                depths.push(depth.max(0) as usize);
                let opening = line.matches('{').count() as i64;
                let closing = line.matches('}').count() as i64;
                depth = (depth + opening - closing).max(0);
            }
        }
    }

    if depths.is_empty() {
        return NestingStats::default();
    }

    let as_f64: Vec<f64> = depths.iter().map(|&n| n as f64).collect();
    NestingStats {
        avg: round_to(mean(&as_f64), 1),
        max: depths.iter().copied().max().unwrap_or(0),
    }
}

/// Fraction of lines carrying at least one comment marker, two decimals
pub fn comment_ratio(content: &str, profile: &LanguageProfile) -> f64 {
    if is_blank(content) || profile.comment_patterns.is_empty() {
        return 0.0;
    }

    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return 0.0;
    }

    let commented = lines
        .iter()
        .filter(|line| profile.comment_patterns.iter().any(|p| p.is_match(line)))
        .count();

    round_to(commented as f64 / lines.len() as f64, 2)
}

pub fn has_type_hints(content: &str, profile: &LanguageProfile) -> bool {
    if is_blank(content) {
        return false;
    }
    match &profile.typing {
        Typing::Static => true,
        Typing::Optional(pattern) => pattern.is_match(content),
        Typing::Untyped => false,
    }
}

/// Keyword occurrences per line; the average is over lines with at least one hit.
///
/// Alphabetic keywords count as whole words only, so this deliberately
/// reports less than raw substring counting would: `for item in items`
/// scores 1 (not 2 for the `or` inside `for`), `elif` does not also count
/// as `if`, and `import` scores 0.
pub fn complexity(content: &str) -> ComplexityStats {
    if is_blank(content) {
        return ComplexityStats::default();
    }

    let keywords = complexity_keywords();
    let per_line: Vec<usize> = content
        .lines()
        .map(|line| keywords.find_iter(line).count())
        .filter(|&n| n > 0)
        .collect();

    if per_line.is_empty() {
        return ComplexityStats::default();
    }

    let as_f64: Vec<f64> = per_line.iter().map(|&n| n as f64).collect();
    ComplexityStats {
        avg: round_to(mean(&as_f64), 1),
        max: per_line.iter().copied().max().unwrap_or(0),
        total: per_line.iter().sum(),
    }
}

/// Path-based test detection
pub fn is_test_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains("test") || lower.contains("spec")
}

//! Attribute mapping
//!
//! Translates the fused score and repository metadata into the categorical
//! attributes consumed by the renderer. Every function here is total:
//! unrecognised inputs fall back to defaults instead of failing.

mod description;
mod tables;

use crate::models::{
    AttributeSet, Breed, CatAge, CatSize, Expression, FusedResult, RepoMetadata,
};
use tracing::debug;

pub use description::{beauty_modifier, describe};
pub use tables::{DEFAULT_BACKGROUND, LANGUAGE_BACKGROUNDS, SIZE_RANGES};

/// Background theme for `language`, matched case-insensitively after trimming
pub fn background_for(language: &str) -> &'static str {
    let language = language.trim();
    if language.is_empty() {
        return DEFAULT_BACKGROUND;
    }
    LANGUAGE_BACKGROUNDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(language))
        .map(|(_, background)| *background)
        .unwrap_or(DEFAULT_BACKGROUND)
}

/// Breed by language family; unknown languages get a domestic shorthair
pub fn breed_for(language: &str) -> Breed {
    let language = language.trim();
    tables::BREED_FAMILIES
        .iter()
        .find(|(_, members)| members.iter().any(|m| m.eq_ignore_ascii_case(language)))
        .map(|(breed, _)| *breed)
        .unwrap_or(Breed::DomesticShorthair)
}

/// First inclusive size range containing `size_kb`; medium otherwise
pub fn size_for(size_kb: u64) -> CatSize {
    SIZE_RANGES
        .iter()
        .find(|(_, min, max)| (*min..=*max).contains(&size_kb))
        .map(|(size, _, _)| *size)
        .unwrap_or(CatSize::Medium)
}

pub fn age_for(score: f64) -> CatAge {
    if score >= 8.0 {
        CatAge::Senior
    } else if score >= 6.0 {
        CatAge::Adult
    } else if score >= 4.0 {
        CatAge::Young
    } else {
        CatAge::Kitten
    }
}

pub fn expression_for(score: f64, has_tests: bool) -> Expression {
    if score >= 8.0 && has_tests {
        Expression::Happy
    } else if score >= 6.0 {
        Expression::Neutral
    } else if score >= 4.0 {
        Expression::Concerned
    } else {
        Expression::Grumpy
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeMapper;

impl AttributeMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map(&self, metadata: &RepoMetadata, fused: &FusedResult) -> AttributeSet {
        let language = metadata.language_name().to_string();
        let attributes = AttributeSet {
            size: size_for(metadata.size_kb),
            age: age_for(fused.score),
            expression: expression_for(fused.score, fused.has_tests()),
            breed: breed_for(&language),
            background: background_for(&language).to_string(),
            beauty_score: fused.score,
            language,
        };
        debug!(
            "Mapped attributes: size={:?} age={:?} expression={:?}",
            attributes.size, attributes.age, attributes.expression
        );
        attributes
    }
}

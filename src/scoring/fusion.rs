use super::normalizer::{normalize, MAX_SCORE};
use crate::analysis::metrics::round_to;
use crate::models::{FusedResult, HeuristicMetrics, QualitativeAssessment};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::info;

pub const HEURISTIC_WEIGHT: f64 = 0.3;
pub const QUALITATIVE_WEIGHT: f64 = 0.7;

/// Weighted combination of the two component scores, always in [0, 10]
pub fn fuse(heuristic_score: f64, qualitative_score: f64) -> f64 {
    let combined = HEURISTIC_WEIGHT * heuristic_score + QUALITATIVE_WEIGHT * qualitative_score;
    let rounded = round_to(combined, 1);
    if rounded.is_nan() {
        return 0.0;
    }
    rounded.clamp(0.0, MAX_SCORE)
}

/// `"Code Readability"` -> `"code_readability_score"`
fn metric_key(name: &str) -> String {
    format!("{}_score", name.trim().to_lowercase().replace(' ', "_"))
}

/// Heuristic fields plus the assessment's per-metric scores and findings
pub fn merge_metrics(
    heuristics: &HeuristicMetrics,
    assessment: &QualitativeAssessment,
) -> BTreeMap<String, Value> {
    let mut merged: BTreeMap<String, Value> = match serde_json::to_value(heuristics) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    };

    for metric in &assessment.metrics {
        merged.insert(metric_key(&metric.name), json!(metric.score));
    }

    merged.insert("strengths".into(), json!(assessment.strengths));
    merged.insert("weaknesses".into(), json!(assessment.weaknesses));
    merged.insert("recommendations".into(), json!(assessment.recommendations));
    merged.insert("summary".into(), json!(assessment.summary));
    merged
}

/// Builds a [`FusedResult`] from the heuristic and qualitative stage outputs
#[derive(Debug, Clone, Copy, Default)]
pub struct FusionEngine;

impl FusionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn combine(
        &self,
        heuristics: &HeuristicMetrics,
        assessment: &QualitativeAssessment,
        files_analyzed: Vec<String>,
    ) -> FusedResult {
        let heuristic_score = normalize(heuristics);
        let qualitative_score = assessment.overall_score;
        let score = fuse(heuristic_score, qualitative_score);

        info!(
            "Fused score {:.1} (heuristic {:.1}, qualitative {:.1})",
            score, heuristic_score, qualitative_score
        );

        FusedResult {
            score,
            heuristic_score,
            qualitative_score,
            files_analyzed,
            heuristics: heuristics.clone(),
            metrics: merge_metrics(heuristics, assessment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QualityMetric;
    use proptest::prelude::*;

    fn assessment(score: f64) -> QualitativeAssessment {
        QualitativeAssessment {
            overall_score: score,
            metrics: vec![
                QualityMetric {
                    name: "Code Readability".into(),
                    score: 8.0,
                    description: "Clear names".into(),
                },
                QualityMetric {
                    name: "Error Handling".into(),
                    score: 6.5,
                    description: String::new(),
                },
            ],
            strengths: vec!["Small functions".into()],
            weaknesses: vec!["Few tests".into()],
            recommendations: vec!["Add integration tests".into()],
            summary: "Solid overall".into(),
        }
    }

    #[test]
    fn test_fuse_weights() {
        assert_eq!(fuse(10.0, 0.0), 3.0);
        assert_eq!(fuse(0.0, 10.0), 7.0);
        assert_eq!(fuse(7.0, 8.0), 7.7);
    }

    #[test]
    fn test_fuse_both_maximal_stays_at_ten() {
        assert_eq!(fuse(10.0, 10.0), 10.0);
    }

    #[test]
    fn test_fuse_clamps_out_of_range_inputs() {
        assert_eq!(fuse(12.0, 11.0), 10.0);
        assert_eq!(fuse(-5.0, 0.0), 0.0);
        assert_eq!(fuse(f64::NAN, 5.0), 0.0);
    }

    #[test]
    fn test_merge_metrics_keys() {
        let heuristics = HeuristicMetrics {
            line_length_avg: 42.5,
            has_tests: true,
            ..Default::default()
        };
        let merged = merge_metrics(&heuristics, &assessment(7.0));

        assert_eq!(merged["line_length_avg"], json!(42.5));
        assert_eq!(merged["has_tests"], json!(true));
        assert_eq!(merged["code_readability_score"], json!(8.0));
        assert_eq!(merged["error_handling_score"], json!(6.5));
        assert_eq!(merged["strengths"], json!(["Small functions"]));
        assert_eq!(merged["summary"], json!("Solid overall"));
    }

    #[test]
    fn test_combine() {
        let heuristics = HeuristicMetrics::default();
        let fused = FusionEngine::new().combine(
            &heuristics,
            &assessment(8.0),
            vec!["README.md".into(), "main.py".into()],
        );
        // Zeroed heuristics normalize to 7.0: 0.3 * 7 + 0.7 * 8 = 7.7
        assert_eq!(fused.heuristic_score, 7.0);
        assert_eq!(fused.score, 7.7);
        assert_eq!(fused.files_analyzed.len(), 2);
        assert!(!fused.has_tests());
    }

    proptest! {
        #[test]
        fn fused_score_is_bounded(h in 0.0f64..=10.0, q in 0.0f64..=10.0) {
            let score = fuse(h, q);
            prop_assert!((0.0..=MAX_SCORE).contains(&score));
        }

        #[test]
        fn fused_score_lies_between_components(h in 0.0f64..=10.0, q in 0.0f64..=10.0) {
            let score = fuse(h, q);
            let lo = h.min(q);
            let hi = h.max(q);
            // Rounding to one decimal may move the result by at most 0.05
            prop_assert!(score >= lo - 0.05 - 1e-9 && score <= hi + 0.05 + 1e-9);
        }
    }
}

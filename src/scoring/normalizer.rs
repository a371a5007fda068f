use crate::analysis::metrics::round_to;
use crate::models::HeuristicMetrics;

pub const MAX_SCORE: f64 = 10.0;

fn line_length_points(avg: f64) -> f64 {
    if avg < 100.0 {
        2.0
    } else if avg < 120.0 {
        1.0
    } else {
        0.0
    }
}

fn function_length_points(avg: f64) -> f64 {
    if avg == 0.0 {
        // No measurable functions; neutral
        1.0
    } else if avg < 30.0 {
        2.0
    } else if avg < 50.0 {
        1.0
    } else {
        0.0
    }
}

fn nesting_points(avg: f64) -> f64 {
    if avg < 3.0 {
        2.0
    } else if avg < 4.0 {
        1.0
    } else {
        0.0
    }
}

fn complexity_points(avg: f64) -> f64 {
    if avg < 5.0 {
        2.0
    } else if avg < 8.0 {
        1.0
    } else {
        0.0
    }
}

/// Map heuristic metrics to a 0-10 score. Pure and deterministic.
pub fn normalize(metrics: &HeuristicMetrics) -> f64 {
    let mut score = 0.0;

    score += line_length_points(metrics.line_length_avg);
    score += function_length_points(metrics.function_length_avg);
    score += nesting_points(metrics.nesting_depth_avg);
    if metrics.comment_ratio > 0.1 {
        score += 1.0;
    }
    if metrics.has_type_hints {
        score += 1.0;
    }
    score += complexity_points(metrics.complexity_avg);
    if metrics.has_tests {
        score += 1.0;
    }

    round_to(score, 1).clamp(0.0, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn perfect() -> HeuristicMetrics {
        HeuristicMetrics {
            line_length_avg: 40.0,
            function_length_avg: 12.0,
            nesting_depth_avg: 1.0,
            comment_ratio: 0.3,
            has_type_hints: true,
            complexity_avg: 1.5,
            has_tests: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_perfect_input_is_capped() {
        // Raw sum is 11
        assert_eq!(normalize(&perfect()), 10.0);
    }

    #[test]
    fn test_zeroed_metrics() {
        // line 2 + no functions 1 + nesting 2 + complexity 2
        assert_eq!(normalize(&HeuristicMetrics::default()), 7.0);
    }

    #[test]
    fn test_poor_metrics() {
        let metrics = HeuristicMetrics {
            line_length_avg: 130.0,
            function_length_avg: 80.0,
            nesting_depth_avg: 5.0,
            comment_ratio: 0.05,
            complexity_avg: 9.0,
            ..Default::default()
        };
        assert_eq!(normalize(&metrics), 0.0);
    }

    #[test]
    fn test_tier_boundaries() {
        let metrics = HeuristicMetrics {
            line_length_avg: 100.0,
            function_length_avg: 30.0,
            nesting_depth_avg: 3.0,
            comment_ratio: 0.1,
            complexity_avg: 5.0,
            ..Default::default()
        };
        // Every signal sits on the lower edge of its second tier
        assert_eq!(normalize(&metrics), 4.0);
    }

    fn metrics_strategy() -> impl Strategy<Value = HeuristicMetrics> {
        (
            0.0f64..300.0,
            0.0f64..200.0,
            0.0f64..12.0,
            0.0f64..1.0,
            any::<bool>(),
            0.0f64..20.0,
            any::<bool>(),
        )
            .prop_map(
                |(line, func, nesting, comments, typed, complexity, tests)| HeuristicMetrics {
                    line_length_avg: line,
                    function_length_avg: func,
                    nesting_depth_avg: nesting,
                    comment_ratio: comments,
                    has_type_hints: typed,
                    complexity_avg: complexity,
                    has_tests: tests,
                    ..Default::default()
                },
            )
    }

    proptest! {
        #[test]
        fn normalized_score_is_bounded(metrics in metrics_strategy()) {
            let score = normalize(&metrics);
            prop_assert!((0.0..=MAX_SCORE).contains(&score));
        }

        #[test]
        fn normalize_is_deterministic(metrics in metrics_strategy()) {
            prop_assert_eq!(normalize(&metrics), normalize(&metrics));
        }
    }
}

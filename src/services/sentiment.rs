use crate::models::{Review, ReviewSentiment, SentimentLabel, SentimentSummary};

/// Compound score at or above which a review counts as positive
const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound score at or below which a review counts as negative
const NEGATIVE_THRESHOLD: f64 = -0.05;
/// Reviews longer than this many characters are cut for display
const MAX_REVIEW_CHARS: usize = 700;

/// Scores text polarity on a `[-1, 1]` compound scale
#[cfg_attr(test, mockall::automock)]
pub trait SentimentScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// Lexicon-based scorer backed by VADER
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderScorer;

impl SentimentScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

pub fn label(compound: f64) -> SentimentLabel {
    if compound >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

pub fn analyze(scorer: &dyn SentimentScorer, text: &str) -> (SentimentLabel, f64) {
    let compound = scorer.compound(text);
    (label(compound), compound)
}

/// Counts labels and averages compound scores over all reviews
pub fn summarize(scorer: &dyn SentimentScorer, reviews: &[Review]) -> SentimentSummary {
    let mut summary = SentimentSummary::default();
    if reviews.is_empty() {
        return summary;
    }

    let mut total = 0.0;
    for review in reviews {
        let (label, score) = analyze(scorer, &review.content);
        total += score;
        match label {
            SentimentLabel::Positive => summary.positive += 1,
            SentimentLabel::Neutral => summary.neutral += 1,
            SentimentLabel::Negative => summary.negative += 1,
        }
    }

    summary.average_score = round_to(total / reviews.len() as f64, 3);
    summary
}

/// Attaches a sentiment to each review, truncating long content
pub fn annotate(scorer: &dyn SentimentScorer, reviews: &[Review]) -> Vec<ReviewSentiment> {
    reviews
        .iter()
        .map(|review| {
            let (label, score) = analyze(scorer, &review.content);
            ReviewSentiment {
                author: review.author.clone(),
                content: truncate_for_display(&review.content),
                label,
                score: round_to(score, 2),
            }
        })
        .collect()
}

fn truncate_for_display(content: &str) -> String {
    match content.char_indices().nth(MAX_REVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(author: &str, content: &str) -> Review {
        Review {
            author: author.to_string(),
            content: content.to_string(),
        }
    }

    /// Scores each review by a number embedded in its text
    struct FixedScorer;

    impl SentimentScorer for FixedScorer {
        fn compound(&self, text: &str) -> f64 {
            text.parse().unwrap_or(0.0)
        }
    }

    #[test]
    fn test_label_thresholds_are_inclusive() {
        assert_eq!(label(0.05), SentimentLabel::Positive);
        assert_eq!(label(0.0499), SentimentLabel::Neutral);
        assert_eq!(label(0.0), SentimentLabel::Neutral);
        assert_eq!(label(-0.0499), SentimentLabel::Neutral);
        assert_eq!(label(-0.05), SentimentLabel::Negative);
        assert_eq!(label(-0.9), SentimentLabel::Negative);
    }

    #[test]
    fn test_summarize_counts_and_average() {
        let reviews = vec![
            review("a", "0.8"),
            review("b", "0.6"),
            review("c", "0.0"),
            review("d", "-0.5"),
        ];
        let summary = summarize(&FixedScorer, &reviews);

        assert_eq!(summary.positive, 2);
        assert_eq!(summary.neutral, 1);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.average_score, 0.225);
    }

    #[test]
    fn test_summarize_rounds_to_three_decimals() {
        let reviews = vec![review("a", "0.1"), review("b", "0.2"), review("c", "0.2")];
        let summary = summarize(&FixedScorer, &reviews);
        assert_eq!(summary.average_score, 0.167);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&FixedScorer, &[]);
        assert_eq!(summary, SentimentSummary::default());
    }

    #[test]
    fn test_annotate_uses_scorer() {
        let mut scorer = MockSentimentScorer::new();
        scorer
            .expect_compound()
            .withf(|text| text == "Loved it")
            .return_const(0.8126);

        let annotated = annotate(&scorer, &[review("critic", "Loved it")]);
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].author, "critic");
        assert_eq!(annotated[0].label, SentimentLabel::Positive);
        assert_eq!(annotated[0].score, 0.81);
    }

    #[test]
    fn test_long_review_truncated() {
        let long = "é".repeat(MAX_REVIEW_CHARS + 50);
        let annotated = annotate(&FixedScorer, &[review("a", &long)]);

        let content = &annotated[0].content;
        assert!(content.ends_with("..."));
        assert_eq!(content.chars().count(), MAX_REVIEW_CHARS + 3);
    }

    #[test]
    fn test_short_review_untouched() {
        let exact = "x".repeat(MAX_REVIEW_CHARS);
        assert_eq!(truncate_for_display(&exact), exact);
    }

    #[test]
    fn test_vader_polarity_direction() {
        let scorer = VaderScorer;
        assert!(scorer.compound("This movie is great, I love it!") >= POSITIVE_THRESHOLD);
        assert!(scorer.compound("A terrible, boring and awful film.") <= NEGATIVE_THRESHOLD);
    }
}

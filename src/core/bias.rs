use serde::Serialize;

use crate::models::{Article, BiasLabel};

/// Count and percentage distribution of bias labels over a set of
/// articles. Pure arithmetic, no I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BiasDistribution {
    pub left: i64,
    pub center: i64,
    pub right: i64,
    #[serde(rename = "leftPct")]
    pub left_pct: i64,
    #[serde(rename = "centerPct")]
    pub center_pct: i64,
    #[serde(rename = "rightPct")]
    pub right_pct: i64,
}

/// The percentage slice alone, as embedded in the related-articles view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BiasPercentages {
    pub left: i64,
    pub center: i64,
    pub right: i64,
}

impl BiasDistribution {
    pub fn aggregate(labels: impl IntoIterator<Item = BiasLabel>) -> BiasDistribution {
        let (mut left, mut center, mut right) = (0i64, 0i64, 0i64);
        for label in labels {
            match label {
                BiasLabel::Left => left += 1,
                BiasLabel::Center => center += 1,
                BiasLabel::Right => right += 1,
            }
        }

        let total = left + center + right;
        BiasDistribution {
            left,
            center,
            right,
            left_pct: percentage(left, total),
            center_pct: percentage(center, total),
            right_pct: percentage(right, total),
        }
    }

    pub fn over_articles<'a>(articles: impl IntoIterator<Item = &'a Article>) -> BiasDistribution {
        Self::aggregate(articles.into_iter().map(|a| a.bias))
    }

    pub fn total(&self) -> i64 {
        self.left + self.center + self.right
    }

    pub fn percentages(&self) -> BiasPercentages {
        BiasPercentages {
            left: self.left_pct,
            center: self.center_pct,
            right: self.right_pct,
        }
    }
}

/// round(count / total * 100), half up. A total of zero yields 0 rather
/// than a division fault.
fn percentage(count: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_percentages() {
        let dist = BiasDistribution::aggregate([
            BiasLabel::Left,
            BiasLabel::Left,
            BiasLabel::Center,
            BiasLabel::Right,
        ]);
        assert_eq!(dist.left, 2);
        assert_eq!(dist.center, 1);
        assert_eq!(dist.right, 1);
        assert_eq!(dist.left_pct, 50);
        assert_eq!(dist.center_pct, 25);
        assert_eq!(dist.right_pct, 25);
    }

    #[test]
    fn empty_set_is_all_zeros() {
        let dist = BiasDistribution::aggregate([]);
        assert_eq!(dist, BiasDistribution::default());
    }

    #[test]
    fn rounds_half_up() {
        // 1/8 = 12.5% -> 13, 7/8 = 87.5% -> 88
        let mut labels = vec![BiasLabel::Left];
        labels.extend(std::iter::repeat(BiasLabel::Right).take(7));
        let dist = BiasDistribution::aggregate(labels);
        assert_eq!(dist.left_pct, 13);
        assert_eq!(dist.right_pct, 88);
    }

    #[test]
    fn percentage_sum_stays_near_100() {
        // Rounding may drift the sum to 99..=101 but never further, and
        // counts always sum exactly.
        for (l, c, r) in [(1, 1, 1), (2, 1, 1), (1, 2, 4), (0, 0, 5), (3, 3, 1)] {
            let mut labels = Vec::new();
            labels.extend(std::iter::repeat(BiasLabel::Left).take(l));
            labels.extend(std::iter::repeat(BiasLabel::Center).take(c));
            labels.extend(std::iter::repeat(BiasLabel::Right).take(r));
            let dist = BiasDistribution::aggregate(labels);

            assert_eq!(dist.total(), (l + c + r) as i64);
            let pct_sum = dist.left_pct + dist.center_pct + dist.right_pct;
            assert!((99..=101).contains(&pct_sum), "sum was {pct_sum}");
            for pct in [dist.left_pct, dist.center_pct, dist.right_pct] {
                assert!((0..=100).contains(&pct));
            }
        }
    }
}

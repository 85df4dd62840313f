use chrono::{TimeZone, Utc};

use crate::models::{Article, BiasLabel};

/// Canned article set served when the backing store is unreachable, so the
/// public read paths degrade to stale-but-valid content instead of a 500.
/// Constructed explicitly and injected into the query layer; tests swap in
/// their own instance.
#[derive(Debug, Clone)]
pub struct SampleArticles {
    articles: Vec<Article>,
}

impl SampleArticles {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// The built-in five-article sample set.
    pub fn builtin() -> Self {
        let entries: [(&str, &str, &str, &str, (i32, u32, u32), &str, BiasLabel, f64, &str, bool, bool); 5] = [
            (
                "sample1",
                "Tech Innovation Drives Market Growth",
                "https://example.com/tech-innovation",
                "Technology companies continue to lead market growth with innovative solutions \
                 across various sectors. The integration of AI and machine learning has \
                 revolutionized how businesses operate, leading to increased efficiency and \
                 customer satisfaction.",
                (2025, 1, 15),
                "Tech Today",
                BiasLabel::Center,
                0.75,
                "https://via.placeholder.com/400x300/0066cc/ffffff?text=Tech+Innovation",
                false,
                true,
            ),
            (
                "sample2",
                "Economic Policies Show Positive Results",
                "https://example.com/economic-policies",
                "Recent economic policies implemented by the government have shown promising \
                 results in reducing unemployment and boosting consumer confidence. Experts \
                 believe these measures will continue to strengthen the economy in the coming \
                 quarters.",
                (2025, 1, 14),
                "Economic Times",
                BiasLabel::Right,
                0.68,
                "https://via.placeholder.com/400x300/cc6600/ffffff?text=Economic+Growth",
                true,
                false,
            ),
            (
                "sample3",
                "Climate Action Urgently Needed",
                "https://example.com/climate-action",
                "Environmental scientists warn that immediate action is required to address \
                 climate change. New research shows that without significant policy changes, \
                 global temperatures could rise beyond critical thresholds within the next \
                 decade.",
                (2025, 1, 13),
                "Green Planet News",
                BiasLabel::Left,
                0.82,
                "https://via.placeholder.com/400x300/009900/ffffff?text=Climate+Action",
                true,
                true,
            ),
            (
                "sample4",
                "Healthcare Innovations Transform Patient Care",
                "https://example.com/healthcare-innovations",
                "Revolutionary healthcare technologies are transforming patient care with \
                 telemedicine, AI diagnostics, and personalized treatment plans. Hospitals \
                 report improved patient outcomes and reduced costs.",
                (2025, 1, 12),
                "Medical Weekly",
                BiasLabel::Center,
                0.79,
                "https://via.placeholder.com/400x300/cc0066/ffffff?text=Healthcare+Tech",
                false,
                true,
            ),
            (
                "sample5",
                "Education Reform Sparks Debate",
                "https://example.com/education-reform",
                "Proposed education reforms have sparked intense debate among educators, \
                 parents, and policymakers. While supporters argue for modernization, critics \
                 worry about funding and implementation challenges.",
                (2025, 1, 11),
                "Education Today",
                BiasLabel::Left,
                0.71,
                "https://via.placeholder.com/400x300/6600cc/ffffff?text=Education+Reform",
                true,
                false,
            ),
        ];

        let articles = entries
            .into_iter()
            .map(
                |(
                    id,
                    title,
                    url,
                    content,
                    (y, m, d),
                    publication,
                    bias,
                    score,
                    image_url,
                    has_perspectives,
                    is_categorized,
                )| {
                    let date = Utc
                        .with_ymd_and_hms(y, m, d, 0, 0, 0)
                        .single()
                        .unwrap_or_else(Utc::now);
                    Article {
                        id: id.to_string(),
                        title: title.to_string(),
                        url: url.to_string(),
                        content: content.to_string(),
                        date,
                        publication: publication.to_string(),
                        bias,
                        score,
                        image_url: Some(image_url.to_string()),
                        has_perspectives,
                        is_categorized,
                        created_at: date,
                        updated_at: date,
                    }
                },
            )
            .collect();

        Self { articles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_set_has_five_dated_articles() {
        let samples = SampleArticles::builtin();
        assert_eq!(samples.articles().len(), 5);
        // Already newest-first, matching the listing sort
        let dates: Vec<_> = samples.articles().iter().map(|a| a.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }
}

pub mod bias;
pub mod fallback;
pub mod query;
pub mod resolver;
pub mod shaper;

pub use bias::BiasDistribution;
pub use fallback::SampleArticles;
pub use query::{ArticleQuery, CategoryQuery, CategoryView, Page, PageOf};
pub use resolver::{Ownership, RelatedArticles, Resolver};

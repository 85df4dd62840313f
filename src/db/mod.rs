mod repository;
mod schema;

pub use repository::{ArticleOrder, BiasStat, Repository};

pub mod catalog;
pub mod movie_info;
pub mod providers;
pub mod recommendations;
pub mod sentiment;
pub mod similarity;

pub use catalog::CatalogStore;
pub use movie_info::MovieInfoService;
pub use recommendations::{Recommender, RecommenderOptions, ScoredEntry};
pub use similarity::SimilarityIndex;

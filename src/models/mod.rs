pub mod app;
pub mod keyword;
pub mod platform;

pub use app::{AppMetadata, SimilarApp};
pub use keyword::{
    CompetitionLevel, KeywordResult, KeywordScore, Recommendation, TrafficLevel,
};
pub use platform::Platform;

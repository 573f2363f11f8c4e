pub mod assistant;
pub mod domain;
pub mod ports;
pub mod recommendations;
pub mod summary;

pub use domain::{
    AnalysisResult, AnalysisSession, AuthSession, Emotion, NewAnalysis, NewReview, Review,
    ReviewWithAuthor, User, UserCredentials,
};
pub use ports::{AnalysisService, AuthSessionStore, PortError, PortResult, StorageService};
pub use recommendations::Recommendation;
pub use summary::{summarize, HistorySummary};

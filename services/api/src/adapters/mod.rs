pub mod analysis;
pub mod db;
pub mod memory;

pub use analysis::RandomAnalysisAdapter;
pub use db::PgStorage;
pub use memory::MemoryStorage;

pub mod catalog;
pub mod matcher;

pub use catalog::SymptomCatalog;
pub use matcher::SymptomMatcher;

pub mod loaders;
pub mod page_count;
pub mod resolution;

pub use loaders::{load_book_list, BookEntry, BookList};
pub use page_count::ValidPageRange;
pub use resolution::{ResolutionRequest, StrategyKind};

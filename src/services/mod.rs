pub mod merger;
pub mod page_extractor;
pub mod query_builder;
pub mod renderer;
pub mod resolver;
pub mod search_provider;

pub use merger::{MergeReport, PdfMerger};
pub use page_extractor::{PageExtractor, PageSelection};
pub use query_builder::QueryBuilder;
pub use renderer::{BrowserRenderer, Renderer};
pub use resolver::Resolver;
pub use search_provider::{DuckDuckGoProvider, SearchProvider};

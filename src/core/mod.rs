pub mod cache;
pub mod exporter;
pub mod fetcher;
pub mod importer;
pub mod scanner;
pub mod tagger;
pub mod template;

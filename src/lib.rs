pub mod analyzers;
pub mod chart;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod mappings;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod stats;
pub mod table;

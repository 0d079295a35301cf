pub mod aggregator;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod prices;
pub mod ranking;
pub mod rates;
pub mod scoring;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;

pub use aggregator::Aggregator;
pub use extractor::RecordExtractor;
pub use pipeline::{DividendPipeline, PipelineContext, PipelineSettings};
pub use prices::PriceLookup;
pub use ranking::RankSelector;
pub use rates::RateResolver;
pub use scoring::ScoreEngine;

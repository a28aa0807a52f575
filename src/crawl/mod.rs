//! Crawl engine: frontier, quota pacing, failure recovery and the two-phase
//! traversal that ties them together.

pub mod controller;
pub mod frontier;
pub mod pacer;
pub mod recovery;

pub use controller::{CrawlLimits, CrawlOutcome, CrawlReport, Crawler, Phase, SkippedNode};
pub use frontier::Frontier;
pub use pacer::RatePacer;
pub use recovery::{classify, SkipReason, StepError};

pub mod config;
pub mod crawl;
pub mod entity;
pub mod error;
pub mod graph;
pub mod platform;

pub use config::Config;
pub use crawl::{CrawlLimits, CrawlOutcome, CrawlReport, Crawler};
pub use entity::{Entity, EntityKind, EntityRef, RelationClass};
pub use error::{FoafhubError, Result};
pub use graph::{write_ntriples, write_rdfxml, Graph, Vocabulary};
pub use platform::{Connector, GitHubConnector, Platform, Quota};

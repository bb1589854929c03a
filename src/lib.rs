pub use api::SegmentSource;
pub use client::VlrClient;
pub use config::ClientConfig;
pub use dashboard::{Dashboard, FetchOutcome, Panel};
pub use error::{ErrorKind, Result, VlrError};
pub use flag::{resolve as resolve_flag, FlagGlyph};
pub use model::*;
pub use normalize::{to_matches, to_standings, to_tournaments};
pub use standings::{dedupe, ScoreLine};

pub mod api;
mod client;
pub mod config;
pub mod dashboard;
mod error;
pub mod flag;
mod model;
pub mod normalize;
pub mod standings;
pub mod view;

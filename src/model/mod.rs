mod matchlist;
mod segment;
mod standings;
mod tournament;

pub use matchlist::*;
pub use segment::*;
pub use standings::*;
pub use tournament::*;

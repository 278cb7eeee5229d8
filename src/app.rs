//! Application module: the `App` model driven by the runtime and drawn by
//! the UI, plus the notices it raises.

mod model;
mod notice;

pub use model::*;
pub use notice::{Notice, NoticeLevel, Notices};

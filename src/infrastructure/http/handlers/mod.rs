//! HTTP Handlers

mod build;
mod ping;
mod scan;
mod session;

pub use build::*;
pub use ping::*;
pub use scan::*;
pub use session::*;

//! Chrome DevTools Protocol implementation of the perfscope session traits.
//!
//! Attaches to an already-running browser; it never launches or kills one.

mod cdp_session;
mod error;
mod lcp_feed;
mod navigation;
mod scripts;

pub use cdp_session::{CdpConnector, CdpPageSession};
pub use error::{Error, Result};

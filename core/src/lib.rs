//! Navigation authorization for the clinic console.
//!
//! This crate owns the decision logic: where sessions come from, which routes
//! exist, whether an attempt may proceed, and how a decision turns into an
//! actual move plus a user-visible notice.
//!
//! ```text
//! SessionProvider ─┐
//!                  ├─> Gateway::evaluate ─> Decision ─> Navigator ─> (route, notices)
//! RouteTable ──────┘
//! ```

pub mod gateway;
pub mod navigator;
pub mod notices;
mod persist;
pub mod route_table;
pub mod session_store;

pub use gateway::{GUARD_ORDER, Gateway, Guard, decide};
pub use navigator::{Hop, HopCause, MAX_REDIRECTS, Navigation, NavigationError, Navigator};
pub use notices::{NoticeQueue, NoticeSink};
pub use route_table::{RouteTable, RouteTableBuilder, RouteTableError, WILDCARD_PATH};
pub use session_store::{
    FileSessionStore, MemorySessionStore, SessionProvider, SessionStoreError, SessionWriter,
};

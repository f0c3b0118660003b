//! Core domain types for the clinic console's navigation gateway.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod decision;
mod notice;
mod route;
mod session;

pub use decision::{
    DenialReason, Decision, HOME_PATH, LOGIN_PATH, NavigationAttempt, Outcome,
};
pub use notice::{Notice, NoticeLevel};
pub use route::{Access, RouteDescriptor, RoutePath, RoutePathError};
pub use session::{
    ADMINISTRATOR_LABEL, ADMINISTRATOR_LABEL_EN, AdminLabels, EmptyAdminLabelsError,
    EmptyTokenError, Role, Session, SessionToken,
};

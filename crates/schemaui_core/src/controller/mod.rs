//! Root application controller.
//!
//! # Responsibility
//! - Model page navigation as a state machine over `PageState`
//!   (`LOADING -> HOME | PROJECT | MODEL`, `HOME -> PROJECT`,
//!   `PROJECT <-> MODEL`).
//! - Route every mutation through `reduce` so state changes stay pure and
//!   side effects live in one post-update hook.

mod action;
mod app;
mod clock;
mod expiry;

pub use action::{landing_page, reduce, Action};
pub use app::{AppController, AppView, PageView, HAS_LEFT_HOME_FLAG};
pub use clock::{Clock, SystemClock};

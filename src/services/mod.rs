//! External service integration module
//!
//! This module contains the notification presenters that render timer
//! snapshots for the user.

pub mod notification;

// Re-export main types
pub use notification::{CommandPresenter, LogPresenter, NotificationPresenter};

//! Navigation logic for dirserve.
//!
//! This module contains the back/forward [`history::History`] and the
//! [`session::NavigationSession`] view-model that drives a listing view.

pub mod history;
pub mod session;

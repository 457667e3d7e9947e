//! Client-side state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the authenticated identity shared by the HTTP pipeline and
//! the route guard.

pub mod session;

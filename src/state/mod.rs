//! Client-side session state.
//!
//! DESIGN
//! ======
//! State is an explicitly owned value handed to whatever drives the UI, not
//! a global. Flows take `&mut self`, so a single owner mutates the session
//! at a time and every read observes a consistent user/token pair.

pub mod auth;

//! # orbe-client
//!
//! Session and API layer for the ORBE membership platform. Talks to the
//! Django REST backend, which owns all business rules and authorization.
//!
//! This crate contains the REST client and its response envelope (`net`),
//! the session store that tracks the logged-in member (`state`), the route
//! table and navigation guard (`router`), and environment-driven client
//! configuration (`config`). The `orbe` binary drives these natively.

pub mod config;
pub mod net;
pub mod router;
pub mod state;

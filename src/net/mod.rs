//! Network layer: backend REST client and the seams it depends on.
//!
//! DESIGN
//! ======
//! `api::ApiClient` is the only component that talks to the backend. It
//! reaches the outside world through three traits so the rest of the crate
//! can be exercised without a network or a browser:
//!
//! - `transport::HttpTransport` sends one HTTP request (reqwest in production).
//! - `storage::TokenStorage` persists the bearer token across runs.
//! - `navigator::Navigator` performs the hard redirect on session expiry.

pub mod api;
pub mod base_url;
pub mod envelope;
pub mod navigator;
pub mod storage;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

//! Provider clients: thin adapters from upstream HTTP APIs to [`Dataset`]s.
//!
//! Each module wraps one upstream source. Clients hold a shared
//! `reqwest::Client` plus a base URL, perform exactly one request per
//! operation (plus lookups the upstream API itself forces), and map the
//! payload into an explicit dataset shape. No retries, no caching, no rate
//! limiting here.
//!
//! [`Dataset`]: crate::dataset::Dataset

mod convert;
mod http;

pub mod fmarket;
pub mod gold;
pub mod msn;
pub mod tcbs;
pub mod vcb;
pub mod vci;

pub use fmarket::FmarketClient;
pub use gold::GoldClient;
pub use msn::MsnClient;
pub use tcbs::TcbsClient;
pub use vcb::VcbClient;
pub use vci::VciClient;

//! Adapters plugging a verification session into real collaborators
//!
//! - [`HttpVerificationGateway`] talks to the OTP API over HTTP
//! - [`FilePendingIdentityStore`] keeps the pending address across restarts
//! - [`ChannelNavigator`] and [`TracingNotifier`] hand redirects and toasts
//!   to the embedding application

pub mod http_gateway;
pub mod pending_store;
pub mod sinks;

pub use http_gateway::HttpVerificationGateway;
pub use pending_store::{FilePendingIdentityStore, MemoryPendingIdentityStore};
pub use sinks::{ChannelNavigator, TracingNotifier};

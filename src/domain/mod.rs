//! x402 wire types and the pure rules applied to them.

pub mod discovery;
pub mod network;
pub mod payment;

pub use discovery::{DiscoveryResource, DiscoveryResponse, ListDiscoveryRequest, ResourceFilter};
pub use payment::{
    PaymentError, PaymentPayload, PaymentRequiredResponse, PaymentRequirements, SettleResponse,
};

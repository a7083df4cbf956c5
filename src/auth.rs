//! Application access tickets and the client-credentials auth client.

pub mod client;
pub mod shopper;
pub mod ticket;

mod metrics;
mod wire;

pub use client::*;
pub use metrics::*;
pub use shopper::*;
pub use ticket::*;
pub use wire::{GrantKind, TokenEndpoint};

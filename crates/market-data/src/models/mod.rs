//! Data models for the market data crate.

mod index;
mod instrument;
mod quote;
mod types;

pub use index::MarketIndex;
pub use instrument::{Instrument, InstrumentKind};
pub use quote::Quote;
pub use types::{Currency, ProviderId};

//! FX module - currency conversion built on quote providers.

mod fx_service;
mod fx_traits;

pub use fx_service::FxService;
pub use fx_traits::FxServiceTrait;

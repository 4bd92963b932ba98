pub mod common;
pub mod copy;
pub mod entitlement;
pub mod listing;

pub use common::*;
pub use copy::*;
pub use entitlement::*;
pub use listing::*;

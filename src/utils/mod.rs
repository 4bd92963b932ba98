pub mod fnv;
pub mod jwt;
pub mod phone;

pub use fnv::fnv1a64;
pub use jwt::*;
pub use phone::*;

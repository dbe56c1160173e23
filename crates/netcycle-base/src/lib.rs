#![forbid(unsafe_code)]
pub const ABI_VERSION: u32 = 1;

mod error;
mod netif;

pub use error::*;
pub use netif::*;

#![forbid(unsafe_code)]

pub mod netif;
pub mod tool;

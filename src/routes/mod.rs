pub use contact::error_chain_fmt;

pub mod contact;
pub mod fallback;
pub mod health_check;

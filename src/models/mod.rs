pub mod proxy;
pub mod wallet;

pub use proxy::*;
pub use wallet::*;

mod currency;
mod error;
mod factor;
mod money;
mod rounding;
mod units;
mod wallet;

pub use currency::*;
pub use error::*;
pub use factor::*;
pub use money::*;
pub use rounding::*;
pub use units::*;
pub use wallet::*;

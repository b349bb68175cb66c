pub mod application;
pub mod domain;
pub mod io;

pub use application::{MoneyService, MoneyServiceMap, PaymentServiceMap, ServiceMap};
pub use domain::*;

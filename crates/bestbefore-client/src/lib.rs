pub mod account;
pub mod auth;
pub mod calendar;
pub mod error;
pub mod http;
pub mod photos;
pub mod rooms;

pub use error::{ClientError, Result};
pub use http::{ApiClient, AppCheckProvider};

pub mod driver;
pub mod probe;
pub mod request;
pub mod scenario;

pub use crate::domain::model::{ApiRequest, ApiResponse};
pub use crate::domain::ports::{ApiTransport, ConfigProvider};
pub use crate::utils::error::Result;

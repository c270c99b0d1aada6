mod session_service;
mod weather_service;

pub use session_service::*;
pub use weather_service::*;

mod session_service_fake;
mod session_service_impl;

pub use session_service_fake::*;
pub use session_service_impl::*;

mod session;
mod sponsor;
mod weather;

pub use session::*;
pub use sponsor::*;
pub use weather::*;

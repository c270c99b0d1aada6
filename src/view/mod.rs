mod admin;
mod login;
mod public;
mod router;
mod weather;

pub use admin::*;
pub use login::*;
pub use public::*;
pub use router::*;
pub use weather::*;

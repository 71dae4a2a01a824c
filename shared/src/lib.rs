mod club;
mod event;
mod membership;
mod request;
mod response;
mod user;

pub use club::*;
pub use event::*;
pub use membership::*;
pub use request::*;
pub use response::*;
pub use user::*;

mod authorized_request;
mod config;
mod message;
mod session_key;
mod smart_account;

pub use authorized_request::*;
pub use config::*;
pub use message::*;
pub use session_key::*;
pub use smart_account::*;

mod admin;
mod args;
mod create_account;
mod execution;
mod initialize;
mod ownership;
mod session;

pub use admin::*;
pub use args::*;
pub use create_account::*;
pub use execution::*;
pub use initialize::*;
pub use ownership::*;
pub use session::*;

mod register_session_key;
mod revoke_session_key;

pub use register_session_key::*;
pub use revoke_session_key::*;

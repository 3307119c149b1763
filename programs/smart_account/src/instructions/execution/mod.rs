mod execute_authorized;
mod execute_direct;
mod is_valid_signature;
mod validate_request;

pub use execute_authorized::*;
pub use execute_direct::*;
pub use is_valid_signature::*;
pub use validate_request::*;

//! Exit codes for `schism`. Scripts depend on these; keep them stable.
//!
//! Protocol failures exit with `ProtocolError::exit_code`, which uses the same
//! numbering: 1 bad input, 2 not found, 3 store failure, 4 corrupt object.

pub const SUCCESS: i32 = 0;
pub const USER_ERROR: i32 = 1;
pub const STORE_ERROR: i32 = 3;

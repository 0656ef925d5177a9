//! Domain-based type organization
//!
//! - machine: the status snapshot reported by the brewer
//! - connection: client-side link health derived from poll results

pub mod connection;
pub mod machine;

pub use connection::*;
pub use machine::*;

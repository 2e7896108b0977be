//! Pattern compilation and route resolution.
//!
//! Patterns are compiled once at registration into anchored regexes
//! ([`pattern`]); the table ([`core`]) stores them in registration order and
//! resolves requests with a first-registered-wins scan. Matching is against
//! the whole path - `/home` never matches a request for `/home/42`.

mod core;
mod pattern;

pub use self::core::{MethodSlot, RouteEntry, RouteTable, TableMatch};
pub use self::pattern::{compile, CompiledPattern};

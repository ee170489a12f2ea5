//! Persistence for users, sessions and stories.
//!
//! [`client::DbClient`] talks to Postgres; [`memory::MemoryStore`] keeps the
//! same data in process. Both implement [`store::Store`].

pub mod client;
pub mod memory;
mod record;
pub mod store;
#[cfg(test)]
mod test_util;

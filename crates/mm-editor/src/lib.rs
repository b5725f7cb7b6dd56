pub mod commands;
pub mod linking;
pub mod mutation;
pub mod session;
pub mod store;

pub use commands::CommandStack;
pub use linking::{LinkState, LinkTool};
pub use mutation::{Mutation, Outcome};
pub use session::{SaveStatus, Session, SessionConfig};
pub use store::{DocumentStore, FileStore, MemoryStore, StoredMap};

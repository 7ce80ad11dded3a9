mod store;
pub use store::{
    DEFAULT_SESSION, HISTORY_WINDOW, MemorySessionStore, Message, Role, SessionLease, SessionStore,
};

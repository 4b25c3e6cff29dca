//! Session state and its durable backing store.
//!
//! SYSTEM CONTEXT
//! ==============
//! `state` is the in-memory session shared by the whole client; `store` is
//! the credential that survives restarts. The auth controller keeps them in
//! step; the transport only ever reads the token and erases the store on 401.

pub mod state;
pub mod store;

pub use state::{AuthPhase, Session, SessionView};
pub use store::{FileSessionStore, MemorySessionStore, PersistedCredential, SessionStore, StoreError};

#![forbid(unsafe_code)]

//! Identity-keyed reorderable collections with durable order persistence.
//!
//! # Role in hearth
//! `hearth-sortable` owns the ordered collections behind every dashboard
//! section. It is input-agnostic: the dashboard translates gestures into the
//! calls here, and anything else (tests, a different frontend) can do the
//! same.
//!
//! # Primary responsibilities
//! - **Collection**: an ordered, duplicate-free sequence of items keyed by
//!   stable string ids. Position is never an identity.
//! - **ReorderController**: reconciles a persisted order against the host's
//!   canonical item set at construction, applies identity-keyed moves and
//!   state toggles, and writes every effective mutation through to the
//!   order store synchronously.
//! - **OrderStore**: the durable key→order mapping, with memory and JSON
//!   file backends. Persisted data is a hint, never an authority on item
//!   existence.
//!
//! # Failure philosophy
//! Nothing here retries and nothing here surfaces storage trouble to the
//! interaction path: malformed persisted payloads load as absent, unknown
//! ids are silent no-ops, and a failed write leaves the in-memory
//! collection authoritative for the rest of the session.

pub mod collection;
pub mod controller;
pub mod store;

pub use collection::{Collection, Item};
pub use controller::{CollectionObserver, ReorderController};
pub use store::{
    FORMAT_VERSION, FileStore, MemoryStore, OrderStore, PersistedCollection, PersistedEntry,
    SharedStore, StoreError, shared,
};

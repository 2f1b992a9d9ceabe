//! Wire formats for the upstream metadata API.
//!
//! The API is versioned loosely and its response shape differs between
//! endpoints; the types here absorb that variance so the rest of the
//! crate only ever sees canonical records.

pub mod metadata;

//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and under the `test-support` feature.

pub mod clock;
pub mod doubles;
pub mod favorites_store;
pub mod sleeper;

pub use clock::MutableClock;
pub use doubles::{ScriptedIdentityVerifier, ScriptedProductSource, product, user};
pub use favorites_store::InMemoryFavoritesStore;
pub use sleeper::RecordingSleeper;

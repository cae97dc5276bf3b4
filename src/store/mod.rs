pub mod visited;

pub use visited::{StoreError, VisitedStore};

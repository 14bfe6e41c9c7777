//! Domain layer: entities and draw logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod sampler;
pub mod seed;
pub mod totals;
pub mod tree;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use sampler::{DrawOrder, Sampler, GENERATOR_NAME};
pub use seed::{ResolvedSeed, SeedMode, SeedStrategy};
pub use totals::{TotalEntry, Totals};
pub use tree::{parse_items, CategoryPath, CategoryTree, CountTree, DrawTree, ItemTree};

//! Seeded, without-replacement sampling over a category tree.

use std::fmt;

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{parse_items, CategoryPath, CategoryTree, CountTree, DrawTree, ItemTree};

/// Name of the generator, echoed in reports.
pub const GENERATOR_NAME: &str = "ChaCha8";

/// Order in which drawn items are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawOrder {
    /// Order produced by the random draw
    #[default]
    Selection,
    /// Order of the eligible list, restricted to the drawn subset
    Original,
}

impl fmt::Display for DrawOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOrder::Selection => write!(f, "selection"),
            DrawOrder::Original => write!(f, "original"),
        }
    }
}

/// Sampling context for one run.
///
/// Holds the only generator of the run. It is seeded once and advanced
/// leaf by leaf in traversal order, so the whole draw is a function of the
/// seed and the two input trees.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: ChaCha8Rng,
    order: DrawOrder,
}

impl Sampler {
    pub fn new(seed: u64, order: DrawOrder) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            order,
        }
    }

    /// Draw `count` distinct items from `items`.
    pub fn draw_items(
        &mut self,
        path: &CategoryPath,
        items: &[String],
        count: u32,
    ) -> DomainResult<Vec<String>> {
        let wanted = count as usize;
        if wanted > items.len() {
            return Err(DomainError::OverDraw {
                path: path.clone(),
                requested: count,
                available: items.len(),
            });
        }

        let mut picked = index::sample(&mut self.rng, items.len(), wanted).into_vec();
        if self.order == DrawOrder::Original {
            picked.sort_unstable();
        }
        trace!("draw_items: path={} indices={:?}", path, picked);

        Ok(picked.into_iter().map(|i| items[i].clone()).collect())
    }

    /// Draw every leaf of `counts` from the matching leaf of `items`.
    ///
    /// Zero-count leaves are omitted and categories left empty are dropped.
    /// Subtrees whose counts sum to zero are never looked up in `items`, and
    /// an item list is only validated when a draw is made from it.
    pub fn draw(&mut self, items: &ItemTree, counts: &CountTree) -> DomainResult<DrawTree> {
        let drawn = self.draw_node(items, counts, CategoryPath::root())?;
        Ok(drawn.unwrap_or_else(CategoryTree::empty))
    }

    fn draw_node(
        &mut self,
        items: &ItemTree,
        counts: &CountTree,
        path: CategoryPath,
    ) -> DomainResult<Option<DrawTree>> {
        match counts {
            CategoryTree::Leaf(0) => Ok(None),
            CategoryTree::Leaf(count) => {
                let eligible = match items.get(&path) {
                    Some(CategoryTree::Leaf(raw)) => parse_items(raw, &path)?,
                    Some(CategoryTree::Branch(_)) => return Err(DomainError::NotALeaf { path }),
                    None => return Err(DomainError::MissingItems { path }),
                };
                let drawn = self.draw_items(&path, &eligible, *count)?;
                debug!("drew {} of {} at {}", drawn.len(), eligible.len(), path);
                Ok(Some(CategoryTree::Leaf(drawn)))
            }
            CategoryTree::Branch(children) => {
                if counts.total() == 0 {
                    debug!("skipping {}: nothing requested", path);
                    return Ok(None);
                }
                let mut drawn = Vec::new();
                for (key, child) in children {
                    if let Some(node) = self.draw_node(items, child, path.child(key))? {
                        drawn.push((key.clone(), node));
                    }
                }
                Ok((!drawn.is_empty()).then_some(CategoryTree::Branch(drawn)))
            }
        }
    }
}

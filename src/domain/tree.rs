//! Category trees: the nested competition hierarchy.
//!
//! Both input documents share one shape: a JSON object whose keys are
//! category names and whose leaves are either requested counts or lists of
//! eligible item names. `CategoryTree` makes that shape explicit so that a
//! mismatch is reported with its path instead of silently resolving to nothing.

use std::collections::HashSet;
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use termtree::Tree;

use crate::domain::error::{DomainError, DomainResult};

/// Location of a node, as the list of keys from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryPath(Vec<String>);

impl CategoryPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Path of the child `key` below this one.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Last key, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join(" / "))
        }
    }
}

impl Serialize for CategoryPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Recursive category hierarchy.
///
/// Children keep the key order of the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryTree<L> {
    Branch(Vec<(String, CategoryTree<L>)>),
    Leaf(L),
}

/// Eligible items per leaf category.
///
/// Leaves stay raw JSON: a list is only checked with [`parse_items`] once a
/// draw actually needs it, so unrelated categories may hold anything.
pub type ItemTree = CategoryTree<Value>;

/// Requested number of draws per leaf category.
pub type CountTree = CategoryTree<u32>;

/// Drawn item names per leaf category, in the order the draw policy produced.
pub type DrawTree = CategoryTree<Vec<String>>;

impl<L> CategoryTree<L> {
    /// Branch without children.
    pub fn empty() -> Self {
        CategoryTree::Branch(Vec::new())
    }

    /// True for a branch without children.
    pub fn is_empty(&self) -> bool {
        matches!(self, CategoryTree::Branch(children) if children.is_empty())
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> &[(String, CategoryTree<L>)] {
        match self {
            CategoryTree::Branch(children) => children,
            CategoryTree::Leaf(_) => &[],
        }
    }

    pub fn child(&self, key: &str) -> Option<&CategoryTree<L>> {
        self.children()
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    /// Node at `path`, if every key along it exists.
    pub fn get(&self, path: &CategoryPath) -> Option<&CategoryTree<L>> {
        path.segments()
            .iter()
            .try_fold(self, |node, key| node.child(key))
    }

    /// All leaves in depth-first, document order.
    pub fn leaves(&self) -> Vec<(CategoryPath, &L)> {
        let mut out = Vec::new();
        self.collect_leaves(CategoryPath::root(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, path: CategoryPath, out: &mut Vec<(CategoryPath, &'a L)>) {
        match self {
            CategoryTree::Leaf(value) => out.push((path, value)),
            CategoryTree::Branch(children) => {
                for (key, child) in children {
                    child.collect_leaves(path.child(key), out);
                }
            }
        }
    }

    /// Build a tree from a JSON object; `leaf` parses every non-object value.
    fn from_json_with<F>(value: &Value, path: CategoryPath, leaf: &F) -> DomainResult<Self>
    where
        F: Fn(&Value, &CategoryPath) -> DomainResult<L>,
    {
        match value {
            Value::Object(map) => {
                let mut children = Vec::with_capacity(map.len());
                for (key, child) in map {
                    let child_path = path.child(key);
                    children.push((key.clone(), Self::from_json_with(child, child_path, leaf)?));
                }
                Ok(CategoryTree::Branch(children))
            }
            other => leaf(other, &path).map(CategoryTree::Leaf),
        }
    }
}

impl CategoryTree<u32> {
    /// Parse a requested-counts document.
    pub fn counts_from_json(value: &Value) -> DomainResult<Self> {
        require_root_category(value)?;
        Self::from_json_with(value, CategoryPath::root(), &parse_count)
    }

    /// Sum of all requested counts below (and including) this node.
    pub fn total(&self) -> u64 {
        match self {
            CategoryTree::Leaf(count) => u64::from(*count),
            CategoryTree::Branch(children) => children.iter().map(|(_, c)| c.total()).sum(),
        }
    }
}

impl CategoryTree<Value> {
    /// Read the category structure of an eligible-items document.
    ///
    /// Only the root must be an object; leaves are validated on use.
    pub fn items_from_json(value: &Value) -> DomainResult<Self> {
        require_root_category(value)?;
        Self::from_json_with(value, CategoryPath::root(), &raw_leaf)
    }
}

impl CategoryTree<Vec<String>> {
    /// Render as a terminal tree; leaves list their items numbered.
    pub fn to_termtree(&self, label: &str) -> Tree<String> {
        match self {
            CategoryTree::Leaf(items) => Tree::new(label.to_string()).with_leaves(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Tree::new(format!("{}. {}", i + 1, item))),
            ),
            CategoryTree::Branch(children) => Tree::new(label.to_string()).with_leaves(
                children
                    .iter()
                    .map(|(key, child)| child.to_termtree(key)),
            ),
        }
    }
}

impl<L: Serialize> Serialize for CategoryTree<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryTree::Leaf(value) => value.serialize(serializer),
            CategoryTree::Branch(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (key, child) in children {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
        }
    }
}

fn require_root_category(value: &Value) -> DomainResult<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(DomainError::NotACategory {
            path: CategoryPath::root(),
        })
    }
}

fn raw_leaf(value: &Value, _path: &CategoryPath) -> DomainResult<Value> {
    Ok(value.clone())
}

fn parse_count(value: &Value, path: &CategoryPath) -> DomainResult<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| DomainError::InvalidCount {
            path: path.clone(),
            found: value.to_string(),
        })
}

/// Eligible names of the leaf at `path`; rejects non-lists and duplicates.
pub fn parse_items(value: &Value, path: &CategoryPath) -> DomainResult<Vec<String>> {
    let Value::Array(elements) = value else {
        return Err(DomainError::InvalidItems {
            path: path.clone(),
            message: format!("expected a list of names, found {value}"),
        });
    };

    let mut seen = HashSet::with_capacity(elements.len());
    let mut items = Vec::with_capacity(elements.len());
    for element in elements {
        let Some(name) = element.as_str() else {
            return Err(DomainError::InvalidItems {
                path: path.clone(),
                message: format!("expected a name, found {element}"),
            });
        };
        if !seen.insert(name) {
            return Err(DomainError::DuplicateItem {
                path: path.clone(),
                item: name.to_string(),
            });
        }
        items.push(name.to_string());
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_nested_counts_when_parsing_then_keeps_document_order() {
        let value = json!({
            "Solo": {"Adult": {"Gold": 2, "Bronze": 0}},
            "Pairs": {"Open": {"Senior": 1}}
        });
        let tree = CountTree::counts_from_json(&value).unwrap();

        let keys: Vec<_> = tree.children().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Solo", "Pairs"]);
        assert_eq!(tree.total(), 3);

        let leaves: Vec<String> = tree.leaves().iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(
            leaves,
            vec!["Solo / Adult / Gold", "Solo / Adult / Bronze", "Pairs / Open / Senior"]
        );
    }

    #[test]
    fn given_string_count_when_parsing_then_names_offending_path() {
        let value = json!({"Solo": {"Gold": "two"}});
        let err = CountTree::counts_from_json(&value).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidCount {
                path: CategoryPath::from_segments(["Solo", "Gold"]),
                found: "\"two\"".to_string(),
            }
        );
    }

    #[test]
    fn given_negative_count_when_parsing_then_rejects() {
        let value = json!({"Gold": -1});
        assert!(matches!(
            CountTree::counts_from_json(&value),
            Err(DomainError::InvalidCount { .. })
        ));
    }

    #[test]
    fn given_duplicate_item_when_parsing_leaf_then_rejects() {
        let path = CategoryPath::from_segments(["Gold"]);
        let err = parse_items(&json!(["Tango", "Tango"]), &path).unwrap_err();
        assert!(err.to_string().contains("duplicate item 'Tango'"));
    }

    #[test]
    fn given_non_list_leaf_when_parsing_leaf_then_names_path() {
        let path = CategoryPath::from_segments(["season"]);
        let err = parse_items(&json!("2025-26"), &path).unwrap_err();
        assert!(matches!(err, DomainError::InvalidItems { path: p, .. } if p == path));
    }

    #[test]
    fn given_malformed_leaves_when_reading_items_then_structure_is_kept() {
        let value = json!({"A": ["x"], "Unused": ["Tango", "Tango"], "season": "2025-26"});
        let tree = ItemTree::items_from_json(&value).unwrap();
        assert_eq!(tree.children().len(), 3);
        assert_eq!(tree.child("season"), Some(&CategoryTree::Leaf(json!("2025-26"))));
    }

    #[test]
    fn given_non_object_root_when_parsing_then_rejects() {
        assert_eq!(
            CountTree::counts_from_json(&json!(3)).unwrap_err(),
            DomainError::NotACategory {
                path: CategoryPath::root()
            }
        );
    }

    #[test]
    fn given_path_when_get_then_walks_children() {
        let tree = ItemTree::items_from_json(&json!({"A": {"B": ["x", "y"]}})).unwrap();
        let node = tree.get(&CategoryPath::from_segments(["A", "B"])).unwrap();
        assert_eq!(node, &CategoryTree::Leaf(json!(["x", "y"])));
        assert!(tree.get(&CategoryPath::from_segments(["A", "C"])).is_none());
    }

    #[test]
    fn given_tree_when_serializing_then_preserves_order() {
        let tree = ItemTree::items_from_json(&json!({"Z": ["b", "a"], "A": ["c"]})).unwrap();
        let out = serde_json::to_string(&tree).unwrap();
        assert_eq!(out, r#"{"Z":["b","a"],"A":["c"]}"#);
    }

    #[test]
    fn given_draw_tree_when_rendering_termtree_then_numbers_items() {
        let tree: DrawTree = CategoryTree::Branch(vec![(
            "Gold".to_string(),
            CategoryTree::Leaf(vec!["Tango".to_string(), "Blues".to_string()]),
        )]);
        let rendered = tree.to_termtree("draw").to_string();
        assert!(rendered.contains("Gold"));
        assert!(rendered.contains("1. Tango"));
        assert!(rendered.contains("2. Blues"));
    }
}

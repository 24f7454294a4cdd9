pub mod canonical;
pub mod expand;
pub mod flatten;
pub mod merge;
pub mod node;
pub mod paths;
pub mod validity;

pub use canonical::{canonicalize, CanonicalNode};
pub use expand::{expand_hierarchy, ExpandOptions};
pub use flatten::{extract_all_leaves, flatten_below};
pub use merge::{merge_identifier_paths, MergeOptions};
pub use node::HierarchyNode;
pub use validity::ValiditySet;

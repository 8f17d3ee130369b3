//! Building trees from directories, and reading them back.

mod build;
mod read;

pub use build::{build_tree, default_filter, EntryFilter, TreeBuilder};
pub use read::{list_tree, load_tree_payload, resolve_path, ListOptions, TreeListing};

//! Integration tests for reference tree reconstruction and commit parsing

mod stream_build;
mod tree_structure;

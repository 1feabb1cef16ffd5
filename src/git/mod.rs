pub mod clone;
pub mod history;
pub mod shortstat;
pub mod tree;

pub use clone::clone_repository;
pub use history::{count_insertions, try_count_insertions, WalkStrategy};
pub use shortstat::parse_insertion_count;
pub use tree::{TreeCount, TreeRepo};

// Path Planning algorithms module

pub mod motion_tree;
pub mod objective;
pub mod sst_star;

pub use motion_tree::*;
pub use objective::*;
pub use sst_star::*;

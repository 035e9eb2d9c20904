/// Timeline canvas.
pub mod tech_tree;

//! Catalog types: products, categories, materials.

mod category;
pub mod fixtures;
mod product;

pub use category::*;
pub use product::*;

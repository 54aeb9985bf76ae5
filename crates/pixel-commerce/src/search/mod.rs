//! Catalog filtering, sorting and pagination.

mod criteria;
mod evaluate;
mod pagination;

pub use criteria::*;
pub use evaluate::*;
pub use pagination::*;

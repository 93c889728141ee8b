mod page;
mod params;
mod product;

pub use page::*;
pub use product::*;

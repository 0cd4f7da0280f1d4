pub mod category;
pub mod records;
pub mod sna;
pub mod store;

pub use category::*;
pub use records::*;
pub use sna::*;
pub use store::*;

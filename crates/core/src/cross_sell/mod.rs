//! Cross-sell adoption tracking per client.

pub mod error;
pub mod summary;
pub mod types;


pub use error::CrossSellError;
pub use summary::{AdoptionSummary, ProductAdoption};
pub use types::{CrossSellProduct, CrossSellStatus, ProductStatus};

//! Typed shapes built from NationStates API responses.

mod card;
mod market;
mod nation;
mod sectors;

pub use card::{CardCategory, CardInfo};
pub use market::Market;
pub use nation::NationEconomy;
pub use sectors::SectorsData;

//! GDP breakdown by economic sector.

use serde::Serialize;

use crate::convert;
use crate::error::Result;
use crate::factory::{Buildable, Factory, TagHandler};
use crate::tree::Attributes;
use crate::value::Product;

/// Share of a nation's GDP generated by each sector, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorsData {
    /// Black market activity.
    pub black_market: f64,
    /// Direct government activity.
    pub government: f64,
    /// Privately-owned industry.
    pub private: f64,
    /// State-owned industry.
    pub state_owned: f64,
}

impl SectorsData {
    /// Sum of all sectors; close to 100 for well-formed data.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.black_market + self.government + self.private + self.state_owned
    }
}

impl Buildable for SectorsData {
    const TAG: &'static str = "SECTORS";

    fn factory(attributes: &Attributes) -> Result<Factory> {
        Factory::with_attributes(attributes.clone())
            .on_tag("BLACKMARKET", TagHandler::build("blackMarket", convert::number))?
            .on_tag("GOVERNMENT", TagHandler::build("government", convert::number))?
            .on_tag("INDUSTRY", TagHandler::build("private", convert::number))?
            .on_tag("PUBLIC", TagHandler::build("stateOwned", convert::number))
    }

    fn from_product(product: Product) -> Result<Self> {
        Ok(Self {
            black_market: product.number("blackMarket")?,
            government: product.number("government")?,
            private: product.number("private")?,
            state_owned: product.number("stateOwned")?,
        })
    }
}

pub mod alerts_csv;
pub mod provider;
pub mod yahoo;

pub use provider::PriceBarProvider;
pub use yahoo::YahooChartProvider;

pub mod alert;
pub mod bar;
pub mod contract;

pub use alert::{Alert, OptionKind};
pub use bar::{BarSeries, PriceBar};
pub use contract::RawAlertRecord;

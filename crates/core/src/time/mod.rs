pub mod market;

pub use market::resolve_evaluation_date;

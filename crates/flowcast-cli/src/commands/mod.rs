pub mod forecast;
pub mod stats;

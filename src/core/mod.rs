pub mod campaign;
pub mod combat;
pub mod logging;
pub mod rollup;
pub mod tracker;

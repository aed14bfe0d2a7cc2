pub mod common;
pub mod instances;
pub mod run;
pub mod state;
pub mod sync;
pub mod wake;

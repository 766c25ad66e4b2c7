mod cohort;

pub use cohort::*;

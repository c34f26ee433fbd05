pub mod interrupt;
pub mod workflow;

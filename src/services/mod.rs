pub mod processor;
pub mod synthetic;

pub use processor::BatchProcessor;

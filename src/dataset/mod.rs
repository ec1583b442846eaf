pub mod binder;
pub mod sample;

pub use binder::{ColumnDescriptor, DatasetBinder};
pub use sample::{write_sample_dataset, SAMPLE_ROW_COUNT};

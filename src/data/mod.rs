//! Data module - table loading and reshaping

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{
    columns, format_percentage_label, CategoryCount, CrossTab, DataProcessor, LabeledValue,
    PairedRow, ProcessorError, StackedBars,
};

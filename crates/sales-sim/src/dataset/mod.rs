pub mod catalog;
pub mod domain;
mod generator;
pub mod sampling;

pub use domain::{
    Account, Activity, Opportunity, Product, SalesDataset, SalesRep, Stage, Territory,
};
pub use generator::{DatasetCounts, GeneratorError, SalesDataGenerator};

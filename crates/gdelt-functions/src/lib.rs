//! Function catalog: named analytic functions, their parameters, and plotting.

mod catalog;
mod definitions;
mod function;

pub use catalog::FunctionCatalog;
pub use definitions::builtin_catalog;
pub use function::{AnalyticFunction, ParamRule, PlotFunction};
pub use gdelt_types::FunctionError;

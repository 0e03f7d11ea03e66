pub use bvh_adaptor::BvhNodeAdaptor;
pub use bvh_build::SplitAxis;
pub use bvh_config::BvhConfig;
pub use bvh_error::BvhError;
pub use bvh_optimize::BvhRotation;
pub use bvh_tree::{Bvh, BvhNode, BvhNodeContent, BvhNodeId};

mod bvh_adaptor;
mod bvh_build;
mod bvh_config;
mod bvh_error;
mod bvh_insert;
mod bvh_optimize;
mod bvh_queries;
mod bvh_refit;
mod bvh_remove;
mod bvh_tree;
mod bvh_validation;

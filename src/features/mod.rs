//! Feature engineering: fitted schema, matrix representation, and the
//! loan-table -> feature-matrix transform

mod builder;
mod matrix;
mod schema;

pub use builder::build_features;
pub use matrix::FeatureMatrix;
pub use schema::{FeatureSchema, ImputationParams, BASE_COLUMNS, COUNTRY_PREFIX};

pub mod dataset;
pub mod measurement;
pub mod normalize;
pub mod time_features;

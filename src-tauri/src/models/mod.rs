pub mod analysis_types;
pub mod selection_types;

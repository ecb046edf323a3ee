pub mod controller;
pub mod dom;
pub mod render;

pub use controller::{Propagation, UiMode, UploadWidget};
pub use dom::{DomState, PatchBuffer, Target, View, ViewPatch};

//! Output handling: naming of cut files and serving finished videos

pub mod namer;
pub mod resource;

pub use namer::{OutputNamer, OutputSlot};
pub use resource::VideoResource;

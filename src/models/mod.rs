pub mod output_size;
pub mod serde_str;
pub mod settings;

pub use output_size::{OutputSize, SizeRequest, MAX_EDGE, MIN_EDGE};
pub use settings::{CropAspect, CropSettings, Settings, MAX_EXPORT_SCALE};

pub mod convert_pipeline;
pub mod file_watcher;
pub mod report;
pub mod session;
pub mod tile_validator;

pub use convert_pipeline::ConvertPipeline;
pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use report::{Report, ReportBuilder, REPORT_VERSION};
pub use session::{RenderOutcome, RenderOutput, RenderSession, RunState};
pub use tile_validator::{TileValidator, Validation};

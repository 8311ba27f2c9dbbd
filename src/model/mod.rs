pub mod frame_stack;
pub mod loader;
pub mod metadata;
pub mod session;

pub use frame_stack::FrameStack;
pub use loader::load_frame_stack;
pub use metadata::{read_metadata, StudyMetadata};
pub use session::{ConvertBlocker, FileJob, FileStatus, Session};

mod file;
mod section;
mod user;

pub use file::{FileId, FileProgress, FileRecord, FileRow, merge_rows};
pub use section::Section;
pub use user::{UserSession, YearError, YearOfStudy};

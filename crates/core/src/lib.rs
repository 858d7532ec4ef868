#![forbid(unsafe_code)]

pub mod model;

pub use model::{
    FileId, FileProgress, FileRecord, FileRow, Section, UserSession, YearError, YearOfStudy,
    merge_rows,
};

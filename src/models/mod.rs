pub mod attachment;
pub mod submission;

pub use attachment::Attachment;
pub use submission::Submission;

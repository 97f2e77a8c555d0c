pub mod submission;
pub mod record;

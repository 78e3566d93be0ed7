pub mod jobs;
pub mod options;
pub mod reports;
pub mod upload;

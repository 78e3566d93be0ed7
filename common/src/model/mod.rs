pub mod options;
pub mod results;
pub mod submission;

pub mod retention;
pub mod state;

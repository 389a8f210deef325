pub mod import;
pub mod list;
pub mod practice;
pub mod story;

pub mod ai;
pub mod api;
pub mod cli;
pub mod core;
pub mod grading;
pub mod lecture;
pub mod openai;
pub mod report;

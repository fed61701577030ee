pub mod config;
pub mod problems;
pub mod session;

pub use config::AppConfig;
pub use problems::{Problem, ProblemCatalog};
pub use session::{Page, SessionView, TutorSession};

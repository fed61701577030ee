mod router;
pub mod public;

pub use router::{router, session_router};

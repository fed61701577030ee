pub mod evaluator;
pub mod tutor;

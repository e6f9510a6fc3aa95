pub mod heuristic;
pub mod optimal;

pub use heuristic::{HeuristicAligner, Step};
pub use optimal::{AlignVariant, DpMatrix, OptimalAligner};

#![warn(clippy::pedantic)]
#![allow(
    clippy::too_many_lines,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

pub mod cfop;
pub mod session_stats;
pub mod solve_stats;

pub use cfop::{AnalysisError, CfopAnalysis, CfopPhase, analyze_cfop, analyze_solve};

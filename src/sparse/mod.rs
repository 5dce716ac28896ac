//! Sparse coding
//!
//! [`lars`] codes one target against a dictionary; [`EnsembleSolver`] repeats
//! it over random projections and votes for the dominant atom.

pub mod ensemble;
pub mod lars;

pub use ensemble::{tally_votes, EnsembleSolver, EnsembleVote, SolverConfig};
pub use lars::{lars, LarsParams, LarsSolution};

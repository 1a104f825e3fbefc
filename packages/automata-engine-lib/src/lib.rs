pub mod automaton;
pub mod config;
pub mod execution;
pub mod logger;
pub mod regex;
pub mod validation;

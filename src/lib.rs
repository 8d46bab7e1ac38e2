pub mod action;
pub mod cli;
pub mod display;
pub mod error;
pub mod player;
pub mod regret;
pub mod strategy;
pub mod trainer;

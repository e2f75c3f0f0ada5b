// src/handlers/mod.rs

pub mod admin;
pub mod employee;
pub mod evaluation;
pub mod leaderboard;
pub mod questions;
pub mod report;

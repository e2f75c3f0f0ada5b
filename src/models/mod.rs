// src/models/mod.rs

pub mod employee;
pub mod evaluation;
pub mod question;

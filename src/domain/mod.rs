// src/domain/mod.rs

pub mod answer_rules;
pub mod grading;
pub mod ownership;

//! Main module for calcparse library functionality

pub mod config;
pub mod diagnostics;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod processor;

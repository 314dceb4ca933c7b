//! CLI infrastructure for the Twixt toolkit
//!
//! This module provides the command-line interface for playing, training and
//! evaluating agents.

pub mod commands;
pub mod config;
pub mod output;
pub mod render;

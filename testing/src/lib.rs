//! # Devconnect Testing
//!
//! Ergonomic testing utilities for devconnect reducers.
//!
//! The main entry point is [`ReducerTest`], a fluent Given-When-Then harness
//! for exercising a reducer against one action and asserting on the
//! resulting state and effects.

pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

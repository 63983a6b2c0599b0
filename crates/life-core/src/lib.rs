//! Simulation state, undo history, and real-time control for the Life
//! simulation.
//!
//! This crate owns the only mutable state in the workspace: the current
//! grid, the generation counter, the running flag, and the history of
//! past grids. The grid math itself lives in `life-grid`.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `life-config.yaml` into
//!   strongly-typed structs.
//! - [`controller`] -- [`SimulationController`], the async façade that
//!   owns the autoplay timer and broadcasts generation summaries.
//! - [`cycle`] -- [`CycleDetector`] for still lifes and oscillators.
//! - [`history`] -- Bounded undo history of previous grids.
//! - [`pattern`] -- The selected [`DisplayPattern`].
//! - [`runner`] -- Headless runs with generation, time, extinction, and
//!   stagnation limits.
//! - [`simulation`] -- The synchronous [`Simulation`] state machine.
//!
//! [`SimulationController`]: controller::SimulationController
//! [`CycleDetector`]: cycle::CycleDetector
//! [`DisplayPattern`]: pattern::DisplayPattern
//! [`Simulation`]: simulation::Simulation

pub mod config;
pub mod controller;
pub mod cycle;
pub mod history;
pub mod pattern;
pub mod runner;
pub mod simulation;

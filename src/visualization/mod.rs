//! Diagnostic plot rendering.

pub mod plotter;

pub use plotter::VisualizationError;

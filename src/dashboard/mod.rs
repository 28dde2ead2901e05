// Dashboard module for the ICS advisory dashboard
//
// This module organizes the coordinator and its presentation seam:
// - `state`: `DatasetState` and the `Dashboard` view coordinator
// - `view`: presentation-ready view models
// - `presenter`: adapters that receive each published view

pub mod presenter;
pub mod state;
pub mod view;

pub use presenter::{ViewSnapshot, render_json, render_text};
pub use state::{Dashboard, LoadOutcome};

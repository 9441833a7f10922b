//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes snapshots of the *core* state and turns them into cells
//! on the terminal.  Nothing here mutates the scroll offset.

pub mod ambient;
pub mod carousel_widget;
pub mod headline;
pub mod layout;
pub mod spinner;
pub mod theme;

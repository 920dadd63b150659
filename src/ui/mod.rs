//! UI components for Opalite

pub mod analytics;
pub mod block_renderer;
pub mod editor;
pub mod published;
pub mod sidebar;
pub mod toolbar;

//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw/` - frame layout, header, grid, status bar
//! - `theme.rs` - color themes and presets
//! - `layout.rs` - grid cursor navigation and paging
//! - `level_card.rs` - level card widget and text wrapping

mod draw;
pub mod layout;
pub mod level_card;
pub mod theme;

// Re-export main draw function
pub use draw::draw;

pub use theme::Theme;

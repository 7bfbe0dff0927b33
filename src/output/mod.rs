//! Output formatting for analysis and split results.
//!
//! - [`terminal`] - Coloured panels and tables

mod terminal;

pub use terminal::{
    format_field, group_digits, render_commands, render_error, render_examples, render_info,
    render_split,
};

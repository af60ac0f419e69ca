//! Debug visualization of panel trees.
//!
//! ```ignore
//! use trellis::diagnostics::{format_tree, TreeFormatOptions};
//!
//! println!("{}", format_tree(&dialog.root().borrow(), &TreeFormatOptions::default()));
//! ```

use std::fmt::Write;

use crate::layout::{Child, Panel};

/// Style options for panel tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    Unicode,
    /// Compact single-line representation.
    Compact,
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self::Unicode
    }
}

/// Configuration for panel tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show widget IDs.
    pub show_ids: bool,
    /// Whether to mark hidden children.
    pub show_visibility: bool,
    /// Whether to show explicit grid locations.
    pub show_placements: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_visibility: true,
            show_placements: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_visibility: false,
            show_placements: false,
            ..Default::default()
        }
    }
}

/// Format a panel subtree in a human-readable form, one line per child,
/// showing kind, id, visibility, and explicit placement.
pub fn format_tree(panel: &Panel, options: &TreeFormatOptions) -> String {
    let mut output = String::new();
    write!(output, "panel").expect("write to String");
    if options.show_ids {
        write!(output, " [{}]", panel.id()).expect("write to String");
    }
    if options.show_visibility && !panel.is_visible() {
        output.push_str(" (hidden)");
    }
    output.push('\n');
    format_children(panel, options, 1, &mut output);
    output
}

fn format_children(panel: &Panel, options: &TreeFormatOptions, depth: usize, output: &mut String) {
    if let Some(max) = options.max_depth {
        if depth > max {
            return;
        }
    }
    let children: Vec<&Child> = panel.children().collect();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let prefix = build_prefix(options, depth, i == count - 1);
        output.push_str(&prefix);
        match child {
            Child::Widget(w) => {
                let w = w.borrow();
                output.push_str(w.kind());
                if options.show_ids {
                    write!(output, " [{}]", w.id()).expect("write to String");
                }
                if options.show_placements {
                    if let Some(location) = panel.location_of(w.id()) {
                        write!(output, " {location}").expect("write to String");
                    }
                }
                if options.show_visibility && !w.base().is_visible() {
                    output.push_str(" (hidden)");
                }
                output.push('\n');
            }
            Child::Panel(p) => {
                let p = p.borrow();
                output.push_str("panel");
                if options.show_ids {
                    write!(output, " [{}]", p.id()).expect("write to String");
                }
                if options.show_placements {
                    if let Some(location) = panel.location_of(p.id()) {
                        write!(output, " {location}").expect("write to String");
                    }
                }
                if options.show_visibility && !p.is_visible() {
                    output.push_str(" (hidden)");
                }
                output.push('\n');
                format_children(&p, options, depth + 1, output);
            }
        }
    }
}

/// Build the prefix string for one tree line.
fn build_prefix(options: &TreeFormatOptions, depth: usize, is_last: bool) -> String {
    if depth == 0 {
        return String::new();
    }

    let (branch, corner, last) = match options.style {
        TreeStyle::Ascii => ("|", "+--", "`--"),
        TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
        TreeStyle::Compact => ("", "- ", "- "),
    };

    let mut prefix = String::new();
    for _ in 0..(depth - 1) {
        prefix.push_str(branch);
        for _ in 0..options.indent_size {
            prefix.push(' ');
        }
    }
    prefix.push_str(if is_last { last } else { corner });
    if options.style != TreeStyle::Compact {
        prefix.push(' ');
    }
    prefix
}

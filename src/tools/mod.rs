//! Tool subtrees mounted under the app root.
//!
//! | Tool | Keys | States |
//! |------|------|--------|
//! | `select` | `v`, `1` | idle, brushing, pointing*, translating, resizing, rotatingShapes, pinching |
//! | `box` | `b`, `r`, `2` | idle, pointing, creating |
//! | `ellipse` | `c`, `3` | idle, pointing, creating |
//! | `polygon` | `g`, `4` | idle, pointing, creating |
//! | `draw` | `d`, `p`, `5` | idle, pointing, creating |
//! | `dot` | `t`, `6` | idle, pointing, creating |
//! | `star` | `s`, `7` | idle, pointing, creating |

pub mod box_tool;
pub mod dot_tool;
pub mod draw_tool;
pub mod select;
mod shape_tool;

use crate::state::StateNode;

pub const SELECT: &str = "select";
pub const BOX: &str = "box";
pub const ELLIPSE: &str = "ellipse";
pub const POLYGON: &str = "polygon";
pub const STAR: &str = "star";
pub const DOT: &str = "dot";
pub const DRAW: &str = "draw";

/// A tool's state subtree plus the keys that activate it from anywhere.
#[derive(Debug)]
pub struct Tool {
    pub node: StateNode,
    pub keys: Option<&'static str>,
}

impl Tool {
    #[must_use]
    pub fn new(node: StateNode, keys: Option<&'static str>) -> Self {
        Self { node, keys }
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.node.id()
    }
}

/// The built-in tool set, select first.
#[must_use]
pub fn default_tools() -> Vec<Tool> {
    vec![
        select::tool(),
        box_tool::tool(BOX, "box", "b,r,2"),
        box_tool::tool(ELLIPSE, "ellipse", "c,3"),
        box_tool::tool(POLYGON, "polygon", "g,4"),
        draw_tool::tool(),
        dot_tool::tool(),
        box_tool::tool(STAR, "star", "s,7"),
    ]
}

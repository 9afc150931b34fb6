// SPDX-License-Identifier: GPL-3.0-only

//! Constructors for layout nodes.
//!
//! One constructor per node type, plus [`key_sequence`] for rows of visually
//! identical keys. Constructors never mutate the caller's attribute map:
//! they shallow-copy it, strip the reserved `type` / `id` entries into the
//! node's typed fields, and, for the node types that accept one, overwrite
//! the `icon_class` attribute. When no explicit identifier is supplied the
//! identifier is drawn from the build session's [`IdAllocator`].

use serde_json::Value;

use crate::layout::ids::IdAllocator;
use crate::layout::types::{Attributes, LayoutNode, NodeType, ATTR_ICON_CLASS, ATTR_ID, ATTR_TYPE};

/// Shared constructor routine behind the typed entry points.
fn create(
    node_type: NodeType,
    attrs: &Attributes,
    explicit_id: Option<&str>,
    icon_class: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    let mut attributes = attrs.clone();
    attributes.remove(ATTR_TYPE);
    attributes.remove(ATTR_ID);

    if let Some(class) = icon_class {
        debug_assert!(
            node_type.accepts_icon_class(),
            "icon class passed for a node type that does not accept one"
        );
        attributes.insert(ATTR_ICON_CLASS.to_string(), Value::String(class.to_string()));
    }

    let id = match explicit_id {
        Some(id) => id.to_string(),
        None => ids.next(),
    };

    LayoutNode::new(node_type, id, attributes, children)
}

/// Creates a soft key node.
pub fn soft_key(attrs: &Attributes, id: Option<&str>, ids: &mut IdAllocator) -> LayoutNode {
    create(NodeType::SoftKey, attrs, id, None, Vec::new(), ids)
}

/// Creates a sequence of soft keys sharing one specification.
///
/// Each emitted key routes through the allocator individually, so the keys
/// are attribute-equal but carry distinct identifiers, in request order.
pub fn key_sequence(attrs: &Attributes, count: u32, ids: &mut IdAllocator) -> Vec<LayoutNode> {
    (0..count).map(|_| soft_key(attrs, None, ids)).collect()
}

/// Creates a linear (horizontal) layout node.
pub fn linear_layout(
    attrs: &Attributes,
    id: Option<&str>,
    icon_class: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    create(NodeType::LinearLayout, attrs, id, icon_class, children, ids)
}

/// Creates a vertical layout node.
pub fn vertical_layout(
    attrs: &Attributes,
    id: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    create(NodeType::VerticalLayout, attrs, id, None, children, ids)
}

/// Creates an extended (paging) layout node.
pub fn extended_layout(
    attrs: &Attributes,
    id: Option<&str>,
    icon_class: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    create(NodeType::ExtendedLayout, attrs, id, icon_class, children, ids)
}

/// Creates a handwriting layout node.
pub fn handwriting_layout(
    attrs: &Attributes,
    id: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    create(NodeType::HandwritingLayout, attrs, id, None, children, ids)
}

/// Creates a layout view node.
pub fn layout_view(
    attrs: &Attributes,
    id: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    create(NodeType::LayoutView, attrs, id, None, children, ids)
}

/// Creates a candidate view node.
pub fn candidate_view(
    attrs: &Attributes,
    id: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    create(NodeType::CandidateView, attrs, id, None, children, ids)
}

/// Creates a canvas view node.
pub fn canvas_view(
    attrs: &Attributes,
    id: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    create(NodeType::CanvasView, attrs, id, None, children, ids)
}

/// Creates the keyboard root node.
pub fn keyboard(
    attrs: &Attributes,
    id: Option<&str>,
    children: Vec<LayoutNode>,
    ids: &mut IdAllocator,
) -> LayoutNode {
    create(NodeType::Keyboard, attrs, id, None, children, ids)
}

// ============================================================================
// Tests
// ============================================================================

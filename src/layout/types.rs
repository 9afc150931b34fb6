// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for keyset layout trees.
//!
//! This module defines the node tree produced by the layout builder, the
//! configuration structures it consumes, and the error types shared across
//! the layout subsystem. Nodes are immutable once built: a keyset switch
//! discards the whole tree and builds a fresh one, there is no incremental
//! patching.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::input::StateId;

/// Attribute mapping carried by every layout node.
///
/// Attributes are opaque to this crate beyond the reserved keys below; they
/// are passed through to whatever renders the tree.
pub type Attributes = Map<String, Value>;

/// Reserved attribute key holding a node's type discriminant in raw
/// configuration maps. Stripped into the typed [`LayoutNode`] field at
/// construction time.
pub const ATTR_TYPE: &str = "type";

/// Reserved attribute key for explicit node identifiers. Stripped into the
/// typed [`LayoutNode`] field at construction time.
pub const ATTR_ID: &str = "id";

/// Attribute key for the visual icon class of linear and extended layouts.
pub const ATTR_ICON_CLASS: &str = "icon_class";

/// Attribute key marking a soft key as bound to a modifier state.
pub const ATTR_MODIFIER: &str = "modifier";

/// Attribute key marking a modifier key as supporting sticky (latched) mode.
pub const ATTR_STICKY: &str = "sticky";

// ============================================================================
// Node Types
// ============================================================================

/// Closed enumeration of layout node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// An interactive key
    SoftKey,
    /// A horizontal row of children
    LinearLayout,
    /// A vertical stack of children
    VerticalLayout,
    /// A layout that pages through extended child sets
    ExtendedLayout,
    /// A handwriting input surface
    HandwritingLayout,
    /// The container view hosting the active layout
    LayoutView,
    /// The candidate (suggestion) bar
    CandidateView,
    /// A free-form drawing surface
    CanvasView,
    /// The single root of a built keyset tree
    Keyboard,
}

impl NodeType {
    /// Returns the snake_case discriminant string used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::SoftKey => "soft_key",
            NodeType::LinearLayout => "linear_layout",
            NodeType::VerticalLayout => "vertical_layout",
            NodeType::ExtendedLayout => "extended_layout",
            NodeType::HandwritingLayout => "handwriting_layout",
            NodeType::LayoutView => "layout_view",
            NodeType::CandidateView => "candidate_view",
            NodeType::CanvasView => "canvas_view",
            NodeType::Keyboard => "keyboard",
        }
    }

    /// Parses a discriminant string.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidNodeType`] for an unrecognized string.
    /// With configuration parsed through the typed structures in this module
    /// this is unreachable; hitting it indicates a caller defect.
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        match s {
            "soft_key" => Ok(NodeType::SoftKey),
            "linear_layout" => Ok(NodeType::LinearLayout),
            "vertical_layout" => Ok(NodeType::VerticalLayout),
            "extended_layout" => Ok(NodeType::ExtendedLayout),
            "handwriting_layout" => Ok(NodeType::HandwritingLayout),
            "layout_view" => Ok(NodeType::LayoutView),
            "candidate_view" => Ok(NodeType::CandidateView),
            "canvas_view" => Ok(NodeType::CanvasView),
            "keyboard" => Ok(NodeType::Keyboard),
            other => Err(LayoutError::invalid_node_type(other)),
        }
    }

    /// Whether this node type carries a visual icon class attribute.
    #[must_use]
    pub fn accepts_icon_class(self) -> bool {
        matches!(self, NodeType::LinearLayout | NodeType::ExtendedLayout)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Layout Nodes
// ============================================================================

/// One node of a built keyset tree.
///
/// Nodes are created by the factory functions in [`crate::layout::factory`]
/// and are immutable afterwards. Child ordering is significant: it reflects
/// visual and tab order. The attribute map is copied at construction time,
/// so mutating the configuration that produced a node never alters it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    node_type: NodeType,
    id: String,
    attributes: Attributes,
    children: Vec<LayoutNode>,
}

impl LayoutNode {
    pub(crate) fn new(
        node_type: NodeType,
        id: String,
        attributes: Attributes,
        children: Vec<LayoutNode>,
    ) -> Self {
        Self {
            node_type,
            id,
            attributes,
            children,
        }
    }

    /// The node's type discriminant.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The node's identifier, unique within the build session that produced it.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The node's pass-through attributes.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Looks up a single attribute by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The node's children, in visual order.
    #[must_use]
    pub fn children(&self) -> &[LayoutNode] {
        &self.children
    }

    /// Finds a node by identifier anywhere in this subtree.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&LayoutNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }

    /// Visits this node and all descendants in depth-first pre-order.
    pub fn visit<F: FnMut(&LayoutNode)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Total number of nodes in this subtree, including this node.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(LayoutNode::node_count)
            .sum::<usize>()
    }
}

// ============================================================================
// Keyset Configuration
// ============================================================================

/// A complete keyset definition: one named layout loaded as an atomic unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysetConfig {
    /// Keyset name (e.g. "us_compact")
    pub name: String,

    /// Identifier namespace prefix; defaults to the keyset name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Pass-through attributes for the keyboard root node
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,

    /// Named element groups referenced via `section_ref`
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub sections: HashMap<String, ElementConfig>,

    /// The root element, wrapped in a `keyboard` node by the builder
    pub root: ElementConfig,
}

impl KeysetConfig {
    /// The namespace prefix used for identifier allocation.
    #[must_use]
    pub fn id_prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(&self.name)
    }
}

/// One element of a keyset configuration tree, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementConfig {
    /// A single interactive key
    SoftKey(KeyConfig),
    /// A sequence of visually identical keys
    Repeat(RepeatConfig),
    /// A horizontal row
    LinearLayout(GroupConfig),
    /// A vertical stack
    VerticalLayout(GroupConfig),
    /// A paging layout
    ExtendedLayout(GroupConfig),
    /// A handwriting surface
    HandwritingLayout(GroupConfig),
    /// The layout host view
    LayoutView(GroupConfig),
    /// The candidate bar
    CandidateView(GroupConfig),
    /// A drawing surface
    CanvasView(GroupConfig),
    /// Splice of a named section defined in [`KeysetConfig::sections`]
    SectionRef(SectionRefConfig),
}

/// Configuration for a single soft key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Explicit identifier; allocated from the namespace when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Modifier state this key controls, if it is a modifier key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<StateId>,

    /// Whether the modifier supports sticky (latched) activation.
    /// Only meaningful together with `modifier`.
    #[serde(default)]
    pub sticky: bool,

    /// Arbitrary pass-through attributes consumed downstream by rendering
    #[serde(default, flatten)]
    pub attributes: Attributes,
}

/// A repeat directive: `count` independently identified copies of one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatConfig {
    /// How many keys to emit; must be positive
    pub count: u32,

    /// The shared key specification
    pub key: KeyConfig,
}

/// Configuration shared by all container element kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Explicit identifier; allocated from the namespace when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Visual icon class; honored only by linear and extended layouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_class: Option<String>,

    /// Child elements, in visual order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementConfig>,

    /// Arbitrary pass-through attributes
    #[serde(default, flatten)]
    pub attributes: Attributes,
}

/// Reference to a named section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRefConfig {
    /// Name of the section to splice in
    pub section: String,
}

// ============================================================================
// Validation Types
// ============================================================================

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal issue that prevents the keyset from being built
    Error,
    /// Non-fatal issue that should be addressed
    Warning,
}

/// A validation issue discovered while checking a keyset configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level (Error or Warning)
    pub severity: Severity,
    /// Human-readable description of the issue
    pub message: String,
    /// Path to the field that caused the issue (e.g., "root.children[2]")
    pub field_path: String,
    /// Optional suggestion for how to fix the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to the validation issue.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Whether this issue is fatal.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_str = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };

        write!(f, "[{}] {}: {}", severity_str, self.field_path, self.message)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Result of successfully parsing a keyset with optional warnings.
///
/// The parser is permissive: non-fatal issues are carried here as warnings
/// rather than failing the load.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    /// The successfully parsed configuration
    pub config: T,
    /// Non-fatal validation warnings
    pub warnings: Vec<ValidationIssue>,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result with no warnings.
    pub fn new(config: T) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }

    /// Creates a new parse result with warnings.
    pub fn with_warnings(config: T, warnings: Vec<ValidationIssue>) -> Self {
        Self { config, warnings }
    }

    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the result and returns the configuration, discarding warnings.
    pub fn into_config(self) -> T {
        self.config
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Error type for keyset loading and building.
///
/// Construction-time errors abort the whole build pass rather than producing
/// a partial tree; a keyboard never renders a half-built layout. Variants
/// carry context fields for helpful messages.
#[derive(Debug)]
pub enum LayoutError {
    /// I/O error occurred while reading a keyset file
    Io {
        /// The underlying I/O error
        source: std::io::Error,
        /// Optional file path that caused the error
        file_path: Option<String>,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// JSON parsing error
    Json {
        /// The underlying JSON parsing error
        source: serde_json::Error,
        /// Optional file path being parsed
        file_path: Option<String>,
        /// Line number where the error occurred (from serde_json)
        line_number: Option<usize>,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// Unrecognized node type discriminant, a caller defect
    InvalidNodeType {
        /// The discriminant string that failed to parse
        found: String,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// Malformed keyset configuration; the current build pass is aborted
    /// and any previously built tree stays untouched
    InvalidConfig {
        /// Description of the problem
        message: String,
        /// Path to the offending field (e.g., "root.children[2]")
        field_path: String,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// Circular section reference detected
    CircularReference {
        /// Description of the circular dependency
        message: String,
        /// Chain of references forming the cycle (e.g., "a -> b -> a")
        chain: String,
        /// Optional suggestion for breaking the cycle
        suggestion: Option<String>,
    },

    /// Maximum element nesting depth exceeded
    MaxDepthExceeded {
        /// Description of what exceeded the depth limit
        message: String,
        /// The depth limit that was exceeded
        max_depth: usize,
        /// The actual depth reached
        actual_depth: usize,
        /// Optional suggestion for reducing depth
        suggestion: Option<String>,
    },

    /// Fatal validation errors found while checking a configuration
    Validation {
        /// List of validation issues found
        issues: Vec<ValidationIssue>,
        /// Optional file path being validated
        file_path: Option<String>,
    },

    /// Two nodes in one build session received the same identifier.
    /// Unreachable through allocator-issued ids; indicates an explicit-id
    /// collision or allocator misuse (e.g. interleaved builds under one
    /// namespace).
    DuplicateIdentifier {
        /// The colliding identifier
        id: String,
    },
}

impl LayoutError {
    /// Creates an I/O error with file path context.
    pub fn io_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::Io {
            source,
            file_path: Some(file_path.into()),
            suggestion: Some("Check that the file exists and you have read permissions".into()),
        }
    }

    /// Creates a JSON parsing error.
    pub fn json(source: serde_json::Error) -> Self {
        let line_number = source.line().into();
        Self::Json {
            source,
            file_path: None,
            line_number,
            suggestion: Some("Check the JSON syntax at the indicated line".into()),
        }
    }

    /// Creates a JSON parsing error with file path context.
    pub fn json_with_path(source: serde_json::Error, file_path: impl Into<String>) -> Self {
        let line_number = source.line().into();
        Self::Json {
            source,
            file_path: Some(file_path.into()),
            line_number,
            suggestion: Some("Check the JSON syntax at the indicated line".into()),
        }
    }

    /// Creates an invalid node type error.
    pub fn invalid_node_type(found: impl Into<String>) -> Self {
        Self::InvalidNodeType {
            found: found.into(),
            suggestion: Some("Use one of the recognized node type discriminants".into()),
        }
    }

    /// Creates a configuration error.
    pub fn invalid_config(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to configuration-class errors; no-op for others.
    #[must_use]
    pub fn with_suggestion(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::InvalidConfig { suggestion, .. }
            | Self::InvalidNodeType { suggestion, .. }
            | Self::CircularReference { suggestion, .. } => {
                *suggestion = Some(text.into());
            }
            _ => {}
        }
        self
    }

    /// Creates a circular reference error.
    pub fn circular_reference(message: impl Into<String>, chain: impl Into<String>) -> Self {
        Self::CircularReference {
            message: message.into(),
            chain: chain.into(),
            suggestion: Some("Remove or break the circular section reference".into()),
        }
    }

    /// Creates a max depth exceeded error.
    pub fn max_depth_exceeded(
        message: impl Into<String>,
        max_depth: usize,
        actual_depth: usize,
    ) -> Self {
        Self::MaxDepthExceeded {
            message: message.into(),
            max_depth,
            actual_depth,
            suggestion: Some(format!("Reduce nesting depth to {} or less", max_depth)),
        }
    }

    /// Creates a validation error from a list of issues.
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        Self::Validation {
            issues,
            file_path: None,
        }
    }

    /// Creates a duplicate identifier error.
    pub fn duplicate_identifier(id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier { id: id.into() }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Io {
                source,
                file_path,
                suggestion,
            } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " reading file '{}'", path)?;
                }
                write!(f, ": {}", source)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            LayoutError::Json {
                source,
                file_path,
                line_number,
                suggestion,
            } => {
                write!(f, "JSON parsing error")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                if let Some(line) = line_number {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            LayoutError::InvalidNodeType { found, suggestion } => {
                write!(f, "Unrecognized node type '{}'", found)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            LayoutError::InvalidConfig {
                message,
                field_path,
                suggestion,
            } => {
                write!(
                    f,
                    "Invalid keyset configuration at {}: {}",
                    field_path, message
                )?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            LayoutError::CircularReference {
                message,
                chain,
                suggestion,
            } => {
                write!(f, "Circular reference detected: {}", message)?;
                write!(f, "\n  Reference chain: {}", chain)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            LayoutError::MaxDepthExceeded {
                message,
                max_depth,
                actual_depth,
                suggestion,
            } => {
                write!(
                    f,
                    "Maximum depth exceeded: {} (limit: {}, actual: {})",
                    message, max_depth, actual_depth
                )?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            LayoutError::Validation { issues, file_path } => {
                write!(f, "Validation failed")?;
                if let Some(path) = file_path {
                    write!(f, " for file '{}'", path)?;
                }
                writeln!(f, " with {} issue(s):", issues.len())?;
                for (i, issue) in issues.iter().enumerate() {
                    write!(f, "  {}. {}", i + 1, issue)?;
                    if i < issues.len() - 1 {
                        writeln!(f)?;
                    }
                }
            }
            LayoutError::DuplicateIdentifier { id } => {
                write!(
                    f,
                    "Duplicate identifier '{}' in one build session; explicit ids must be \
                     unique and builds must not interleave under one namespace",
                    id
                )?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Io { source, .. } => Some(source),
            LayoutError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LayoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: err,
            file_path: None,
            suggestion: None,
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err)
    }
}

// ============================================================================
// Tests
// ============================================================================

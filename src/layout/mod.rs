// SPDX-License-Identifier: GPL-3.0-only

//! Keyset layout trees for keyview.
//!
//! This module turns declarative keyset definitions into addressable trees
//! of typed, uniquely identified layout nodes. A keyset loads as one atomic
//! unit: parse the JSON definition, build the tree, hand it to the renderer;
//! switching keysets throws the whole tree away and builds the next one.
//!
//! # Features
//!
//! - **Typed node tree**: [`LayoutNode`] with a closed [`NodeType`]
//!   enumeration, ordered children and pass-through attributes
//! - **Collision-free identifiers**: every node is identified under the
//!   keyset's namespace prefix by an explicit [`IdAllocator`]
//! - **Repeat directives**: sequences of visually identical keys expand to
//!   individually identified nodes
//! - **Named sections**: reusable element groups spliced by reference, with
//!   cycle detection
//! - **Permissive validation**: fatal issues abort the load, shape oddities
//!   surface as warnings with field paths and suggestions
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use keyview::layout::{build_keyset, parse_keyset_file};
//!
//! let result = parse_keyset_file("keysets/us_compact.json")?;
//! for warning in &result.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//!
//! let tree = build_keyset(&result.config)?;
//! println!("built {} nodes under '{}'", tree.node_count(), tree.id());
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`LayoutError`]. Builds fail as a whole:
//! on any error the previous keyset's tree stays untouched and no partial
//! tree escapes.

// Sub-modules
pub mod builder;
pub mod factory;
pub mod ids;
pub mod parser;
pub mod types;
pub mod validation;

// Re-export public API - Error handling types
pub use types::{LayoutError, ParseResult, Severity, ValidationIssue};

// Re-export public API - Parser functions
pub use parser::{parse_keyset_file, parse_keyset_from_string};

// Re-export public API - Data structures
pub use types::{
    Attributes, ElementConfig, GroupConfig, KeyConfig, KeysetConfig, LayoutNode, NodeType,
    RepeatConfig, SectionRefConfig, ATTR_ICON_CLASS, ATTR_ID, ATTR_MODIFIER, ATTR_STICKY,
    ATTR_TYPE,
};

// Re-export public API - Building
pub use builder::{build_keyset, LayoutTreeBuilder, MAX_NESTING_DEPTH};
pub use ids::IdAllocator;
pub use validation::validate_config;

// SPDX-License-Identifier: GPL-3.0-only

//! Keyset tree construction.
//!
//! The builder walks a [`KeysetConfig`] depth-first and produces one rooted
//! `keyboard` node per keyset. Composition order in the configuration is
//! preserved as child order in the tree. A build either completes or fails
//! as a whole: on any error the caller receives no tree at all, so a
//! previously built keyset stays untouched until its replacement is ready.
//!
//! Builds run synchronously to completion on the calling thread. Each
//! builder owns its own [`IdAllocator`], so repeated builds (and builds of
//! different keysets) are isolated from one another.

use serde_json::Value;
use std::collections::HashSet;

use crate::layout::factory;
use crate::layout::ids::IdAllocator;
use crate::layout::types::{
    ElementConfig, GroupConfig, KeyConfig, KeysetConfig, LayoutError, LayoutNode, NodeType,
    ATTR_MODIFIER, ATTR_STICKY,
};

/// Maximum element nesting depth accepted in one keyset configuration.
pub const MAX_NESTING_DEPTH: usize = 16;

/// Builds one keyset tree from its configuration.
///
/// Convenience wrapper around [`LayoutTreeBuilder`].
pub fn build_keyset(config: &KeysetConfig) -> Result<LayoutNode, LayoutError> {
    LayoutTreeBuilder::new(config).build()
}

/// Single-use builder for one keyset tree.
///
/// The builder holds the identifier allocator and the bookkeeping needed to
/// detect duplicate identifiers and circular section references. It is
/// consumed by [`build`](Self::build); construct a fresh builder per build
/// pass.
#[derive(Debug)]
pub struct LayoutTreeBuilder<'a> {
    config: &'a KeysetConfig,
    ids: IdAllocator,
    seen_ids: HashSet<String>,
    section_stack: Vec<String>,
}

impl<'a> LayoutTreeBuilder<'a> {
    /// Creates a builder for `config`, with the identifier namespace taken
    /// from the configuration's prefix (or name).
    #[must_use]
    pub fn new(config: &'a KeysetConfig) -> Self {
        Self {
            config,
            ids: IdAllocator::new(config.id_prefix()),
            seen_ids: HashSet::new(),
            section_stack: Vec::new(),
        }
    }

    /// Runs the build to completion.
    ///
    /// # Errors
    ///
    /// Fails fast on malformed configuration ([`LayoutError::InvalidConfig`]),
    /// circular section references, excessive nesting, and identifier
    /// collisions. No partial tree is ever returned.
    pub fn build(mut self) -> Result<LayoutNode, LayoutError> {
        let config = self.config;
        tracing::debug!(
            keyset = %config.name,
            prefix = %config.id_prefix(),
            "building keyset tree"
        );

        let mut children = Vec::new();
        self.build_into(&config.root, "root", 1, &mut children)?;

        let root = factory::keyboard(
            &config.attributes,
            Some(config.name.as_str()),
            children,
            &mut self.ids,
        );
        self.register_id(root.id())?;

        tracing::debug!(
            keyset = %config.name,
            nodes = root.node_count(),
            "keyset tree built"
        );
        Ok(root)
    }

    /// Builds one configuration element, appending the node(s) it expands to.
    ///
    /// Most elements expand to exactly one node; `repeat` expands to `count`
    /// nodes and `section_ref` to whatever the referenced section expands to.
    fn build_into(
        &mut self,
        element: &'a ElementConfig,
        path: &str,
        depth: usize,
        out: &mut Vec<LayoutNode>,
    ) -> Result<(), LayoutError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(LayoutError::max_depth_exceeded(
                format!("element nesting at {}", path),
                MAX_NESTING_DEPTH,
                depth,
            ));
        }

        match element {
            ElementConfig::SoftKey(key) => {
                let node = self.build_key(key)?;
                out.push(node);
            }
            ElementConfig::Repeat(repeat) => {
                if repeat.count == 0 {
                    return Err(LayoutError::invalid_config(
                        "repeat count must be positive",
                        path,
                    )
                    .with_suggestion("Use a count of 1 or more"));
                }
                // One allocator call per emitted key, not one per group.
                for _ in 0..repeat.count {
                    let node = self.build_key(&repeat.key)?;
                    out.push(node);
                }
            }
            ElementConfig::SectionRef(section_ref) => {
                self.splice_section(&section_ref.section, path, depth, out)?;
            }
            _ => {
                let node = self.build_container(element, path, depth)?;
                out.push(node);
            }
        }
        Ok(())
    }

    /// Splices a named section's expansion in place of the reference.
    fn splice_section(
        &mut self,
        name: &str,
        path: &str,
        depth: usize,
        out: &mut Vec<LayoutNode>,
    ) -> Result<(), LayoutError> {
        let config = self.config;
        let Some(section) = config.sections.get(name) else {
            return Err(LayoutError::invalid_config(
                format!("unknown section '{}'", name),
                path,
            )
            .with_suggestion("Define the section under 'sections'"));
        };

        if self.section_stack.iter().any(|entry| entry == name) {
            let mut chain = self.section_stack.clone();
            chain.push(name.to_string());
            return Err(LayoutError::circular_reference(
                format!("section '{}' is referenced from within its own expansion", name),
                chain.join(" -> "),
            ));
        }

        self.section_stack.push(name.to_string());
        let result = self.build_into(section, &format!("sections.{}", name), depth, out);
        self.section_stack.pop();
        result
    }

    /// Builds a container element and its children.
    fn build_container(
        &mut self,
        element: &'a ElementConfig,
        path: &str,
        depth: usize,
    ) -> Result<LayoutNode, LayoutError> {
        let (node_type, group) = container_parts(element);

        let mut children = Vec::new();
        for (i, child) in group.children.iter().enumerate() {
            self.build_into(child, &format!("{}.children[{}]", path, i), depth + 1, &mut children)?;
        }

        let icon_class = if node_type.accepts_icon_class() {
            group.icon_class.as_deref()
        } else {
            if group.icon_class.is_some() {
                tracing::warn!(%path, %node_type, "icon_class ignored for this node type");
            }
            None
        };

        let id = group.id.as_deref();
        let node = match node_type {
            NodeType::LinearLayout => {
                factory::linear_layout(&group.attributes, id, icon_class, children, &mut self.ids)
            }
            NodeType::VerticalLayout => {
                factory::vertical_layout(&group.attributes, id, children, &mut self.ids)
            }
            NodeType::ExtendedLayout => {
                factory::extended_layout(&group.attributes, id, icon_class, children, &mut self.ids)
            }
            NodeType::HandwritingLayout => {
                factory::handwriting_layout(&group.attributes, id, children, &mut self.ids)
            }
            NodeType::LayoutView => {
                factory::layout_view(&group.attributes, id, children, &mut self.ids)
            }
            NodeType::CandidateView => {
                factory::candidate_view(&group.attributes, id, children, &mut self.ids)
            }
            NodeType::CanvasView => {
                factory::canvas_view(&group.attributes, id, children, &mut self.ids)
            }
            // SoftKey, Repeat and SectionRef are handled in build_into;
            // Keyboard is only ever created as the root.
            _ => unreachable!("container_parts only yields container types"),
        };

        self.register_id(node.id())?;
        Ok(node)
    }

    /// Builds one soft key, folding its modifier binding into the attributes.
    fn build_key(&mut self, key: &KeyConfig) -> Result<LayoutNode, LayoutError> {
        let mut attrs = key.attributes.clone();
        if let Some(state) = key.modifier {
            attrs.insert(
                ATTR_MODIFIER.to_string(),
                Value::String(state.as_str().to_string()),
            );
            if key.sticky {
                attrs.insert(ATTR_STICKY.to_string(), Value::Bool(true));
            }
        } else if key.sticky {
            tracing::warn!("sticky set on a key without a modifier binding; ignored");
        }

        let node = factory::soft_key(&attrs, key.id.as_deref(), &mut self.ids);
        self.register_id(node.id())?;
        Ok(node)
    }

    /// Records an identifier, rejecting collisions.
    fn register_id(&mut self, id: &str) -> Result<(), LayoutError> {
        if !self.seen_ids.insert(id.to_string()) {
            return Err(LayoutError::duplicate_identifier(id));
        }
        Ok(())
    }
}

/// Maps a container element variant to its node type and group body.
pub(crate) fn container_parts(element: &ElementConfig) -> (NodeType, &GroupConfig) {
    match element {
        ElementConfig::LinearLayout(group) => (NodeType::LinearLayout, group),
        ElementConfig::VerticalLayout(group) => (NodeType::VerticalLayout, group),
        ElementConfig::ExtendedLayout(group) => (NodeType::ExtendedLayout, group),
        ElementConfig::HandwritingLayout(group) => (NodeType::HandwritingLayout, group),
        ElementConfig::LayoutView(group) => (NodeType::LayoutView, group),
        ElementConfig::CandidateView(group) => (NodeType::CandidateView, group),
        ElementConfig::CanvasView(group) => (NodeType::CanvasView, group),
        other => unreachable!("not a container element: {:?}", other),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::StateId;
    use crate::layout::types::{Attributes, RepeatConfig, SectionRefConfig};
    use serde_json::json;
    use std::collections::HashSet;

    fn key(label: &str) -> ElementConfig {
        let mut attributes = Attributes::new();
        attributes.insert("label".into(), json!(label));
        ElementConfig::SoftKey(KeyConfig {
            attributes,
            ..KeyConfig::default()
        })
    }

    fn row(children: Vec<ElementConfig>) -> ElementConfig {
        ElementConfig::LinearLayout(GroupConfig {
            children,
            ..GroupConfig::default()
        })
    }

    fn keyset(name: &str, root: ElementConfig) -> KeysetConfig {
        KeysetConfig {
            name: name.into(),
            prefix: None,
            attributes: Attributes::new(),
            sections: Default::default(),
            root,
        }
    }

    /// Test 1: A simple keyset builds into a keyboard-rooted tree with
    /// children in composition order
    #[test]
    fn test_build_simple_keyset() {
        let config = keyset(
            "us",
            ElementConfig::VerticalLayout(GroupConfig {
                children: vec![
                    row(vec![key("q"), key("w"), key("e")]),
                    row(vec![key("a"), key("s")]),
                ],
                ..GroupConfig::default()
            }),
        );

        let tree = build_keyset(&config).expect("build should succeed");

        assert_eq!(tree.node_type(), NodeType::Keyboard);
        assert_eq!(tree.id(), "us", "root id is the keyset name");
        assert_eq!(tree.children().len(), 1);

        let column = &tree.children()[0];
        assert_eq!(column.node_type(), NodeType::VerticalLayout);
        assert_eq!(column.children().len(), 2);

        let labels: Vec<_> = column.children()[0]
            .children()
            .iter()
            .map(|n| n.attribute("label").cloned())
            .collect();
        assert_eq!(
            labels,
            vec![Some(json!("q")), Some(json!("w")), Some(json!("e"))],
            "child order follows composition order"
        );
    }

    /// Test 2: All identifiers in one build are distinct
    #[test]
    fn test_build_unique_identifiers() {
        let config = keyset(
            "us",
            row(vec![key("a"), key("b"), key("c"), key("d")]),
        );

        let tree = build_keyset(&config).expect("build should succeed");

        let mut ids = Vec::new();
        tree.visit(&mut |node| ids.push(node.id().to_string()));
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len(), "no identifier appears twice");
    }

    /// Test 3: Repeat emits count attribute-equal keys with distinct ids
    #[test]
    fn test_repeat_sequence() {
        let mut attributes = Attributes::new();
        attributes.insert("label".into(), json!("pad"));
        let config = keyset(
            "num",
            row(vec![ElementConfig::Repeat(RepeatConfig {
                count: 5,
                key: KeyConfig {
                    attributes,
                    ..KeyConfig::default()
                },
            })]),
        );

        let tree = build_keyset(&config).expect("build should succeed");
        let keys = tree.children()[0].children();

        assert_eq!(keys.len(), 5);
        let ids: HashSet<&str> = keys.iter().map(LayoutNode::id).collect();
        assert_eq!(ids.len(), 5, "each repeated key gets its own identifier");
        for k in keys {
            assert_eq!(k.attributes(), keys[0].attributes());
        }
    }

    /// Test 4: Repeat count of zero is a configuration error
    #[test]
    fn test_repeat_count_zero_rejected() {
        let config = keyset(
            "num",
            row(vec![ElementConfig::Repeat(RepeatConfig {
                count: 0,
                key: KeyConfig::default(),
            })]),
        );

        let err = build_keyset(&config).unwrap_err();
        match err {
            LayoutError::InvalidConfig { message, .. } => {
                assert!(message.contains("repeat count"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    /// Test 5: Section references splice in place; unknown sections fail
    #[test]
    fn test_section_splicing() {
        let mut config = keyset(
            "us",
            row(vec![
                key("a"),
                ElementConfig::SectionRef(SectionRefConfig {
                    section: "bottom".into(),
                }),
            ]),
        );
        config
            .sections
            .insert("bottom".into(), key("space"));

        let tree = build_keyset(&config).expect("build should succeed");
        let keys = tree.children()[0].children();
        assert_eq!(keys.len(), 2, "section body spliced next to the key");
        assert_eq!(keys[1].attribute("label"), Some(&json!("space")));

        // Unknown section
        let broken = keyset(
            "us",
            ElementConfig::SectionRef(SectionRefConfig {
                section: "missing".into(),
            }),
        );
        let err = build_keyset(&broken).unwrap_err();
        match err {
            LayoutError::InvalidConfig { message, .. } => {
                assert!(message.contains("unknown section 'missing'"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    /// Test 6: Circular section references fail with the reference chain
    #[test]
    fn test_circular_section_reference() {
        let mut config = keyset(
            "us",
            ElementConfig::SectionRef(SectionRefConfig {
                section: "a".into(),
            }),
        );
        config.sections.insert(
            "a".into(),
            row(vec![ElementConfig::SectionRef(SectionRefConfig {
                section: "b".into(),
            })]),
        );
        config.sections.insert(
            "b".into(),
            row(vec![ElementConfig::SectionRef(SectionRefConfig {
                section: "a".into(),
            })]),
        );

        let err = build_keyset(&config).unwrap_err();
        match err {
            LayoutError::CircularReference { chain, .. } => {
                assert_eq!(chain, "a -> b -> a");
            }
            other => panic!("Expected CircularReference, got {:?}", other),
        }
    }

    /// Test 7: Colliding explicit identifiers abort the build
    #[test]
    fn test_duplicate_explicit_id() {
        let shift = ElementConfig::SoftKey(KeyConfig {
            id: Some("shift".into()),
            ..KeyConfig::default()
        });
        let config = keyset("us", row(vec![shift.clone(), shift]));

        let err = build_keyset(&config).unwrap_err();
        match err {
            LayoutError::DuplicateIdentifier { id } => assert_eq!(id, "shift"),
            other => panic!("Expected DuplicateIdentifier, got {:?}", other),
        }
    }

    /// Test 8: Two builds under prefixes "A" and "B" produce disjoint id sets
    #[test]
    fn test_disjoint_prefixes() {
        let make = |prefix: &str| {
            let mut config = keyset("keys", row(vec![key("a"), key("b"), key("c")]));
            config.prefix = Some(prefix.into());
            config.name = format!("keys_{}", prefix);
            build_keyset(&config).expect("build should succeed")
        };

        let first = make("A");
        let second = make("B");

        let collect = |tree: &LayoutNode| {
            let mut ids = HashSet::new();
            tree.visit(&mut |node| {
                ids.insert(node.id().to_string());
            });
            ids
        };

        assert!(
            collect(&first).is_disjoint(&collect(&second)),
            "id sets from different namespaces must not intersect"
        );
    }

    /// Test 9: Modifier keys carry their binding in the node attributes
    #[test]
    fn test_modifier_binding_attributes() {
        let config = keyset(
            "us",
            row(vec![ElementConfig::SoftKey(KeyConfig {
                id: Some("caps".into()),
                modifier: Some(StateId::CapsLock),
                sticky: true,
                ..KeyConfig::default()
            })]),
        );

        let tree = build_keyset(&config).expect("build should succeed");
        let caps = tree.find_by_id("caps").expect("caps key present");

        assert_eq!(caps.attribute(ATTR_MODIFIER), Some(&json!("caps_lock")));
        assert_eq!(caps.attribute(ATTR_STICKY), Some(&json!(true)));
    }

    /// Test 10: Nesting beyond the depth limit is rejected
    #[test]
    fn test_max_nesting_depth() {
        let mut element = key("deep");
        for _ in 0..(MAX_NESTING_DEPTH + 1) {
            element = ElementConfig::VerticalLayout(GroupConfig {
                children: vec![element],
                ..GroupConfig::default()
            });
        }
        let config = keyset("deep", element);

        let err = build_keyset(&config).unwrap_err();
        match err {
            LayoutError::MaxDepthExceeded { max_depth, .. } => {
                assert_eq!(max_depth, MAX_NESTING_DEPTH);
            }
            other => panic!("Expected MaxDepthExceeded, got {:?}", other),
        }
    }

    /// Test 11: Icon class lands on linear layouts and is dropped elsewhere
    #[test]
    fn test_icon_class_placement() {
        let config = keyset(
            "us",
            ElementConfig::VerticalLayout(GroupConfig {
                icon_class: Some("ignored".into()),
                children: vec![ElementConfig::LinearLayout(GroupConfig {
                    id: Some("row0".into()),
                    icon_class: Some("row-style".into()),
                    ..GroupConfig::default()
                })],
                ..GroupConfig::default()
            }),
        );

        let tree = build_keyset(&config).expect("build should succeed");
        let column = &tree.children()[0];
        assert!(
            column.attribute("icon_class").is_none(),
            "vertical layouts do not accept an icon class"
        );
        let row = tree.find_by_id("row0").expect("row present");
        assert_eq!(row.attribute("icon_class"), Some(&json!("row-style")));
    }
}

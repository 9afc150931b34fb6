// SPDX-License-Identifier: GPL-3.0-only

//! Keyset configuration validation.
//!
//! The checks here run before a build and are deliberately permissive:
//! anything that would make the builder fail (zero repeat counts, unknown
//! sections, explicit ids that are guaranteed to collide) is reported as an
//! error, while shape oddities that the builder tolerates (ignored icon
//! classes, empty containers, unused sections) become warnings carried
//! alongside the parsed configuration.
//!
//! Circular section references are not re-checked here; the builder detects
//! them with the full reference chain while expanding.

use std::collections::HashSet;

use crate::layout::builder::container_parts;
use crate::layout::types::{ElementConfig, KeysetConfig, NodeType, Severity, ValidationIssue};

/// Checks a keyset configuration, returning every issue found.
///
/// An empty result means the configuration is clean; the caller decides
/// whether warnings block anything (the parser does not).
#[must_use]
pub fn validate_config(config: &KeysetConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if config.name.is_empty() {
        issues.push(
            ValidationIssue::new(Severity::Error, "keyset name must not be empty", "name")
                .with_suggestion("Give the keyset a non-empty name"),
        );
    }
    if matches!(&config.prefix, Some(prefix) if prefix.is_empty()) {
        issues.push(
            ValidationIssue::new(
                Severity::Warning,
                "empty identifier prefix; ids from different keysets may collide",
                "prefix",
            )
            .with_suggestion("Use a prefix unique to this keyset, or omit it"),
        );
    }

    let mut referenced = HashSet::new();
    check_element(config, &config.root, "root", &mut referenced, &mut issues);

    let mut section_names: Vec<&String> = config.sections.keys().collect();
    section_names.sort();
    for name in &section_names {
        let body = &config.sections[*name];
        check_element(
            config,
            body,
            &format!("sections.{}", name),
            &mut referenced,
            &mut issues,
        );
    }
    for name in section_names {
        if !referenced.contains(name.as_str()) {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                format!("section '{}' is never referenced", name),
                format!("sections.{}", name),
            ));
        }
    }

    issues
}

fn check_element<'a>(
    config: &'a KeysetConfig,
    element: &'a ElementConfig,
    path: &str,
    referenced: &mut HashSet<&'a str>,
    issues: &mut Vec<ValidationIssue>,
) {
    match element {
        ElementConfig::SoftKey(key) => {
            if key.sticky && key.modifier.is_none() {
                issues.push(
                    ValidationIssue::new(
                        Severity::Warning,
                        "sticky is set but the key has no modifier binding",
                        path,
                    )
                    .with_suggestion("Add a 'modifier' entry or drop 'sticky'"),
                );
            }
        }
        ElementConfig::Repeat(repeat) => {
            if repeat.count == 0 {
                issues.push(
                    ValidationIssue::new(Severity::Error, "repeat count must be positive", path)
                        .with_suggestion("Use a count of 1 or more"),
                );
            }
            if repeat.count > 1 && repeat.key.id.is_some() {
                issues.push(
                    ValidationIssue::new(
                        Severity::Error,
                        "explicit id on a repeated key would collide with itself",
                        path,
                    )
                    .with_suggestion("Remove the id and let the allocator number each copy"),
                );
            }
            if repeat.key.sticky && repeat.key.modifier.is_none() {
                issues.push(ValidationIssue::new(
                    Severity::Warning,
                    "sticky is set but the key has no modifier binding",
                    path,
                ));
            }
        }
        ElementConfig::SectionRef(section_ref) => {
            if let Some((name, _)) = config.sections.get_key_value(&section_ref.section) {
                referenced.insert(name.as_str());
            } else {
                issues.push(
                    ValidationIssue::new(
                        Severity::Error,
                        format!("unknown section '{}'", section_ref.section),
                        path,
                    )
                    .with_suggestion("Define the section under 'sections'"),
                );
            }
        }
        _ => {
            let (node_type, group) = container_parts(element);
            if group.icon_class.is_some() && !node_type.accepts_icon_class() {
                issues.push(ValidationIssue::new(
                    Severity::Warning,
                    format!("icon_class is ignored on a {}", node_type),
                    path,
                ));
            }
            let is_layout_container = matches!(
                node_type,
                NodeType::LinearLayout | NodeType::VerticalLayout | NodeType::ExtendedLayout
            );
            if is_layout_container && group.children.is_empty() {
                issues.push(ValidationIssue::new(
                    Severity::Warning,
                    format!("{} has no children", node_type),
                    path,
                ));
            }
            for (i, child) in group.children.iter().enumerate() {
                check_element(
                    config,
                    child,
                    &format!("{}.children[{}]", path, i),
                    referenced,
                    issues,
                );
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{GroupConfig, KeyConfig, RepeatConfig, SectionRefConfig};

    fn keyset(root: ElementConfig) -> KeysetConfig {
        KeysetConfig {
            name: "test".into(),
            prefix: None,
            attributes: Default::default(),
            sections: Default::default(),
            root,
        }
    }

    fn row(children: Vec<ElementConfig>) -> ElementConfig {
        ElementConfig::LinearLayout(GroupConfig {
            children,
            ..GroupConfig::default()
        })
    }

    /// Test 1: A clean configuration produces no issues
    #[test]
    fn test_clean_config() {
        let config = keyset(row(vec![ElementConfig::SoftKey(KeyConfig::default())]));
        assert!(validate_config(&config).is_empty());
    }

    /// Test 2: Zero repeat count is a fatal issue
    #[test]
    fn test_repeat_count_zero() {
        let config = keyset(row(vec![ElementConfig::Repeat(RepeatConfig {
            count: 0,
            key: KeyConfig::default(),
        })]));

        let issues = validate_config(&config);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert!(issues[0].message.contains("repeat count"));
        assert_eq!(issues[0].field_path, "root.children[0]");
    }

    /// Test 3: Explicit id on a repeated key is a fatal issue
    #[test]
    fn test_repeat_with_explicit_id() {
        let config = keyset(row(vec![ElementConfig::Repeat(RepeatConfig {
            count: 3,
            key: KeyConfig {
                id: Some("pad".into()),
                ..KeyConfig::default()
            },
        })]));

        let issues = validate_config(&config);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert!(issues[0].message.contains("collide"));
    }

    /// Test 4: Unknown section reference is fatal; unused section warns
    #[test]
    fn test_section_issues() {
        let mut config = keyset(row(vec![ElementConfig::SectionRef(SectionRefConfig {
            section: "missing".into(),
        })]));
        config
            .sections
            .insert("orphan".into(), ElementConfig::SoftKey(KeyConfig::default()));

        let issues = validate_config(&config);
        assert_eq!(issues.len(), 2);

        let error = issues.iter().find(|i| i.is_error()).expect("has error");
        assert!(error.message.contains("unknown section 'missing'"));

        let warning = issues.iter().find(|i| !i.is_error()).expect("has warning");
        assert!(warning.message.contains("'orphan' is never referenced"));
    }

    /// Test 5: Shape oddities warn without blocking
    #[test]
    fn test_shape_warnings() {
        let config = keyset(ElementConfig::VerticalLayout(GroupConfig {
            icon_class: Some("unused".into()),
            children: vec![
                row(vec![]),
                ElementConfig::SoftKey(KeyConfig {
                    sticky: true,
                    ..KeyConfig::default()
                }),
            ],
            ..GroupConfig::default()
        }));

        let issues = validate_config(&config);
        assert_eq!(issues.len(), 3);
        assert!(
            issues.iter().all(|i| !i.is_error()),
            "all shape issues are warnings"
        );

        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("icon_class is ignored")));
        assert!(messages.iter().any(|m| m.contains("has no children")));
        assert!(messages.iter().any(|m| m.contains("no modifier binding")));
    }

    /// Test 6: Empty keyset name is fatal
    #[test]
    fn test_empty_name() {
        let mut config = keyset(row(vec![ElementConfig::SoftKey(KeyConfig::default())]));
        config.name = String::new();

        let issues = validate_config(&config);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].field_path, "name");
    }
}

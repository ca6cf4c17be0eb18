//! Builds the visible side navigation.

use serde::Serialize;

use portal_entity::{IdentitySlot, ModuleTreeNode, PermissionRequest, Role};

use crate::access::{DirectorySnapshot, ModuleGating, decide};

/// What the side navigation should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibleNavigation {
    /// Skeleton rows while access is still unknown.
    Placeholder {
        /// Number of rows to draw.
        rows: usize,
    },
    /// Entries the identity may view.
    Tree {
        /// Visible top-level entries.
        nodes: Vec<ModuleTreeNode>,
    },
}

impl VisibleNavigation {
    /// Visible entries, empty for a placeholder.
    pub fn nodes(&self) -> &[ModuleTreeNode] {
        match self {
            Self::Placeholder { .. } => &[],
            Self::Tree { nodes } => nodes,
        }
    }
}

/// Filter `raw` down to the entries `identity` may view.
///
/// A node is kept when `view` on its name is granted under the same rules
/// as the route guard; children are filtered independently, so a visible
/// parent may end up with no children. Until the directory settles the
/// result is a placeholder shaped like `raw` (or `default_rows` rows when
/// `raw` is empty).
pub fn build_visible_tree(
    raw: &[ModuleTreeNode],
    identity: &IdentitySlot,
    snapshot: &DirectorySnapshot,
    default_rows: usize,
) -> VisibleNavigation {
    let bypass = identity.role.as_ref().is_some_and(Role::has_global_bypass);
    let settled = identity
        .uuid()
        .is_some_and(|uuid| snapshot.belongs_to(uuid) && snapshot.is_loaded());
    if identity.user.is_some() && !bypass && !settled {
        let rows = if raw.is_empty() { default_rows } else { raw.len() };
        return VisibleNavigation::Placeholder { rows };
    }

    VisibleNavigation::Tree {
        nodes: filter_nodes(raw, identity, snapshot),
    }
}

fn filter_nodes(
    nodes: &[ModuleTreeNode],
    identity: &IdentitySlot,
    snapshot: &DirectorySnapshot,
) -> Vec<ModuleTreeNode> {
    nodes
        .iter()
        .filter(|node| {
            decide(
                &PermissionRequest::view(&node.name),
                identity,
                snapshot,
                ModuleGating::Enforced,
            )
            .granted
        })
        .map(|node| ModuleTreeNode {
            children: filter_nodes(&node.children, identity, snapshot),
            ..node.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_entity::{AccessDirectory, UserRecord};

    fn menu() -> Vec<ModuleTreeNode> {
        vec![
            ModuleTreeNode::leaf(1, "Dashboard", "/dashboard"),
            ModuleTreeNode::leaf(2, "Users", "#").with_children(vec![
                ModuleTreeNode::leaf(3, "Roles", "/roles"),
                ModuleTreeNode::leaf(4, "Activity Logs", "/activity-logs"),
            ]),
            ModuleTreeNode::leaf(5, "Modules", "/module"),
        ]
    }

    fn admin() -> IdentitySlot {
        IdentitySlot::signed_in(UserRecord::new("u-1", "Ada", Role::Admin), "tok")
    }

    #[test]
    fn test_placeholder_until_loaded() {
        let raw = menu();
        let loading = DirectorySnapshot::loading("u-1");
        assert_eq!(
            build_visible_tree(&raw, &admin(), &loading, 7),
            VisibleNavigation::Placeholder { rows: 3 }
        );
        assert_eq!(
            build_visible_tree(&[], &admin(), &loading, 7),
            VisibleNavigation::Placeholder { rows: 7 }
        );
    }

    #[test]
    fn test_children_filtered_independently() {
        let directory = AccessDirectory::empty()
            .grant("dashboard", ["view"])
            .grant("users", ["view"])
            .grant("activity logs", ["view"])
            .grant("roles", ["view"])
            .allow_module("Dashboard")
            .allow_module("Users")
            .allow_module("Activity Logs");
        let snapshot = DirectorySnapshot::ready("u-1", directory);

        let visible = build_visible_tree(&menu(), &admin(), &snapshot, 7);
        let nodes = visible.nodes();
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Dashboard", "Users"]);
        let children: Vec<&str> = nodes[1].children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(children, vec!["Activity Logs"]);
    }

    #[test]
    fn test_bypass_sees_everything_before_load() {
        let root =
            IdentitySlot::signed_in(UserRecord::new("u-9", "Root", Role::SystemAdmin), "tok");
        let visible = build_visible_tree(&menu(), &root, &DirectorySnapshot::default(), 7);
        assert_eq!(visible.nodes().len(), 3);
        assert_eq!(visible.nodes()[1].children.len(), 2);
    }

    #[test]
    fn test_failed_directory_shows_nothing() {
        let failed = DirectorySnapshot::failed("u-1", "boom");
        assert_eq!(
            build_visible_tree(&menu(), &admin(), &failed, 7),
            VisibleNavigation::Tree { nodes: Vec::new() }
        );
    }
}

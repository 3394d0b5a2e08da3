//! Sway window lookup and focus via `swaymsg`.
//!
//! The launcher titles editor windows predictably (`nvim ~ {name}`), so an
//! existing session can be found by walking the tree returned by
//! `swaymsg -t get_tree` and focused by container id instead of spawning a
//! second editor.

use std::process::Command;

use serde::Deserialize;

/// Result alias for process-facing operations.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A node in the Sway container tree; only the fields the search needs.
#[derive(Debug, Deserialize)]
pub struct SwayNode {
    /// Container id usable with `[con_id=...]` criteria.
    pub id: i64,
    /// Window/container title.
    #[serde(default)]
    pub name: Option<String>,
    /// Application id; present on actual application windows.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Tiled children.
    #[serde(default)]
    pub nodes: Vec<SwayNode>,
    /// Floating children.
    #[serde(default)]
    pub floating_nodes: Vec<SwayNode>,
}

/// Depth-first search for an application window with the given title,
/// covering tiled and floating children.
fn find_node<'a>(node: &'a SwayNode, title: &str) -> Option<&'a SwayNode> {
    if node.app_id.is_some() && node.name.as_deref() == Some(title) {
        return Some(node);
    }
    node.nodes
        .iter()
        .chain(node.floating_nodes.iter())
        .find_map(|n| find_node(n, title))
}

/// What: Find a Sway window by exact title.
///
/// Output:
/// - `Ok(Some(con_id))` when a window matches, `Ok(None)` when nothing does.
///
/// # Errors
/// - Returns `Err` when `swaymsg` cannot be spawned, exits non-zero, or its
///   output cannot be parsed.
pub fn find_window(title: &str) -> Result<Option<i64>> {
    let output = Command::new("swaymsg").args(["-t", "get_tree"]).output()?;
    if !output.status.success() {
        return Err(format!("swaymsg -t get_tree exited with {}", output.status).into());
    }
    let tree: SwayNode = serde_json::from_slice(&output.stdout)?;
    Ok(find_node(&tree, title).map(|n| n.id))
}

/// What: Focus a Sway window by container id.
///
/// # Errors
/// - Returns `Err` when `swaymsg` cannot be spawned, exits non-zero, or
///   reports the focus command as unsuccessful.
///
/// Details:
/// - `swaymsg` replies with a JSON array of `{ "success": bool }`; anything
///   other than a successful first entry is surfaced as an error so the
///   caller can fall back to launching a fresh window.
pub fn focus_window(con_id: i64) -> Result<()> {
    let criteria = format!("[con_id=\"{con_id}\"] focus");
    let output = Command::new("swaymsg").arg(&criteria).output()?;
    if !output.status.success() {
        return Err(format!("swaymsg focus exited with {}", output.status).into());
    }

    let replies: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout)?;
    let ok = replies
        .first()
        .and_then(|r| r.get("success"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(format!(
            "swaymsg focus command failed: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        )
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_fixture() -> SwayNode {
        serde_json::from_str(
            r#"{
                "id": 1,
                "nodes": [
                    {
                        "id": 2,
                        "name": "workspace 1",
                        "nodes": [
                            { "id": 3, "name": "nvim ~ alpha", "app_id": "kitty" },
                            { "id": 4, "name": "browser", "app_id": "firefox" }
                        ],
                        "floating_nodes": [
                            { "id": 5, "name": "nvim ~ floaty", "app_id": "kitty" }
                        ]
                    }
                ]
            }"#,
        )
        .expect("fixture tree")
    }

    /// What: Tree search matches only app windows with the exact title.
    #[test]
    fn find_node_matches_exact_title() {
        let tree = tree_fixture();
        assert_eq!(find_node(&tree, "nvim ~ alpha").map(|n| n.id), Some(3));
        assert!(find_node(&tree, "nvim ~ beta").is_none());
    }

    /// What: Floating windows are searched too.
    #[test]
    fn find_node_covers_floating_nodes() {
        let tree = tree_fixture();
        assert_eq!(find_node(&tree, "nvim ~ floaty").map(|n| n.id), Some(5));
    }

    /// What: Containers without an app id never match, even on title.
    #[test]
    fn find_node_ignores_non_app_containers() {
        let tree = tree_fixture();
        assert!(find_node(&tree, "workspace 1").is_none());
    }
}

//! Parser: persisted JSON → `Document`.
//!
//! Two payload shapes are accepted:
//!
//! - current: `{ "tree": <node>, "crossLinks": [<link>, ...] }`, where the
//!   tree key may also be spelled `root`;
//! - legacy: the root node object itself, with no cross-links.
//!
//! Loading is lenient. Missing fields take their defaults, nodes without an
//! id (or with an id already taken) get a deterministic path-derived id, and
//! cross-links that are self-links, dangling, or exact duplicates are
//! dropped with a warning. Only input that is not a JSON object tree at all
//! is a parse error.
//!
//! Nesting depth is not capped: a map is as deep as its users make it, and
//! whatever the emitter writes must load again.

use crate::error::Error;
use crate::id::NodeId;
use crate::model::{CrossLink, Document, Node, UNTITLED};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "isCollapsed", alias = "collapsed")]
    collapsed: Option<bool>,
    #[serde(default)]
    children: Option<Vec<RawNode>>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "sourceId", alias = "source")]
    source: Option<String>,
    #[serde(default, rename = "targetId", alias = "target")]
    target: Option<String>,
}

/// Parse a persisted document.
pub fn parse_document(input: &str) -> Result<Document, Error> {
    let value = read_value(input)?;
    let Value::Object(mut map) = value else {
        return Err(Error::Parse("expected a JSON object".into()));
    };

    let tree_key = ["tree", "root"]
        .into_iter()
        .find(|k| map.get(*k).is_some_and(Value::is_object));

    let (raw_root, raw_links) = match tree_key {
        Some(key) => {
            let tree = map.remove(key).unwrap_or(Value::Null);
            let links = match map.remove("crossLinks") {
                None | Some(Value::Null) => Vec::new(),
                Some(links) => serde_json::from_value::<Vec<RawLink>>(links)?,
            };
            (serde_json::from_value::<RawNode>(tree)?, links)
        }
        None => (serde_json::from_value::<RawNode>(Value::Object(map))?, Vec::new()),
    };

    let mut taken = HashSet::new();
    collect_ids(&raw_root, &mut taken);
    let mut seen = HashSet::new();
    let root = build_node(raw_root, "0", &mut taken, &mut seen);

    let mut doc = Document::from_root(root);
    attach_links(&mut doc, raw_links);
    Ok(doc)
}

/// Read JSON without serde_json's nesting limit. Deep documents are walked
/// on a growing stack instead.
fn read_value(input: &str) -> Result<Value, Error> {
    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Parse a persisted document, falling back to a fresh single-node document
/// named `title` when the payload is malformed.
pub fn load_or_default(input: &str, title: &str) -> Document {
    match parse_document(input) {
        Ok(doc) => doc,
        Err(err) => {
            log::warn!("load: {err}, starting from an empty map");
            Document::new(title)
        }
    }
}

fn collect_ids(raw: &RawNode, taken: &mut HashSet<String>) {
    if let Some(id) = raw.id.as_deref().filter(|id| !id.is_empty()) {
        taken.insert(id.to_string());
    }
    for child in raw.children.iter().flatten() {
        collect_ids(child, taken);
    }
}

/// Pick the id for a node: its own if present and not yet used, otherwise
/// `legacy_<path>` with a numeric suffix when even that is taken.
fn assign_id(
    raw_id: Option<String>,
    path: &str,
    taken: &mut HashSet<String>,
    seen: &mut HashSet<String>,
) -> NodeId {
    if let Some(id) = raw_id.filter(|id| !id.is_empty()) {
        if seen.insert(id.clone()) {
            return NodeId::intern(&id);
        }
        log::warn!("load: duplicate node id {id}, reassigning");
    }

    let base = format!("legacy_{path}");
    let mut candidate = base.clone();
    let mut n = 1;
    while taken.contains(&candidate) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    taken.insert(candidate.clone());
    seen.insert(candidate.clone());
    NodeId::intern(&candidate)
}

fn build_node(
    raw: RawNode,
    path: &str,
    taken: &mut HashSet<String>,
    seen: &mut HashSet<String>,
) -> Node {
    let id = assign_id(raw.id, path, taken, seen);
    let name = raw
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let children = raw
        .children
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, child)| build_node(child, &format!("{path}_{i}"), taken, seen))
        .collect();

    Node {
        id,
        name,
        description: raw.description.unwrap_or_default(),
        collapsed: raw.collapsed.unwrap_or(false),
        children,
    }
}

fn attach_links(doc: &mut Document, raw_links: Vec<RawLink>) {
    let ids: HashSet<NodeId> = doc.node_ids().into_iter().collect();
    let mut pairs = HashSet::new();

    for raw in raw_links {
        let (Some(source), Some(target)) = (raw.source.as_deref(), raw.target.as_deref()) else {
            log::warn!("load: dropping link without both endpoints");
            continue;
        };
        let (source, target) = (NodeId::intern(source), NodeId::intern(target));
        if source == target {
            log::warn!("load: dropping self-link on {source}");
            continue;
        }
        if !ids.contains(&source) || !ids.contains(&target) {
            log::warn!("load: dropping dangling link {source} -> {target}");
            continue;
        }
        if !pairs.insert((source, target)) {
            log::warn!("load: dropping duplicate link {source} -> {target}");
            continue;
        }

        let id = match raw.id.filter(|id| !id.is_empty()) {
            Some(id) if doc.link(NodeId::intern(&id)).is_none() => NodeId::intern(&id),
            _ => doc.fresh_link_id(),
        };
        doc.cross_links.push(CrossLink::new(id, source, target));
    }
}

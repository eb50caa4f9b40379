//! References to entities of the content tree.
//!
//! Structural filters accept references wherever an identifier is expected;
//! the reference is reduced to the identifier form the field needs
//! (node id, object id, class identifier or class name).

use serde::{Deserialize, Serialize};

use crate::value::FilterValue;

/// The root node of the content tree, used when no parent scope is set.
pub const DEFAULT_PARENT_NODE_ID: u64 = 2;

/// A location (node) in the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    /// Node id.
    pub node_id: u64,
    /// Id of the object this node places in the tree.
    pub contentobject_id: u64,
    /// Identifier of the object's class.
    pub class_identifier: String,
    /// Display name of the object's class.
    pub class_name: String,
    /// Display name of the node.
    pub name: String,
}

/// A content object, placed in the tree by its main node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Object id.
    pub id: u64,
    /// Id of the object's main node.
    pub main_node_id: u64,
    /// Identifier of the object's class.
    pub class_identifier: String,
    /// Display name of the object's class.
    pub class_name: String,
    /// Display name of the object.
    pub name: String,
}

/// A content class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    /// Class identifier, e.g. `article`.
    pub identifier: String,
    /// Display name.
    pub name: String,
}

/// Any referenceable entity of the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentRef {
    /// Tree node.
    Node(NodeRef),
    /// Content object.
    Object(ObjectRef),
    /// Content class.
    Class(ClassRef),
}

impl ContentRef {
    /// Node id: the node itself, or an object's main node.
    pub fn node_id(&self) -> Option<u64> {
        match self {
            Self::Node(node) => Some(node.node_id),
            Self::Object(object) => Some(object.main_node_id),
            Self::Class(_) => None,
        }
    }

    /// Object id: the object itself, or the object a node places.
    pub fn object_id(&self) -> Option<u64> {
        match self {
            Self::Node(node) => Some(node.contentobject_id),
            Self::Object(object) => Some(object.id),
            Self::Class(_) => None,
        }
    }

    /// Class identifier of the referenced entity.
    pub fn class_identifier(&self) -> &str {
        match self {
            Self::Node(node) => &node.class_identifier,
            Self::Object(object) => &object.class_identifier,
            Self::Class(class) => &class.identifier,
        }
    }

    /// Class display name of the referenced entity.
    pub fn class_name(&self) -> &str {
        match self {
            Self::Node(node) => &node.class_name,
            Self::Object(object) => &object.class_name,
            Self::Class(class) => &class.name,
        }
    }

    /// Display name of the referenced entity.
    pub fn name(&self) -> &str {
        match self {
            Self::Node(node) => &node.name,
            Self::Object(object) => &object.name,
            Self::Class(class) => &class.name,
        }
    }
}

/// A parent scope given either as a raw node id or as a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTarget {
    /// Node id.
    Id(u64),
    /// Reference resolved through [`ContentRef::node_id`].
    Ref(ContentRef),
}

impl NodeTarget {
    /// Resolve to a node id.
    pub fn node_id(&self) -> Option<u64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Ref(content) => content.node_id(),
        }
    }
}

impl From<u64> for NodeTarget {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<ContentRef> for NodeTarget {
    fn from(content: ContentRef) -> Self {
        Self::Ref(content)
    }
}

/// Collect node ids from a mixed list of ids and references.
///
/// Class references have no node and are skipped, as are non-numeric values.
pub fn node_id_list<'a>(values: impl IntoIterator<Item = &'a FilterValue>) -> Vec<i64> {
    values
        .into_iter()
        .filter_map(|value| match value {
            FilterValue::Ref(content) => content.node_id().map(|id| id as i64),
            other => other.as_i64(),
        })
        .collect()
}

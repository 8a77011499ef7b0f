use serde::{Deserialize, Serialize};

/// Well-known id of the single top-level folder.
pub const ROOT_ID: &str = "root";
pub const ROOT_NAME: &str = "Root";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Folder {
    pub fn empty_root() -> Self {
        Self {
            id: ROOT_ID.to_string(),
            name: ROOT_NAME.to_string(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
}

/// One entry of the persisted tree. The `type` tag and the per-variant
/// fields are the fixed wire schema of the backing store document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(Folder),
    Item(Item),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::Item(item) => &item.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::Item(item) => &item.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Item(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Item(_) => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut Item> {
        match self {
            Self::Folder(_) => None,
            Self::Item(item) => Some(item),
        }
    }
}

/// One row of the depth-annotated folder listing used for selection UIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    pub id: String,
    pub name: String,
    pub depth: usize,
}

/// Partial update for an item. `None` keeps the stored value; a supplied
/// empty thumbnail is a valid explicit value and clears the artwork.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalFavorite {
    pub name: String,
    pub url: String,
    pub thumbnail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_serialize_with_the_fixed_wire_tags() {
        let node = Node::Item(Item {
            id: "i1".to_string(),
            name: "Clip".to_string(),
            url: "http://x/1".to_string(),
            thumbnail: String::new(),
        });
        let value = serde_json::to_value(&node).expect("serialize item");
        assert_eq!(value["type"], "item");
        assert_eq!(value["url"], "http://x/1");

        let value = serde_json::to_value(Node::Folder(Folder::empty_root())).expect("serialize root");
        assert_eq!(value["type"], "folder");
        assert_eq!(value["id"], ROOT_ID);
    }

    #[test]
    fn documents_without_optional_fields_deserialize() {
        let node: Node = serde_json::from_str(r#"{"id":"root","name":"Root","type":"folder"}"#)
            .expect("folder without children");
        assert!(matches!(node, Node::Folder(ref folder) if folder.children.is_empty()));

        let node: Node =
            serde_json::from_str(r#"{"id":"i1","name":"Clip","type":"item","url":"http://x/1"}"#)
                .expect("item without thumbnail");
        assert!(matches!(node, Node::Item(ref item) if item.thumbnail.is_empty()));
    }
}

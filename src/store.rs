use crate::errors::{StoreError, StoreResult};
use crate::models::{Folder, FolderEntry, Item, ItemPatch, Node, ROOT_ID};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STORE_FILE: &str = "favorites.json";

/// Per-installation data directory for hosts that do not supply their own.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("favorites-store")
}

/// Owns the one in-memory favorites tree and its backing document.
/// Every mutating operation rewrites the whole document before returning;
/// on a write failure the in-memory change is rolled back, so memory and
/// disk never drift apart. `&mut self` on the mutations enforces the
/// single-writer model.
pub struct FavoritesStore {
    root: Node,
    file_path: PathBuf,
}

impl FavoritesStore {
    /// Opens the store under `data_dir`, loading the persisted tree if one
    /// exists. Missing or corrupt state degrades to an empty root; open
    /// itself never fails.
    pub fn open(data_dir: &Path) -> Self {
        if let Err(error) = fs::create_dir_all(data_dir) {
            tracing::warn!(
                dir = %data_dir.to_string_lossy(),
                error = %error,
                "failed to create data directory; the next save will report it"
            );
        }
        let file_path = data_dir.join(STORE_FILE);
        let root = load_tree(&file_path);
        Self { root, file_path }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        find_node(&self.root, id)
    }

    /// Folder whose children list contains `id`. `None` for the root
    /// itself and for absent ids.
    pub fn find_parent(&self, id: &str) -> Option<&Folder> {
        find_parent(&self.root, id)
    }

    /// Children of the given folder; empty if the id is absent or names an
    /// item.
    pub fn list_children(&self, folder_id: &str) -> &[Node] {
        find_node(&self.root, folder_id)
            .and_then(Node::as_folder)
            .map(|folder| folder.children.as_slice())
            .unwrap_or(&[])
    }

    /// Pre-order listing of every folder as (id, name, depth), root first
    /// at depth 0.
    pub fn flatten_folders(&self) -> Vec<FolderEntry> {
        let mut entries = Vec::new();
        collect_folders(&self.root, 0, &mut entries);
        entries
    }

    pub fn add_folder(&mut self, parent_id: &str, name: &str) -> StoreResult<String> {
        ensure_not_blank(name, "folder name")?;
        let id = new_node_id();
        let node = Node::Folder(Folder {
            id: id.clone(),
            name: name.to_string(),
            children: Vec::new(),
        });
        self.append_child(parent_id, node)?;
        Ok(id)
    }

    pub fn add_item(
        &mut self,
        parent_id: &str,
        name: &str,
        url: &str,
        thumbnail: &str,
    ) -> StoreResult<String> {
        ensure_not_blank(name, "item name")?;
        let id = new_node_id();
        let node = Node::Item(Item {
            id: id.clone(),
            name: name.to_string(),
            url: url.to_string(),
            thumbnail: thumbnail.to_string(),
        });
        self.append_child(parent_id, node)?;
        Ok(id)
    }

    pub fn rename_folder(&mut self, folder_id: &str, new_name: &str) -> StoreResult<()> {
        ensure_not_blank(new_name, "folder name")?;
        self.expect_folder(folder_id)?;

        let before = self.root.clone();
        if let Some(folder) = find_node_mut(&mut self.root, folder_id).and_then(Node::as_folder_mut) {
            folder.name = new_name.to_string();
        }
        self.persist_or_rollback(before)
    }

    pub fn rename_item(&mut self, item_id: &str, new_name: &str) -> StoreResult<()> {
        ensure_not_blank(new_name, "item name")?;
        self.expect_item(item_id)?;

        let before = self.root.clone();
        if let Some(item) = find_node_mut(&mut self.root, item_id).and_then(Node::as_item_mut) {
            item.name = new_name.to_string();
        }
        self.persist_or_rollback(before)
    }

    /// Removes the folder and its entire subtree. The root folder is
    /// protected.
    pub fn delete_folder(&mut self, folder_id: &str) -> StoreResult<()> {
        if folder_id == ROOT_ID {
            return Err(StoreError::InvalidOperation(
                "The root folder cannot be deleted".to_string(),
            ));
        }
        self.expect_folder(folder_id)?;

        let before = self.root.clone();
        if detach_node(&mut self.root, folder_id).is_none() {
            return Err(StoreError::NotFound(format!(
                "Folder '{}' is not attached to any parent",
                folder_id
            )));
        }
        self.persist_or_rollback(before)
    }

    pub fn delete_item(&mut self, item_id: &str) -> StoreResult<()> {
        self.expect_item(item_id)?;

        let before = self.root.clone();
        if detach_node(&mut self.root, item_id).is_none() {
            return Err(StoreError::NotFound(format!(
                "Item '{}' is not attached to any parent",
                item_id
            )));
        }
        self.persist_or_rollback(before)
    }

    /// Detaches the item from its current parent and appends it to the
    /// target folder. Folders cannot be moved: re-parenting a subtree
    /// without an ancestor check could make a folder its own descendant,
    /// so the operation only accepts items.
    pub fn move_item(&mut self, item_id: &str, target_folder_id: &str) -> StoreResult<()> {
        self.expect_item(item_id)?;
        self.expect_folder(target_folder_id)?;
        if self.find_parent(item_id).is_none() {
            return Err(StoreError::NotFound(format!(
                "Item '{}' is not attached to any parent",
                item_id
            )));
        }

        let before = self.root.clone();
        let Some(item) = detach_node(&mut self.root, item_id) else {
            return Err(StoreError::NotFound(format!(
                "Item '{}' is not attached to any parent",
                item_id
            )));
        };
        match find_node_mut(&mut self.root, target_folder_id).and_then(Node::as_folder_mut) {
            Some(target) => target.children.push(item),
            None => {
                self.root = before;
                return Err(StoreError::NotFound(format!(
                    "No folder with id '{}'",
                    target_folder_id
                )));
            }
        }
        self.persist_or_rollback(before)
    }

    /// Applies only the supplied fields. A supplied blank name or url is
    /// rejected; a supplied empty thumbnail is a valid explicit value.
    pub fn update_item(&mut self, item_id: &str, patch: ItemPatch) -> StoreResult<()> {
        if let Some(name) = patch.name.as_deref() {
            ensure_not_blank(name, "item name")?;
        }
        if let Some(url) = patch.url.as_deref() {
            ensure_not_blank(url, "item url")?;
        }
        self.expect_item(item_id)?;

        let before = self.root.clone();
        if let Some(item) = find_node_mut(&mut self.root, item_id).and_then(Node::as_item_mut) {
            if let Some(name) = patch.name {
                item.name = name;
            }
            if let Some(url) = patch.url {
                item.url = url;
            }
            if let Some(thumbnail) = patch.thumbnail {
                item.thumbnail = thumbnail;
            }
        }
        self.persist_or_rollback(before)
    }

    /// Serializes the whole tree and replaces the backing document via a
    /// sibling temp file and rename, so a crash mid-write cannot leave a
    /// truncated document behind.
    pub fn save(&self) -> StoreResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.root)?;
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &self.file_path)?;
        tracing::debug!(path = %self.file_path.to_string_lossy(), "favorites tree persisted");
        Ok(())
    }

    fn append_child(&mut self, parent_id: &str, node: Node) -> StoreResult<()> {
        self.expect_folder(parent_id)?;

        let before = self.root.clone();
        if let Some(parent) = find_node_mut(&mut self.root, parent_id).and_then(Node::as_folder_mut) {
            parent.children.push(node);
        }
        self.persist_or_rollback(before)
    }

    fn persist_or_rollback(&mut self, before: Node) -> StoreResult<()> {
        if let Err(error) = self.save() {
            self.root = before;
            return Err(error);
        }
        Ok(())
    }

    fn expect_folder(&self, id: &str) -> StoreResult<()> {
        match self.find(id) {
            Some(Node::Folder(_)) => Ok(()),
            Some(Node::Item(_)) => Err(StoreError::WrongKind(format!(
                "'{}' is an item, expected a folder",
                id
            ))),
            None => Err(StoreError::NotFound(format!("No node with id '{}'", id))),
        }
    }

    fn expect_item(&self, id: &str) -> StoreResult<()> {
        match self.find(id) {
            Some(Node::Item(_)) => Ok(()),
            Some(Node::Folder(_)) => Err(StoreError::WrongKind(format!(
                "'{}' is a folder, expected an item",
                id
            ))),
            None => Err(StoreError::NotFound(format!("No node with id '{}'", id))),
        }
    }
}

fn new_node_id() -> String {
    Uuid::new_v4().to_string()
}

fn ensure_not_blank(value: &str, field: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidOperation(format!(
            "A {} cannot be blank",
            field
        )));
    }
    Ok(())
}

fn load_tree(path: &Path) -> Node {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.to_string_lossy(), "no favorites file yet, starting empty");
            return Node::Folder(Folder::empty_root());
        }
        Err(error) => {
            tracing::warn!(
                path = %path.to_string_lossy(),
                error = %error,
                "unreadable favorites file, falling back to an empty tree"
            );
            return Node::Folder(Folder::empty_root());
        }
    };

    match serde_json::from_slice::<Node>(&bytes) {
        Ok(Node::Folder(folder)) if folder.id == ROOT_ID => Node::Folder(folder),
        Ok(_) => {
            tracing::warn!(
                path = %path.to_string_lossy(),
                "favorites file does not start at the root folder, falling back to an empty tree"
            );
            Node::Folder(Folder::empty_root())
        }
        Err(error) => {
            tracing::warn!(
                path = %path.to_string_lossy(),
                error = %error,
                "malformed favorites file, falling back to an empty tree"
            );
            Node::Folder(Folder::empty_root())
        }
    }
}

fn find_node<'a>(node: &'a Node, target_id: &str) -> Option<&'a Node> {
    if node.id() == target_id {
        return Some(node);
    }
    match node {
        Node::Folder(folder) => folder
            .children
            .iter()
            .find_map(|child| find_node(child, target_id)),
        Node::Item(_) => None,
    }
}

fn find_node_mut<'a>(node: &'a mut Node, target_id: &str) -> Option<&'a mut Node> {
    if node.id() == target_id {
        return Some(node);
    }
    match node {
        Node::Folder(folder) => folder
            .children
            .iter_mut()
            .find_map(|child| find_node_mut(child, target_id)),
        Node::Item(_) => None,
    }
}

fn find_parent<'a>(node: &'a Node, target_id: &str) -> Option<&'a Folder> {
    let folder = node.as_folder()?;
    if folder.children.iter().any(|child| child.id() == target_id) {
        return Some(folder);
    }
    folder
        .children
        .iter()
        .find_map(|child| find_parent(child, target_id))
}

fn detach_node(node: &mut Node, target_id: &str) -> Option<Node> {
    let Node::Folder(folder) = node else {
        return None;
    };
    if let Some(index) = folder
        .children
        .iter()
        .position(|child| child.id() == target_id)
    {
        return Some(folder.children.remove(index));
    }
    folder
        .children
        .iter_mut()
        .find_map(|child| detach_node(child, target_id))
}

fn collect_folders(node: &Node, depth: usize, entries: &mut Vec<FolderEntry>) {
    if let Node::Folder(folder) = node {
        entries.push(FolderEntry {
            id: folder.id.clone(),
            name: folder.name.clone(),
            depth,
        });
        for child in &folder.children {
            collect_folders(child, depth + 1, entries);
        }
    }
}

//! In-memory backend.
//!
//! A small tree-of-nodes store used by the demo binary and the test
//! suites. Resources are cheap views over the shared tree; every
//! operation re-navigates so concurrent mutations are always visible.

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use kunai_rfc::rfc::dav::core::{LockEntry, QName};

use crate::error::{EngineError, EngineResult};
use crate::resource::{
    Backend, Collection, Principal, Resource, collection_type, principal_type,
};

#[derive(Debug, Clone)]
enum NodeKind {
    File {
        body: Vec<u8>,
        content_type: Option<String>,
        etag: String,
    },
    Collection {
        children: BTreeMap<String, Node>,
        principal: bool,
    },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    display_name: Option<String>,
    owner: Option<String>,
    created: DateTime<Utc>,
}

impl Node {
    fn collection(principal: bool) -> Self {
        Self {
            kind: NodeKind::Collection {
                children: BTreeMap::new(),
                principal,
            },
            display_name: None,
            owner: None,
            created: Utc::now(),
        }
    }

    fn file(body: Vec<u8>, content_type: Option<String>, etag: String) -> Self {
        Self {
            kind: NodeKind::File {
                body,
                content_type,
                etag,
            },
            display_name: None,
            owner: None,
            created: Utc::now(),
        }
    }

    fn descend(&self, segments: &[String]) -> Option<&Self> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };
        match &self.kind {
            NodeKind::Collection { children, .. } => children.get(first)?.descend(rest),
            NodeKind::File { .. } => None,
        }
    }

    fn descend_mut(&mut self, segments: &[String]) -> Option<&mut Self> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };
        match &mut self.kind {
            NodeKind::Collection { children, .. } => children.get_mut(first)?.descend_mut(rest),
            NodeKind::File { .. } => None,
        }
    }
}

fn compute_etag(body: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// An in-memory [`Backend`] over a shared node tree.
#[derive(Clone)]
pub struct MemBackend {
    root: Arc<RwLock<Node>>,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemBackend {
    /// Creates a backend with an empty root collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(RwLock::new(Node::collection(false))),
        }
    }

    /// Creates a collection at the given path.
    ///
    /// ## Errors
    /// Returns an error if the parent does not exist or is not a
    /// collection.
    pub fn mkcol(&self, path: &str) -> EngineResult<()> {
        self.insert(path, Node::collection(false))
    }

    /// Creates a principal collection at the given path.
    ///
    /// ## Errors
    /// Returns an error if the parent does not exist.
    pub fn add_principal(&self, path: &str) -> EngineResult<()> {
        self.insert(path, Node::collection(true))
    }

    /// Creates or replaces a file at the given path.
    ///
    /// ## Errors
    /// Returns an error if the parent does not exist.
    pub fn put_file(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: Option<String>,
    ) -> EngineResult<()> {
        let etag = compute_etag(&body);
        self.insert(path, Node::file(body, content_type, etag))
    }

    /// Creates a file with a caller-chosen ETag.
    ///
    /// ## Errors
    /// Returns an error if the parent does not exist.
    pub fn put_file_with_etag(&self, path: &str, body: Vec<u8>, etag: &str) -> EngineResult<()> {
        self.insert(path, Node::file(body, None, etag.to_owned()))
    }

    /// Sets the owner href of an existing resource.
    ///
    /// ## Errors
    /// Returns an error if the path does not exist.
    pub fn set_owner(&self, path: &str, owner: &str) -> EngineResult<()> {
        self.with_node_mut(path, |node| {
            node.owner = Some(owner.to_owned());
        })
    }

    fn insert(&self, path: &str, node: Node) -> EngineResult<()> {
        let segments = split_segments(path);
        let Some((name, parent)) = segments.split_last() else {
            return Err(EngineError::Backend("cannot replace the root".to_owned()));
        };

        let mut root = self
            .root
            .write()
            .map_err(|_| EngineError::Backend("store lock poisoned".to_owned()))?;
        let parent = root
            .descend_mut(parent)
            .ok_or_else(|| EngineError::Backend(format!("missing parent for {path}")))?;
        match &mut parent.kind {
            NodeKind::Collection { children, .. } => {
                children.insert(name.clone(), node);
                Ok(())
            }
            NodeKind::File { .. } => Err(EngineError::NotACollection),
        }
    }

    fn with_node_mut(&self, path: &str, f: impl FnOnce(&mut Node)) -> EngineResult<()> {
        let segments = split_segments(path);
        let mut root = self
            .root
            .write()
            .map_err(|_| EngineError::Backend("store lock poisoned".to_owned()))?;
        let node = root
            .descend_mut(&segments)
            .ok_or_else(|| EngineError::Backend(format!("no such path: {path}")))?;
        f(node);
        Ok(())
    }
}

impl Backend for MemBackend {
    fn resolve(&self, path: &str) -> Option<Arc<dyn Resource>> {
        let segments = split_segments(path);
        let root = self.root.read().ok()?;
        root.descend(&segments)?;
        drop(root);

        Some(Arc::new(MemResource {
            store: Arc::clone(&self.root),
            segments,
        }))
    }
}

/// A view over one node of a [`MemBackend`].
struct MemResource {
    store: Arc<RwLock<Node>>,
    segments: Vec<String>,
}

impl MemResource {
    fn name(&self) -> String {
        self.segments.last().cloned().unwrap_or_else(|| "/".to_owned())
    }

    fn path(&self) -> String {
        let mut path = String::from("/");
        path.push_str(&self.segments.join("/"));
        path
    }

    fn read<T>(&self, f: impl FnOnce(&Node) -> T) -> EngineResult<T> {
        let root = self
            .store
            .read()
            .map_err(|_| EngineError::Backend("store lock poisoned".to_owned()))?;
        let node = root
            .descend(&self.segments)
            .ok_or_else(|| EngineError::Backend(format!("resource vanished: {}", self.path())))?;
        Ok(f(node))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Node) -> T) -> EngineResult<T> {
        let mut root = self
            .store
            .write()
            .map_err(|_| EngineError::Backend("store lock poisoned".to_owned()))?;
        let node = root
            .descend_mut(&self.segments)
            .ok_or_else(|| EngineError::Backend(format!("resource vanished: {}", self.path())))?;
        Ok(f(node))
    }

    fn kind_flags(&self) -> (bool, bool) {
        self.read(|node| match &node.kind {
            NodeKind::Collection { principal, .. } => (true, *principal),
            NodeKind::File { .. } => (false, false),
        })
        .unwrap_or((false, false))
    }

    fn child(&self, name: &str) -> Arc<dyn Resource> {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        Arc::new(MemResource {
            store: Arc::clone(&self.store),
            segments,
        })
    }
}

impl Resource for MemResource {
    fn resource_types(&self) -> Vec<QName> {
        let (is_collection, is_principal) = self.kind_flags();
        let mut types = Vec::new();
        if is_collection {
            types.push(collection_type());
        }
        if is_principal {
            types.push(principal_type());
        }
        types
    }

    fn display_name(&self) -> Option<String> {
        self.read(|node| node.display_name.clone())
            .ok()
            .flatten()
            .or_else(|| Some(self.name()))
    }

    fn set_display_name(&self, name: &str) -> EngineResult<()> {
        // An empty name clears the override and restores the fallback.
        self.write(|node| {
            node.display_name = (!name.is_empty()).then(|| name.to_owned());
        })
    }

    fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.read(|node| node.created).ok()
    }

    fn content_type(&self) -> Option<String> {
        self.read(|node| match &node.kind {
            NodeKind::File { content_type, .. } => content_type.clone(),
            NodeKind::Collection { .. } => None,
        })
        .ok()
        .flatten()
    }

    fn content_length(&self) -> Option<u64> {
        self.read(|node| match &node.kind {
            NodeKind::File { body, .. } => u64::try_from(body.len()).ok(),
            NodeKind::Collection { .. } => None,
        })
        .ok()
        .flatten()
    }

    fn etag(&self) -> Option<String> {
        self.read(|node| match &node.kind {
            NodeKind::File { etag, .. } => Some(etag.clone()),
            NodeKind::Collection { .. } => None,
        })
        .ok()
        .flatten()
    }

    fn owner_href(&self) -> Option<String> {
        self.read(|node| node.owner.clone()).ok().flatten()
    }

    fn body(&self) -> EngineResult<Vec<u8>> {
        self.read(|node| match &node.kind {
            NodeKind::File { body, .. } => body.clone(),
            NodeKind::Collection { .. } => Vec::new(),
        })
    }

    fn set_body(&self, body: Vec<u8>, content_type: Option<String>) -> EngineResult<()> {
        self.write(|node| match &mut node.kind {
            NodeKind::File {
                body: stored,
                content_type: stored_type,
                etag,
            } => {
                *etag = compute_etag(&body);
                *stored = body;
                if content_type.is_some() {
                    *stored_type = content_type;
                }
                Ok(())
            }
            NodeKind::Collection { .. } => Err(EngineError::Backend(
                "collections have no body to replace".to_owned(),
            )),
        })?
    }

    fn supported_locks(&self) -> Vec<LockEntry> {
        vec![LockEntry::EXCLUSIVE_WRITE, LockEntry::SHARED_WRITE]
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        let (is_collection, _) = self.kind_flags();
        is_collection.then_some(self as &dyn Collection)
    }

    fn as_principal(&self) -> Option<&dyn Principal> {
        let (_, is_principal) = self.kind_flags();
        is_principal.then_some(self as &dyn Principal)
    }
}

impl Collection for MemResource {
    fn members(&self) -> EngineResult<Vec<(String, Arc<dyn Resource>)>> {
        let names = self.read(|node| match &node.kind {
            NodeKind::Collection { children, .. } => children.keys().cloned().collect::<Vec<_>>(),
            NodeKind::File { .. } => Vec::new(),
        })?;

        Ok(names
            .into_iter()
            .map(|name| {
                let child = self.child(&name);
                (name, child)
            })
            .collect())
    }

    fn member(&self, name: &str) -> EngineResult<Option<Arc<dyn Resource>>> {
        let exists = self.read(|node| match &node.kind {
            NodeKind::Collection { children, .. } => children.contains_key(name),
            NodeKind::File { .. } => false,
        })?;
        Ok(exists.then(|| self.child(name)))
    }

    fn create_member(
        &self,
        name: &str,
        body: Vec<u8>,
        content_type: Option<String>,
    ) -> EngineResult<Arc<dyn Resource>> {
        let etag = compute_etag(&body);
        self.write(|node| match &mut node.kind {
            NodeKind::Collection { children, .. } => {
                children.insert(name.to_owned(), Node::file(body, content_type, etag));
                Ok(())
            }
            NodeKind::File { .. } => Err(EngineError::NotACollection),
        })??;
        Ok(self.child(name))
    }

    fn delete_member(&self, name: &str) -> EngineResult<()> {
        self.write(|node| match &mut node.kind {
            NodeKind::Collection { children, .. } => match children.remove(name) {
                Some(_) => Ok(()),
                None => Err(EngineError::Backend(format!("no such member: {name}"))),
            },
            NodeKind::File { .. } => Err(EngineError::NotACollection),
        })?
    }

    fn create_collection(&self, name: &str) -> EngineResult<()> {
        self.write(|node| match &mut node.kind {
            NodeKind::Collection { children, .. } => {
                children.insert(name.to_owned(), Node::collection(false));
                Ok(())
            }
            NodeKind::File { .. } => Err(EngineError::NotACollection),
        })?
    }
}

impl Principal for MemResource {
    fn principal_url(&self) -> String {
        let mut url = self.path();
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }
}

//! A page: an ordered list of shapes (paint order) plus bindings.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::shape::{SerializedShape, Shape, ShapeId, ShapeRegistry};

/// A connection between two shapes, carried through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub id: String,
    pub from_id: ShapeId,
    pub to_id: ShapeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedPage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub shapes: Vec<SerializedShape>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub nonce: u64,
}

#[derive(Debug, Clone)]
pub struct Page {
    id: String,
    name: String,
    shapes: Vec<Shape>,
    bindings: Vec<Binding>,
    nonce: u64,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), shapes: Vec::new(), bindings: Vec::new(), nonce: 0 }
    }

    /// Rebuild a page from its record, checking every shape's class.
    ///
    /// # Errors
    ///
    /// Fails on unregistered shape types, duplicate ids, or missing parents.
    pub fn from_serialized(record: &SerializedPage, registry: &ShapeRegistry) -> Result<Self> {
        let mut page = Self::new(record.id.clone(), record.name.clone());
        let shapes = record
            .shapes
            .iter()
            .map(|s| registry.check(s).map(|()| Shape::from_serialized(s.clone())))
            .collect::<Result<Vec<_>>>()?;
        page.insert_checked(shapes)?;
        page.bindings.clone_from(&record.bindings);
        page.nonce = record.nonce;
        Ok(page)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.bump();
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Shapes in paint order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub(crate) fn shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Install a rebuilt shape list wholesale, as when loading a snapshot.
    pub(crate) fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub(crate) fn take_shapes(&mut self) -> Vec<Shape> {
        std::mem::take(&mut self.shapes)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.shape(id).is_some()
    }

    /// Append shapes on top of the paint order.
    ///
    /// # Errors
    ///
    /// [`EditorError::DuplicateShape`] when an id is already on the page and
    /// [`EditorError::OrphanShape`] when a parent is neither this page nor a
    /// shape on it. Nothing is added on error.
    pub fn add_shapes(&mut self, shapes: Vec<Shape>) -> Result<Vec<ShapeId>> {
        if shapes.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self.insert_checked(shapes)?;
        self.bump();
        Ok(ids)
    }

    /// Check that re-parenting shapes keeps every shape rooted at this page.
    /// `moves` pairs shape ids with their proposed parents and is judged as
    /// one batch.
    ///
    /// # Errors
    ///
    /// [`EditorError::OrphanShape`] when a parent is neither this page nor a
    /// shape on it, [`EditorError::ParentCycle`] when a shape would end up
    /// under itself or one of its descendants.
    pub fn check_parents<'a>(&'a self, moves: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<()> {
        let mut parents: HashMap<&str, &str> = self.shapes.iter().map(|s| (s.id(), s.parent_id())).collect();
        let mut moved = Vec::new();
        for (id, parent) in moves {
            if parent != self.id && !parents.contains_key(parent) {
                return Err(EditorError::OrphanShape { id: id.to_owned(), parent: parent.to_owned() });
            }
            parents.insert(id, parent);
            moved.push(id);
        }
        for id in moved {
            let mut cursor = parents.get(id).copied();
            for _ in 0..parents.len() {
                let Some(parent) = cursor else {
                    break;
                };
                if parent == id {
                    let direct = parents.get(id).copied().unwrap_or_default();
                    return Err(EditorError::ParentCycle { id: id.to_owned(), parent: direct.to_owned() });
                }
                if parent == self.id {
                    break;
                }
                cursor = parents.get(parent).copied();
            }
        }
        Ok(())
    }

    fn insert_checked(&mut self, shapes: Vec<Shape>) -> Result<Vec<ShapeId>> {
        let mut known: HashSet<&str> = self.shapes.iter().map(Shape::id).collect();
        for shape in &shapes {
            if !known.insert(shape.id()) {
                return Err(EditorError::DuplicateShape { id: shape.id().to_owned(), page: self.id.clone() });
            }
        }
        for shape in &shapes {
            let parent = shape.parent_id();
            if parent != self.id && !known.contains(parent) {
                return Err(EditorError::OrphanShape { id: shape.id().to_owned(), parent: parent.to_owned() });
            }
        }
        let ids: Vec<ShapeId> = shapes.iter().map(|s| s.id().to_owned()).collect();
        self.shapes.extend(shapes);
        Ok(ids)
    }

    /// Remove shapes and, transitively, their children. Bindings touching a
    /// removed shape go too. Returns the removed ids in paint order.
    pub fn remove_shapes(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let mut doomed: HashSet<String> = ids.iter().filter(|id| self.contains(id)).cloned().collect();
        loop {
            let before = doomed.len();
            for shape in &self.shapes {
                if doomed.contains(shape.parent_id()) {
                    doomed.insert(shape.id().to_owned());
                }
            }
            if doomed.len() == before {
                break;
            }
        }
        if doomed.is_empty() {
            return Vec::new();
        }

        let removed: Vec<ShapeId> = self.shapes.iter().filter(|s| doomed.contains(s.id())).map(|s| s.id().to_owned()).collect();
        self.shapes.retain(|s| !doomed.contains(s.id()));
        self.bindings.retain(|b| !doomed.contains(&b.from_id) && !doomed.contains(&b.to_id));
        self.bump();
        removed
    }

    pub fn add_binding(&mut self, binding: Binding) {
        self.bindings.retain(|b| b.id != binding.id);
        self.bindings.push(binding);
        self.bump();
    }

    pub fn remove_binding(&mut self, id: &str) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        let removed = before != self.bindings.len();
        if removed {
            self.bump();
        }
        removed
    }

    pub(crate) fn bump(&mut self) {
        self.nonce += 1;
    }

    #[must_use]
    pub fn serialized(&self) -> SerializedPage {
        SerializedPage {
            id: self.id.clone(),
            name: self.name.clone(),
            shapes: self.shapes.iter().map(|s| s.serialized().clone()).collect(),
            bindings: self.bindings.clone(),
            nonce: self.nonce,
        }
    }
}

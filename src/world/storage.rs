use crate::bodies::{Body, BodyId};
use crate::error::EngineError;
use crate::Result;

/// Registration-ordered storage for the world's bodies.
///
/// Bodies carry their own ids; ids must be unique within one world, so
/// duplicate registration is an error rather than a silent replace.
/// Iteration follows registration order, which keeps debug snapshots
/// deterministic. The body count tracks visible page elements, so lookups
/// stay linear.
#[derive(Default)]
pub struct BodyStorage {
    bodies: Vec<Box<dyn Body>>,
}

impl BodyStorage {
    /// Creates empty storage
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    /// Registers a body under its own id
    pub fn insert(&mut self, body: Box<dyn Body>) -> Result<()> {
        let id = body.id();
        if self.bodies.iter().any(|b| b.id() == id) {
            return Err(EngineError::DuplicateBody(id));
        }
        self.bodies.push(body);
        Ok(())
    }

    /// Unregisters and returns a body
    pub fn remove(&mut self, id: BodyId) -> Result<Box<dyn Body>> {
        let index = self
            .bodies
            .iter()
            .position(|b| b.id() == id)
            .ok_or(EngineError::BodyNotFound(id))?;
        Ok(self.bodies.remove(index))
    }

    /// Gets a body by id
    pub fn get(&self, id: BodyId) -> Result<&dyn Body> {
        self.bodies
            .iter()
            .find(|b| b.id() == id)
            .map(|b| b.as_ref())
            .ok_or(EngineError::BodyNotFound(id))
    }

    /// Gets a mutable body by id
    pub fn get_mut(&mut self, id: BodyId) -> Result<&mut (dyn Body + 'static)> {
        self.bodies
            .iter_mut()
            .find(|b| b.id() == id)
            .map(|b| b.as_mut())
            .ok_or(EngineError::BodyNotFound(id))
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Removes every body
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Iterates bodies in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Box<dyn Body>> {
        self.bodies.iter()
    }

    /// Mutably iterates bodies in registration order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Body>> {
        self.bodies.iter_mut()
    }
}

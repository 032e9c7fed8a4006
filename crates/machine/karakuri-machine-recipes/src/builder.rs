//! Name-addressed machine assembly with wiring validation.

use std::collections::VecDeque;

use hashbrown::HashMap;

use karakuri_machine_core::{Machine, Part, PartId};

use crate::error::RecipeError;

/// Assembles a [`Machine`] from named parts and named edges.
///
/// The builder adds what the bare machine cannot: parts addressed by
/// name instead of handle, duplicate-name rejection, and a cycle check
/// over the rotation wiring (belts included) when the machine is
/// finished. Trigger edges fire at most once and cannot loop, so they
/// stay out of the cycle check.
pub struct MachineBuilder {
    machine: Machine,
    names: HashMap<String, PartId>,
    rotation_edges: Vec<(PartId, PartId)>,
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineBuilder {
    pub fn new() -> Self {
        Self {
            machine: Machine::new(),
            names: HashMap::new(),
            rotation_edges: Vec::new(),
        }
    }

    /// Add a part under `name`. Container order is the order of these
    /// calls, which is also draw order.
    pub fn add_part(
        &mut self,
        name: impl Into<String>,
        part: Box<dyn Part>,
    ) -> Result<PartId, RecipeError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(RecipeError::DuplicateName { name });
        }
        let id = self.machine.add_part(part);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Handle for a previously added part.
    pub fn id(&self, name: &str) -> Result<PartId, RecipeError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| RecipeError::UnknownName {
                name: name.to_string(),
            })
    }

    pub fn connect_rotation(&mut self, driver: &str, sink: &str) -> Result<(), RecipeError> {
        let driver = self.id(driver)?;
        let sink = self.id(sink)?;
        self.machine.connect_rotation(driver, sink)?;
        self.rotation_edges.push((driver, sink));
        Ok(())
    }

    /// Belts carry rotation, so they join the cycle check alongside the
    /// plain rotation edges.
    pub fn connect_belt(&mut self, driving: &str, driven: &str) -> Result<(), RecipeError> {
        let driving = self.id(driving)?;
        let driven = self.id(driven)?;
        self.machine.connect_belt(driving, driven)?;
        self.rotation_edges.push((driving, driven));
        Ok(())
    }

    pub fn connect_trigger(&mut self, emitter: &str, listener: &str) -> Result<(), RecipeError> {
        let emitter = self.id(emitter)?;
        let listener = self.id(listener)?;
        self.machine.connect_trigger(emitter, listener)?;
        Ok(())
    }

    /// Validate the rotation wiring and hand over the machine.
    pub fn finish(self) -> Result<Machine, RecipeError> {
        self.check_acyclic()?;
        Ok(self.machine)
    }

    /// Kahn's algorithm over the rotation edges. Parts left with a
    /// nonzero indegree sit on a cycle.
    fn check_acyclic(&self) -> Result<(), RecipeError> {
        let count = self.machine.len();
        let mut indeg = vec![0usize; count];
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); count];
        for &(driver, sink) in &self.rotation_edges {
            adj[driver.index()].push(sink.index());
            indeg[sink.index()] += 1;
        }

        let mut q: VecDeque<usize> = (0..count).filter(|&i| indeg[i] == 0).collect();
        let mut visited = 0usize;
        while let Some(u) = q.pop_front() {
            visited += 1;
            for &v in &adj[u] {
                indeg[v] -= 1;
                if indeg[v] == 0 {
                    q.push_back(v);
                }
            }
        }

        if visited == count {
            return Ok(());
        }
        let culprit = indeg.iter().position(|&d| d > 0).unwrap_or_default();
        let name = self
            .names
            .iter()
            .find(|(_, id)| id.index() == culprit)
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        Err(RecipeError::RotationCycle { name })
    }
}

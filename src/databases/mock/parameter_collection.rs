//! The ordered parameter set attached to a command.
//!
//! Names are matched case-insensitively and the first match in insertion order
//! wins. Entries are unique by identity: the same [`Parameter`] instance (or a
//! clone of it) can only be present once, though two distinct parameters may
//! share a name.
//!
//! The `_object` variants take type-erased values so callers holding
//! `Box<dyn Any>` get a [`MockDbError::TypeMismatch`] instead of a compile
//! error when they pass something that is not a parameter.

use std::any::Any;
use std::collections::HashSet;

use log::debug;

use super::parameter::Parameter;
use crate::errors::{MockDbError, MockDbResult};
use crate::table::names_match;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterCollection {
    items: Vec<Parameter>,
}

fn downcast_parameter(value: Box<dyn Any>) -> MockDbResult<Parameter> {
    value
        .downcast::<Parameter>()
        .map(|p| *p)
        .map_err(|_| MockDbError::type_mismatch::<Parameter>("a value that is not a Parameter"))
}

impl ParameterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_absent(&self, parameter: &Parameter) -> MockDbResult<()> {
        if self.contains(parameter) {
            return Err(MockDbError::Duplicate(format!(
                "parameter {} ('{}') is already in the collection",
                parameter.id(),
                parameter.name
            )));
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> MockDbResult<()> {
        if index >= self.items.len() {
            return Err(MockDbError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Append a parameter and return its index.
    pub fn add(&mut self, parameter: Parameter) -> MockDbResult<usize> {
        self.ensure_absent(&parameter)?;
        debug!("ParameterCollection: adding '{}'", parameter.name);
        self.items.push(parameter);
        Ok(self.items.len() - 1)
    }

    pub fn add_object(&mut self, value: Box<dyn Any>) -> MockDbResult<usize> {
        self.add(downcast_parameter(value)?)
    }

    /// Append every parameter, or none of them.
    pub fn add_range(&mut self, parameters: Vec<Parameter>) -> MockDbResult<()> {
        let mut seen = HashSet::with_capacity(parameters.len());
        for parameter in &parameters {
            self.ensure_absent(parameter)?;
            if !seen.insert(parameter.id()) {
                return Err(MockDbError::Duplicate(format!(
                    "parameter {} ('{}') appears twice in the batch",
                    parameter.id(),
                    parameter.name
                )));
            }
        }

        debug!("ParameterCollection: adding {} parameter(s)", parameters.len());
        self.items.extend(parameters);
        Ok(())
    }

    pub fn add_range_objects(&mut self, values: Vec<Box<dyn Any>>) -> MockDbResult<()> {
        let parameters = values
            .into_iter()
            .map(downcast_parameter)
            .collect::<MockDbResult<Vec<_>>>()?;
        self.add_range(parameters)
    }

    /// Insert at `index`, shifting later entries back. `index == len` appends.
    pub fn insert(&mut self, index: usize, parameter: Parameter) -> MockDbResult<()> {
        self.ensure_absent(&parameter)?;
        if index > self.items.len() {
            return Err(MockDbError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, parameter);
        Ok(())
    }

    pub fn insert_object(&mut self, index: usize, value: Option<Box<dyn Any>>) -> MockDbResult<()> {
        let value = value.ok_or(MockDbError::NullArgument("value"))?;
        self.insert(index, downcast_parameter(value)?)
    }

    /// Remove by identity. Returns whether anything was removed.
    pub fn remove(&mut self, parameter: &Parameter) -> bool {
        match self.index_of(parameter) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> MockDbResult<Parameter> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Remove the first parameter whose name matches.
    pub fn remove_named(&mut self, name: &str) -> MockDbResult<Parameter> {
        let index = self
            .index_of_name(name)
            .ok_or_else(|| MockDbError::NotFound(format!("parameter '{}'", name)))?;
        Ok(self.items.remove(index))
    }

    pub fn index_of(&self, parameter: &Parameter) -> Option<usize> {
        self.items.iter().position(|p| p.is_same(parameter))
    }

    /// Position of the first case-insensitive name match. Blank names never match.
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        if name.trim().is_empty() {
            return None;
        }
        self.items.iter().position(|p| names_match(&p.name, name))
    }

    pub fn contains(&self, parameter: &Parameter) -> bool {
        self.index_of(parameter).is_some()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.index_of_name(name).is_some()
    }

    pub fn get(&self, index: usize) -> MockDbResult<&Parameter> {
        self.check_index(index)?;
        Ok(&self.items[index])
    }

    pub fn get_mut(&mut self, index: usize) -> MockDbResult<&mut Parameter> {
        self.check_index(index)?;
        Ok(&mut self.items[index])
    }

    pub fn get_named(&self, name: &str) -> MockDbResult<&Parameter> {
        let index = self
            .index_of_name(name)
            .ok_or_else(|| MockDbError::NotFound(format!("parameter '{}'", name)))?;
        Ok(&self.items[index])
    }

    pub fn get_named_mut(&mut self, name: &str) -> MockDbResult<&mut Parameter> {
        let index = self
            .index_of_name(name)
            .ok_or_else(|| MockDbError::NotFound(format!("parameter '{}'", name)))?;
        Ok(&mut self.items[index])
    }

    /// Replace the parameter at `index`.
    pub fn set(&mut self, index: usize, parameter: Parameter) -> MockDbResult<()> {
        self.check_index(index)?;
        if let Some(existing) = self.index_of(&parameter)
            && existing != index
        {
            return Err(MockDbError::Duplicate(format!(
                "parameter {} is already at index {}",
                parameter.id(),
                existing
            )));
        }
        self.items[index] = parameter;
        Ok(())
    }

    /// Replace the first parameter named `name`, or append when none matches.
    pub fn set_named(&mut self, name: &str, parameter: Parameter) -> MockDbResult<()> {
        match self.index_of_name(name) {
            Some(index) => self.set(index, parameter),
            None => self.add(parameter).map(|_| ()),
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.items.iter()
    }

    /// Copy every parameter into `target`, starting at `start`.
    pub fn copy_to(&self, target: &mut [Option<Parameter>], start: usize) -> MockDbResult<()> {
        let end = start
            .checked_add(self.items.len())
            .filter(|end| *end <= target.len())
            .ok_or(MockDbError::OutOfRange {
                index: start,
                len: target.len(),
            })?;

        for (slot, parameter) in target[start..end].iter_mut().zip(&self.items) {
            *slot = Some(parameter.clone());
        }
        Ok(())
    }

    /// Like [`copy_to`](Self::copy_to) for a type-erased target.
    ///
    /// Accepts a `Vec<Option<Parameter>>` or a `Box<[Option<Parameter>]>`.
    pub fn copy_to_object(&self, target: &mut dyn Any, start: usize) -> MockDbResult<()> {
        if let Some(vec) = target.downcast_mut::<Vec<Option<Parameter>>>() {
            return self.copy_to(vec, start);
        }
        if let Some(slice) = target.downcast_mut::<Box<[Option<Parameter>]>>() {
            return self.copy_to(slice, start);
        }
        Err(MockDbError::type_mismatch::<[Option<Parameter>]>(
            "an array with a different element type",
        ))
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

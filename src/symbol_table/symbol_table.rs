use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Identifier of an environment inside a [`SymbolTable`].
pub type EnvironmentId = usize;

#[derive(Debug, Clone)]
pub struct Environment<T> {
    bindings: HashMap<String, T>,
    parent: Option<EnvironmentId>,
}

impl<T> Environment<T> {
    fn new(parent: Option<EnvironmentId>) -> Self {
        Environment {
            bindings: HashMap::new(),
            parent,
        }
    }
}

/// Scoped name bindings shared by the type checker and the interpreter.
///
/// Environments live in an arena and link to their parent by id. Lookups walk
/// from the active environment up to the root. The active environment can be
/// switched to any live id, which is how calls run in a child of the global
/// environment instead of the caller's.
#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    environments: Vec<Environment<T>>,
    current: Option<EnvironmentId>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl<T> SymbolTable<T> {
    pub fn new() -> Self {
        SymbolTable {
            environments: vec![],
            current: None,
        }
    }

    /// Pushes a child of the active environment and makes it active.
    pub fn push_environment(&mut self) -> EnvironmentId {
        let id = self.environments.len();
        self.environments.push(Environment::new(self.current));
        self.current = Some(id);
        id
    }

    /// Pops the active environment, returning to its parent.
    ///
    /// Pushes and pops nest, so the active environment is always the most
    /// recently created live one and everything from it onwards is dropped.
    pub fn pop_environment(&mut self) {
        if let Some(id) = self.current {
            self.current = self.environments[id].parent;
            self.environments.truncate(id);
        }
    }

    pub fn get_environment_id(&self) -> Option<EnvironmentId> {
        self.current
    }

    pub fn set_environment_id(&mut self, id: EnvironmentId) {
        self.current = Some(id);
    }

    /// Number of live environments.
    pub fn depth(&self) -> usize {
        self.environments.len()
    }

    /// Binds `name` in the active environment only.
    ///
    /// Fails if the active environment already binds `name`; bindings in
    /// enclosing environments may be shadowed freely.
    pub fn add_name(&mut self, name: &str, info: T, position: &Position) -> Result<(), Error> {
        if self.name_exists_in_current(name) {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.to_string(),
                },
                position.clone(),
            ));
        }

        if let Some(id) = self.current {
            self.environments[id].bindings.insert(name.to_string(), info);
        }

        Ok(())
    }

    pub fn name_exists_in_current(&self, name: &str) -> bool {
        self.current
            .is_some_and(|id| self.environments[id].bindings.contains_key(name))
    }

    pub fn name_exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn get_info(&self, name: &str) -> Option<&T> {
        self.find(name)
            .and_then(|id| self.environments[id].bindings.get(name))
    }

    /// Overwrites the nearest binding of `name`. Returns false if unbound.
    pub fn set_info(&mut self, name: &str, info: T) -> bool {
        match self.find(name) {
            Some(id) => {
                self.environments[id].bindings.insert(name.to_string(), info);
                true
            }
            None => false,
        }
    }

    /// Looks `name` up in environment `id` only, ignoring its ancestors and
    /// anything that shadows it further down.
    pub fn get_info_in(&self, id: EnvironmentId, name: &str) -> Option<&T> {
        self.environments
            .get(id)
            .and_then(|environment| environment.bindings.get(name))
    }

    /// Overwrites an existing binding of `name` in environment `id`.
    /// Returns false if that environment does not bind it.
    pub fn set_info_in(&mut self, id: EnvironmentId, name: &str, info: T) -> bool {
        match self.environments.get_mut(id) {
            Some(environment) if environment.bindings.contains_key(name) => {
                environment.bindings.insert(name.to_string(), info);
                true
            }
            _ => false,
        }
    }

    /// Id of the nearest environment binding `name`.
    fn find(&self, name: &str) -> Option<EnvironmentId> {
        let mut next = self.current;

        while let Some(id) = next {
            let environment = &self.environments[id];
            if environment.bindings.contains_key(name) {
                return Some(id);
            }
            next = environment.parent;
        }

        None
    }
}

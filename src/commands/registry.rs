//! Command specs, key bindings and the context chain

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::contexts::GLOBAL;
use crate::config::{KeyParseError, KeySequence};

/// A logical command owned by a context
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub context: String,
    pub longname: String,
    /// Human-readable form of what the command executes
    pub execstr: String,
    pub helpstr: String,
    pub replayable: bool,
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    parents: HashMap<String, String>,
    commands: Vec<Arc<CommandSpec>>,
    index: HashMap<(String, String), usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `context` inherits from `parent`
    pub fn set_parent(&mut self, context: &str, parent: &str) {
        self.parents.insert(context.to_string(), parent.to_string());
    }

    /// Contexts searched for `target`, nearest first, always ending in `global`
    pub fn chain(&self, target: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(target.to_string());
        while let Some(context) = current {
            if !seen.insert(context.clone()) {
                break;
            }
            current = self.parents.get(&context).cloned();
            chain.push(context);
        }
        if !seen.contains(GLOBAL) {
            chain.push(GLOBAL.to_string());
        }
        chain
    }

    /// Register a command, replacing any previous one with the same owner and name
    pub fn add(&mut self, spec: CommandSpec) {
        let key = (spec.context.clone(), spec.longname.clone());
        let spec = Arc::new(spec);
        match self.index.get(&key) {
            Some(&slot) => self.commands[slot] = spec,
            None => {
                self.index.insert(key, self.commands.len());
                self.commands.push(spec);
            }
        }
    }

    pub fn get(&self, context: &str, longname: &str) -> Option<Arc<CommandSpec>> {
        self.index
            .get(&(context.to_string(), longname.to_string()))
            .map(|&slot| self.commands[slot].clone())
    }

    /// Commands reachable from `target`, nearest owner first.
    ///
    /// A command shadowed by a nearer context with the same longname is skipped.
    pub fn iter(&self, target: &str) -> Vec<(String, Arc<CommandSpec>)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for context in self.chain(target) {
            for spec in self.commands.iter().filter(|s| s.context == context) {
                if seen.insert(spec.longname.clone()) {
                    out.push((context.clone(), spec.clone()));
                }
            }
        }
        out
    }

    /// Nearest command named `longname` reachable from `target`
    pub fn resolve(&self, target: &str, longname: &str) -> Option<Arc<CommandSpec>> {
        self.chain(target)
            .iter()
            .find_map(|context| self.get(context, longname))
    }
}

/// A keystroke sequence bound to a logical command within a context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub keys: KeySequence,
    pub context: String,
    pub longname: String,
}

#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: Vec<KeyBinding>,
    index: HashMap<(KeySequence, String), usize>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `keys` to `longname` in `context`, replacing an existing binding
    pub fn set(&mut self, keys: KeySequence, longname: &str, context: &str) {
        let binding = KeyBinding {
            keys: keys.clone(),
            context: context.to_string(),
            longname: longname.to_string(),
        };
        match self.index.get(&(keys.clone(), context.to_string())) {
            Some(&slot) => self.bindings[slot] = binding,
            None => {
                self.index.insert((keys, context.to_string()), self.bindings.len());
                self.bindings.push(binding);
            }
        }
    }

    /// Parse `notation` and bind it
    pub fn bind(
        &mut self,
        notation: &str,
        longname: &str,
        context: &str,
    ) -> Result<(), KeyParseError> {
        let keys: KeySequence = notation.parse()?;
        self.set(keys, longname, context);
        Ok(())
    }

    pub fn get(&self, keys: &KeySequence, context: &str) -> Option<&str> {
        self.index
            .get(&(keys.clone(), context.to_string()))
            .map(|&slot| self.bindings[slot].longname.as_str())
    }

    /// Bindings visible through `chain`, nearest context first
    pub fn iter(&self, chain: &[String]) -> Vec<KeyBinding> {
        chain
            .iter()
            .flat_map(|context| self.bindings.iter().filter(move |b| &b.context == context))
            .cloned()
            .collect()
    }

    /// Command bound to `keys`, searching `chain` nearest first
    pub fn resolve(&self, keys: &KeySequence, chain: &[String]) -> Option<String> {
        chain
            .iter()
            .find_map(|context| self.get(keys, context))
            .map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

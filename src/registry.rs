//! Function registry
//!
//! Maps a function name to its overloads. Overloads under one name are told
//! apart purely by their parameter types, so two overloads with the same
//! parameter list under the same name cannot be declared. Populated while an
//! environment is built, read-only afterwards.

use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Error;
use crate::func::{type_list, Overload};
use crate::value::Type;

#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Vec<Arc<Overload>>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an overload under `name`.
    ///
    /// Fails if the overload id is already taken, or if `name` already has
    /// an overload with the same parameter types.
    pub fn declare(&mut self, name: &str, overload: Overload) -> Result<(), Error> {
        let invalid = |reason: String| Error::InvalidDeclaration {
            name: name.into(),
            overload: overload.id().into(),
            reason,
        };

        if let Some((other_name, _)) = self.find_overload(overload.id()) {
            return Err(invalid(format!(
                "overload id is already declared for function '{}'",
                other_name
            )));
        }
        if let Some(existing) = self
            .overloads(name)
            .iter()
            .find(|existing| existing.params() == overload.params())
        {
            return Err(invalid(format!(
                "overload '{}' already declares parameters ({})",
                existing.id(),
                type_list(existing.params())
            )));
        }

        debug!("declared function {}: {}", name, overload);
        self.functions
            .entry(name.to_string())
            .or_default()
            .push(Arc::new(overload));
        Ok(())
    }

    /// Find the single overload of `name` that accepts `arg_types`.
    ///
    /// No match and more than one match are both errors; an ambiguous call
    /// is never settled at runtime.
    pub fn resolve(&self, name: &str, arg_types: &[Type]) -> Result<&Arc<Overload>, Error> {
        let overloads = self
            .functions
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.into()))?;

        let candidates = overloads
            .iter()
            .filter(|overload| overload.accepts(arg_types))
            .collect::<Vec<&Arc<Overload>>>();

        match candidates.as_slice() {
            [overload] => Ok(*overload),
            [] => Err(Error::NoMatchingOverload {
                name: name.into(),
                args: type_list(arg_types),
            }),
            _ => Err(Error::AmbiguousOverload {
                name: name.into(),
                args: type_list(arg_types),
                candidates: candidates
                    .iter()
                    .map(|overload| overload.id())
                    .collect::<Vec<&str>>()
                    .join(", "),
            }),
        }
    }

    pub fn overloads(&self, name: &str) -> &[Arc<Overload>] {
        self.functions
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Number of declared overloads, across all names
    pub fn len(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn find_overload(&self, id: &str) -> Option<(&str, &Arc<Overload>)> {
        self.functions.iter().find_map(|(name, overloads)| {
            overloads
                .iter()
                .find(|overload| overload.id() == id)
                .map(|overload| (name.as_str(), overload))
        })
    }
}

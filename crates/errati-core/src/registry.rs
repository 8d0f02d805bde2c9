//! Error type registry: alias → error type
use crate::args::Args;
use crate::error::ErratiError;
use crate::error_type::{ErrorInstance, ErrorType};
use crate::reflow::value_text;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const DEFAULT_INDENT: &str = "  ";

/// What a [`Registry::for_each`] callback learns about the alias it is visiting
#[derive(Debug)]
pub struct Visit<'a> {
    pub index: &'a str,
    pub registry: &'a Registry,
    /// Extra values handed to `for_each`, if any
    pub args: Option<&'a [Value]>,
}

/// Aliases in registration order. Several aliases may share one type.
#[derive(Default, Clone)]
pub struct Registry {
    entries: Vec<(String, Arc<ErrorType>)>,
    positions: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `error_type` under `alias`; an alias is never overwritten
    pub fn register(
        &mut self,
        alias: impl Into<String>,
        error_type: Arc<ErrorType>,
    ) -> Result<(), ErratiError> {
        let alias = alias.into();
        if self.positions.contains_key(&alias) {
            return Err(ErratiError::AliasConflict { alias });
        }
        self.positions.insert(alias.clone(), self.entries.len());
        self.entries.push((alias, error_type));
        Ok(())
    }

    pub fn get(&self, alias: &str) -> Option<&Arc<ErrorType>> {
        self.positions.get(alias).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.positions.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(alias, _)| alias.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ErrorType>)> {
        self.entries.iter().map(|(alias, ty)| (alias.as_str(), ty))
    }

    /// Look up `alias` and instantiate it
    pub fn create(&self, alias: &str, args: impl Into<Args>) -> anyhow::Result<ErrorInstance> {
        let error_type = self
            .get(alias)
            .ok_or_else(|| ErratiError::UnknownAlias(alias.to_string()))?;
        error_type.instantiate(args)
    }

    /// Call `f` once per alias, so a type registered twice is visited twice
    pub fn for_each<F>(&self, mut f: F, extra: &[Value])
    where
        F: FnMut(&Arc<ErrorType>, &Visit),
    {
        let args = if extra.is_empty() { None } else { Some(extra) };
        for (alias, error_type) in &self.entries {
            let visit = Visit {
                index: alias,
                registry: self,
                args,
            };
            f(error_type, &visit);
        }
    }

    /// Number of aliases, optionally only those starting with `prefix`
    pub fn count(&self, prefix: Option<&str>) -> usize {
        match prefix {
            Some(prefix) if !prefix.is_empty() => {
                self.aliases().filter(|alias| alias.starts_with(prefix)).count()
            }
            _ => self.entries.len(),
        }
    }

    /// Remove every alias
    pub fn dispose(&mut self) -> &mut Self {
        self.entries.clear();
        self.positions.clear();
        self
    }

    /// Indented nested-block dump of every alias and its static members
    pub fn dump(&self, indent: Option<&str>) -> String {
        let tab = indent.unwrap_or(DEFAULT_INDENT);
        let mut out = String::new();
        let total = self.entries.len();
        for (i, (alias, error_type)) in self.entries.iter().enumerate() {
            out.push_str(alias);
            out.push_str(": {\n");
            let members: Vec<(String, &Value)> = error_type
                .statics()
                .iter()
                .map(|(k, v)| (k.clone(), v))
                .collect();
            write_members(&mut out, &members, tab, tab);
            out.push('}');
            out.push_str(if i + 1 < total { ", \n" } else { "\n" });
        }
        out
    }
}

fn write_members(out: &mut String, members: &[(String, &Value)], tabs: &str, tab: &str) {
    for (i, (key, value)) in members.iter().enumerate() {
        match nested_members(value) {
            Some(children) => {
                out.push_str(&format!("{}{}: {{\n", tabs, key));
                write_members(out, &children, &format!("{}{}", tabs, tab), tab);
                out.push_str(tabs);
                out.push('}');
            }
            None => out.push_str(&format!("{}{}: \"{}\"", tabs, key, value_text(value))),
        }
        out.push_str(if i + 1 < members.len() { ", \n" } else { "\n" });
    }
}

fn nested_members(value: &Value) -> Option<Vec<(String, &Value)>> {
    match value {
        Value::Object(map) => Some(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        ),
        _ => None,
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.dump(None))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(alias, ty)| (alias, ty.name())))
            .finish()
    }
}

//! Tag registry: the static tables mapping tag names to handlers.
//!
//! Two disjoint registries exist, one for message-level tags and one for
//! embed-level tags (see [`crate::builtins`]); both are built once at process
//! start and read-only afterwards, so any number of compiles can share them.
//! Registering the same name or alias twice is a programming error and
//! panics during construction rather than surfacing at compile time.

use std::collections::HashMap;

use crate::compile::CompileContext;
use crate::error::CompileError;

/// A tag handler. Side effects go into the [`CompileContext`]; the returned
/// string replaces the tag's span in the script (usually empty).
pub type Handler = fn(&mut CompileContext, &Invocation) -> Result<String, CompileError>;

/// Static description of one tag.
pub struct TagDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Ordered argument names, used for diagnostics.
    pub params: &'static [&'static str],
    /// Minimum number of positional arguments.
    pub min_args: usize,
    pub usage: &'static str,
    pub handler: Handler,
}

/// One of the two tag tables.
#[derive(Default)]
pub struct TagRegistry {
    tags: Vec<TagDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag under its name and every alias.
    ///
    /// # Panics
    ///
    /// If the name or an alias is already taken in this registry.
    pub fn register(&mut self, desc: TagDescriptor) {
        let idx = self.tags.len();
        let name = desc.name;
        let aliases = desc.aliases;
        self.tags.push(desc);
        for key in std::iter::once(name).chain(aliases.iter().copied()) {
            if self.by_name.insert(key, idx).is_some() {
                panic!("duplicate tag registration: {key}");
            }
        }
    }

    /// Look up a tag by name or alias, case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<&TagDescriptor> {
        self.by_name
            .get(name.to_ascii_lowercase().as_str())
            .map(|&idx| &self.tags[idx])
    }
}

/// A parsed tag invocation handed to a handler.
///
/// Arguments that were empty or spelled `none`/`null` arrive as `None`
/// rather than as sentinel strings, so handlers never compare against magic
/// tokens.
pub struct Invocation<'a> {
    desc: &'a TagDescriptor,
    args: Vec<Option<String>>,
}

impl<'a> Invocation<'a> {
    pub fn new(desc: &'a TagDescriptor, raw_args: Vec<&str>) -> Self {
        let args = raw_args
            .into_iter()
            .map(|raw| {
                let raw = raw.trim();
                if raw.is_empty()
                    || raw.eq_ignore_ascii_case("none")
                    || raw.eq_ignore_ascii_case("null")
                {
                    None
                } else {
                    Some(raw.to_owned())
                }
            })
            .collect();
        Invocation { desc, args }
    }

    /// The canonical tag name (aliases collapse to it).
    pub fn tag(&self) -> &'static str {
        self.desc.name
    }

    /// Fail fast when fewer positional arguments were supplied than the tag
    /// requires, naming the first missing parameter.
    pub fn check_arity(&self) -> Result<(), CompileError> {
        if self.args.len() < self.desc.min_args {
            return Err(self.missing(self.args.len()));
        }
        Ok(())
    }

    /// Required argument at `idx`; unset counts as missing.
    pub fn require(&self, idx: usize) -> Result<&str, CompileError> {
        self.args
            .get(idx)
            .and_then(|a| a.as_deref())
            .ok_or_else(|| self.missing(idx))
    }

    /// Optional argument at `idx`.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).and_then(|a| a.as_deref())
    }

    fn missing(&self, idx: usize) -> CompileError {
        CompileError::MissingArgument {
            tag: self.desc.name,
            param: self.desc.params.get(idx).copied().unwrap_or("arg"),
            usage: self.desc.usage,
        }
    }
}

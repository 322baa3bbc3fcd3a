//! Taskfile document model (schema version 3)
//!
//! Heterogeneous list entries are decoded once into closed enums:
//! - `deps:` entries -> [`Dependency`]
//! - `cmd:` / `cmds:` entries -> [`Command`]
//! - `requires.vars:` entries -> [`RequiredVar`]
//!
//! The derived accessors on [`Task`] turn those into [`Call`]s and
//! [`RequiredVariable`]s, failing on shapes the schema does not allow.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{ConvertError, EntryKind, Result};

/// The only Taskfile schema version understood
pub const SUPPORTED_VERSION: &str = "3";

/// Taskfile parsed from YAML (raw)
#[derive(Debug, Deserialize)]
struct TaskfileRaw {
    #[serde(default, deserialize_with = "version_text")]
    version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    includes: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    vars: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    tasks: BTreeMap<String, Task>,
}

/// Just the `version:` key, read before the typed decode
#[derive(Debug, Deserialize)]
struct VersionOnly {
    #[serde(default, deserialize_with = "version_text")]
    version: String,
}

/// A parsed Taskfile. Maps are ordered, so iteration is by name.
#[derive(Debug, Default)]
pub struct Taskfile {
    pub version: String,
    /// Include name -> reference (content never inspected)
    pub includes: BTreeMap<String, Value>,
    pub vars: BTreeMap<String, Value>,
    pub tasks: BTreeMap<String, Task>,
}

impl<'de> Deserialize<'de> for Taskfile {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = TaskfileRaw::deserialize(deserializer)?;
        let mut tasks = raw.tasks;
        for (name, task) in tasks.iter_mut() {
            task.name = name.clone();
        }
        Ok(Taskfile {
            version: raw.version,
            includes: raw.includes,
            vars: raw.vars,
            tasks,
        })
    }
}

impl Taskfile {
    /// Parse and check a Taskfile.
    ///
    /// Besides YAML decoding this rejects unsupported versions and any task
    /// whose entries would fail later, so translation never starts on a
    /// document it cannot finish.
    /// The version is read first, so a document of another version is
    /// reported as unsupported even when its tasks do not fit this schema.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self> {
        let doc: Value = serde_yaml::from_slice(bytes)?;
        let VersionOnly { version } = serde_yaml::from_value(doc.clone())?;
        if version != SUPPORTED_VERSION {
            return Err(ConvertError::UnsupportedVersion { found: version });
        }
        let taskfile: Taskfile = serde_yaml::from_value(doc)?;
        taskfile.validate()?;
        Ok(taskfile)
    }

    pub fn check_version(&self) -> Result<()> {
        if self.version != SUPPORTED_VERSION {
            return Err(ConvertError::UnsupportedVersion {
                found: self.version.clone(),
            });
        }
        Ok(())
    }

    /// Walk every derived accessor once
    pub fn validate(&self) -> Result<()> {
        for task in self.tasks.values() {
            task.resolved_commands()?;
            task.dependency_calls()?;
            task.required_variables()?;
        }
        Ok(())
    }

    /// Include names, sorted
    pub fn list_includes(&self) -> Vec<&str> {
        self.includes.keys().map(String::as_str).collect()
    }

    /// Every name the diagram may use as a key: tasks, includes, top-level
    /// vars, required variables, call targets with their `:` segments and
    /// passed variables.
    pub fn names_in_use(&self) -> Result<BTreeSet<String>> {
        let mut names: BTreeSet<String> = self
            .tasks
            .keys()
            .chain(self.includes.keys())
            .chain(self.vars.keys())
            .cloned()
            .collect();
        for task in self.tasks.values() {
            names.extend(task.required_variables()?.into_iter().map(|var| var.name));
            let calls = task.dependency_calls()?.into_iter().chain(task.inline_calls()?);
            for call in calls {
                names.extend(call.task.split(':').map(str::to_string));
                names.extend(call.vars.into_iter().map(|var| var.name));
                names.insert(call.task);
            }
        }
        Ok(names)
    }

    #[inline]
    pub fn has_task(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Task {
    /// Key under `tasks:`, filled in after decoding
    #[serde(skip)]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub desc: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,

    /// Suppresses echo of resolved templates
    #[serde(default, deserialize_with = "null_as_default")]
    pub silent: bool,

    /// Not callable directly from the task CLI
    #[serde(default, deserialize_with = "null_as_default")]
    pub internal: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub requires: Requires,

    #[serde(default, deserialize_with = "null_as_default")]
    pub vars: BTreeMap<String, Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub deps: Vec<Dependency>,

    #[serde(default)]
    pub cmd: Option<Command>,

    #[serde(default)]
    pub cmds: Option<Vec<Command>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Requires {
    #[serde(default, deserialize_with = "null_as_default")]
    pub vars: Vec<RequiredVar>,
}

/// `deps:` entry
///
/// Order matters for serde untagged: a bare string is tried first,
/// then the `{task, vars}` object, anything else is kept as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Name(String),
    Task(TaskRef),
    Other(Value),
}

/// `cmd:` / `cmds:` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Plain shell command
    Shell(String),
    /// `{task: name, vars: {...}}`
    Task(TaskRef),
    /// `{cmd: ..., silent: ...}`, `{defer: ...}` and friends
    Other(Value),
}

/// `requires.vars:` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequiredVar {
    Name(String),
    Enumerated(EnumeratedVar),
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumeratedVar {
    pub name: String,
    #[serde(default, rename = "enum", deserialize_with = "null_as_default")]
    pub allowed: Vec<Value>,
}

/// Structured task reference used by `deps:` and `cmds:`
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRef {
    pub task: String,
    /// Only a mapping counts as bindings
    #[serde(default)]
    pub vars: Value,
}

impl TaskRef {
    fn to_call(&self) -> Call {
        let mut vars: Vec<Variable> = match &self.vars {
            Value::Mapping(map) => map
                .iter()
                .map(|(name, value)| Variable {
                    name: scalar_text(name),
                    value: value.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };
        vars.sort_by(|a, b| a.name.cmp(&b.name));
        Call {
            task: self.task.clone(),
            vars,
        }
    }
}

/// A reference from one task to another
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Target task, possibly `namespace:name`
    pub task: String,
    /// Passed variables, sorted by name
    pub vars: Vec<Variable>,
}

impl Call {
    pub fn named(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            vars: Vec::new(),
        }
    }

    /// Split `namespace:name`. Only the first separator counts.
    pub fn namespace(&self) -> Option<(&str, &str)> {
        self.task.split_once(':')
    }
}

/// A passed variable binding
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredVariable {
    pub name: String,
    /// Allowed values; empty means unrestricted
    pub allowed: Vec<String>,
}

impl Task {
    /// `cmd:` as a one-element slice, otherwise `cmds:`
    pub fn resolved_commands(&self) -> Result<&[Command]> {
        match (&self.cmd, &self.cmds) {
            (Some(_), Some(_)) => Err(ConvertError::ConflictingCommands {
                task: self.name.clone(),
            }),
            (Some(cmd), None) => Ok(std::slice::from_ref(cmd)),
            (None, Some(cmds)) => Ok(cmds),
            (None, None) => Ok(&[]),
        }
    }

    pub fn dependency_calls(&self) -> Result<Vec<Call>> {
        self.deps
            .iter()
            .map(|dep| match dep {
                Dependency::Name(name) => Ok(Call::named(name.as_str())),
                Dependency::Task(task_ref) => Ok(task_ref.to_call()),
                Dependency::Other(value) => Err(self.malformed(EntryKind::Dependency, value)),
            })
            .collect()
    }

    /// Task invocations inside the command list; shell commands are skipped
    pub fn inline_calls(&self) -> Result<Vec<Call>> {
        Ok(self
            .resolved_commands()?
            .iter()
            .filter_map(|cmd| match cmd {
                Command::Task(task_ref) => Some(task_ref.to_call()),
                Command::Shell(_) | Command::Other(_) => None,
            })
            .collect())
    }

    pub fn required_variables(&self) -> Result<Vec<RequiredVariable>> {
        self.requires
            .vars
            .iter()
            .map(|var| match var {
                RequiredVar::Name(name) => Ok(RequiredVariable {
                    name: name.clone(),
                    allowed: Vec::new(),
                }),
                RequiredVar::Enumerated(var) => Ok(RequiredVariable {
                    name: var.name.clone(),
                    allowed: var.allowed.iter().map(scalar_text).collect(),
                }),
                RequiredVar::Other(value) => {
                    Err(self.malformed(EntryKind::RequiredVariable, value))
                }
            })
            .collect()
    }

    fn malformed(&self, kind: EntryKind, value: &Value) -> ConvertError {
        ConvertError::MalformedEntry {
            task: self.name.clone(),
            kind,
            entry: serde_yaml::to_string(value)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_else(|_| format!("{value:?}")),
        }
    }
}

/// Plain text of a YAML scalar; non-scalars fall back to their YAML form
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// `version: 3` and `version: '3'` are the same thing
fn version_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "version must be a string, got {}",
            scalar_text(&other)
        ))),
    }
}

/// Treat an explicit `key:` (null) like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

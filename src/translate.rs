//! Taskfile -> D2 translation
//!
//! Emission order:
//! 1. `vars` block with the icon images
//! 2. legend container (optional)
//! 3. one container per include, sorted
//! 4. per task, sorted: description, silent style, icon, required vars,
//!    dependency calls, inline calls
//! 5. global style rules
//!
//! Calls into `namespace:task` are drawn inside the include's container.
//! Their content is never inspected, so each such target is marked
//! unknown the first time it is referenced.

use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::Value;
use tracing::{debug, instrument, trace};

use crate::assets::{self, Icon, STYLE_RULES};
use crate::config::Config;
use crate::d2_writer::D2Writer;
use crate::error::Result;
use crate::ids::IdGenerator;
use crate::taskfile::{Call, Task, Taskfile};

pub const REQUIRED_BY: &str = "required by";
pub const CALLS_AS_DEPENDENCY: &str = "calls as dependency";
pub const SET_TO: &str = "set to";

const DEPENDENCY_PASSED_TO: &str = "passed to {style {stroke-dash: 3; stroke: green}}";
const CALL_PASSED_TO: &str = "passed to {style.stroke-dash: 3}";
const WITH_CONTAINER: &str = "With {shape: parallelogram; style.stroke-dash: 3}";

/// Translate with default configuration
pub fn translate(taskfile: &Taskfile) -> Result<String> {
    translate_with(taskfile, &Config::default())
}

#[instrument(skip_all, fields(tasks = taskfile.tasks.len(), includes = taskfile.includes.len()))]
pub fn translate_with(taskfile: &Taskfile, config: &Config) -> Result<String> {
    Translator::new(taskfile, config).run()
}

/// Single translation run. Owns the output buffer, the id generator and
/// the record of namespaced targets already marked unknown.
pub struct Translator<'a> {
    taskfile: &'a Taskfile,
    legend: bool,
    out: D2Writer,
    ids: IdGenerator,
    /// include namespace -> sub-tasks already annotated
    annotated: BTreeMap<String, BTreeSet<String>>,
}

impl<'a> Translator<'a> {
    pub fn new(taskfile: &'a Taskfile, config: &Config) -> Self {
        Self {
            taskfile,
            legend: config.legend,
            out: D2Writer::new(),
            ids: IdGenerator::new(config.ids),
            annotated: BTreeMap::new(),
        }
    }

    /// Consume the run and return the rendered diagram.
    /// Any error discards everything written so far.
    pub fn run(mut self) -> Result<String> {
        let taskfile = self.taskfile;
        taskfile.check_version()?;
        self.ids.reserve(taskfile.names_in_use()?);

        self.out.assign("vars", assets::vars_block());
        if self.legend {
            let legend_key = self.ids.next_id();
            self.out.assign(legend_key, assets::legend());
        }

        for include in taskfile.list_includes() {
            debug!(include, "Emitting include");
            self.annotated.insert(include.to_string(), BTreeSet::new());
            self.out.assign(format!("{}.icon", quote(include)), Icon::IncludedTaskfile);
        }

        for (name, task) in &taskfile.tasks {
            self.emit_task(name, task)?;
        }

        for (key, values) in STYLE_RULES {
            self.out.assign_all(key, values.iter().copied());
        }

        debug!(statements = self.out.len(), ids = self.ids.issued(), "Translation done");
        Ok(self.out.render())
    }

    fn emit_task(&mut self, name: &str, task: &Task) -> Result<()> {
        debug!(task = name, internal = task.internal, silent = task.silent, "Emitting task");
        let key = quote(name);

        if let Some(text) = description_markdown(task) {
            self.out.assign(format!("{key}.Text"), format!("|md\n{text}|"));
        }
        if task.silent {
            self.out.assign(format!("{key}.style.fill"), "grey");
        }
        let icon = if task.internal {
            Icon::InternalTask
        } else {
            Icon::ExternalTask
        };
        self.out.assign(format!("{key}.icon"), icon);

        for var in task.required_variables()? {
            let label = if var.allowed.is_empty() {
                var.name.clone()
            } else {
                format!("\"{}\\n[{}]\"", var.name, var.allowed.join(", "))
            };
            let var_key = quote(&var.name);
            self.out.assign(
                &var_key,
                format!("{label} {{shape: image; icon: {}}}", Icon::Variable),
            );
            self.out.assign(format!("{var_key} -> {key}"), REQUIRED_BY);
        }

        for call in task.dependency_calls()? {
            self.emit_call(name, &call, CALLS_AS_DEPENDENCY, DEPENDENCY_PASSED_TO);
        }

        for (n, call) in task.inline_calls()?.iter().enumerate() {
            self.emit_call(name, call, &format!("calls ({})", n + 1), CALL_PASSED_TO);
        }

        Ok(())
    }

    fn emit_call(&mut self, source: &str, call: &Call, label: &str, passed_label: &str) {
        let source_key = quote(source);
        let target_key = target_key(&call.task);

        if call.vars.is_empty() {
            self.out.assign(format!("{source_key} -> {target_key}"), label);
        } else {
            let with = self.ids.next_id();
            self.out.assign(format!("{source_key} -> {with}"), label);
            self.out.assign(format!("{with} -> {target_key}"), passed_label);
            self.out.assign(&with, WITH_CONTAINER);
            for var in &call.vars {
                let var_key = format!("{with}.{}", quote(&var.name));
                let value_key = format!("{with}.{}", self.ids.next_id());
                self.out
                    .assign(&var_key, format!("{{shape: image; icon: {}}}", Icon::Variable));
                self.out.assign(
                    &value_key,
                    format!("{} {{shape: text}}", escape(&display_value(&var.value))),
                );
                self.out.assign(format!("{var_key} -> {value_key}"), SET_TO);
            }
        }

        if self.is_unknown_target(call) {
            trace!(callee = %call.task, "Marking target unknown");
            self.out.assign(format!("{target_key}.icon"), Icon::UnknownTask);
        }
    }

    /// Namespaced targets count once per (namespace, sub-task);
    /// flat targets missing from the Taskfile count every time.
    fn is_unknown_target(&mut self, call: &Call) -> bool {
        match call.namespace() {
            Some((namespace, sub_task)) => self
                .annotated
                .entry(namespace.to_string())
                .or_default()
                .insert(sub_task.to_string()),
            None => !self.taskfile.has_task(&call.task),
        }
    }
}

fn quote(name: &str) -> String {
    format!("'{name}'")
}

/// `sub:build` -> `'sub'.'build'`, nesting the target in its include
fn target_key(task: &str) -> String {
    quote(&task.replace(':', "'.'"))
}

fn description_markdown(task: &Task) -> Option<String> {
    if task.desc.is_empty() && task.summary.is_empty() {
        return None;
    }
    let mut text = String::new();
    if !task.desc.is_empty() {
        text.push_str(&format!("## Description\n{}\n", task.desc));
    }
    if !task.summary.is_empty() {
        text.push_str(&format!("## Summary\n{}\n", task.summary));
    }
    Some(text)
}

/// Literal-style rendering of a passed value: strings quoted, collections
/// bracketed, scalars as written.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", display_value(k), display_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, display_value(&tagged.value)),
    }
}

/// Backslash-escape quotes and braces so a value cannot close the
/// surrounding D2 statement. Best-effort: D2 has no general escape for
/// every construct a nested value might contain.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\'' | '"' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdScheme;

    fn taskfile(yaml: &str) -> Taskfile {
        Taskfile::from_yaml(yaml.as_bytes()).unwrap()
    }

    fn render(yaml: &str) -> String {
        let config = Config {
            legend: false,
            ids: IdScheme::Sequential,
        };
        translate_with(&taskfile(yaml), &config).unwrap()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.lines().filter(|l| *l == needle).count()
    }

    #[test]
    fn target_key_nests_namespaces() {
        assert_eq!(target_key("build"), "'build'");
        assert_eq!(target_key("infra:provision"), "'infra'.'provision'");
        assert_eq!(target_key("a:b:c"), "'a'.'b'.'c'");
    }

    #[test]
    fn display_value_forms() {
        assert_eq!(display_value(&Value::String("us-east".into())), "\"us-east\"");
        let yaml: Value = serde_yaml::from_str("[1, true, ~, {a: b}]").unwrap();
        assert_eq!(display_value(&yaml), "[1, true, null, {\"a\": \"b\"}]");
    }

    #[test]
    fn escape_quotes_and_braces() {
        assert_eq!(escape("\"x\""), "\\\"x\\\"");
        assert_eq!(escape("{'a'}"), "\\{\\'a\\'\\}");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn description_and_summary() {
        let out = render(
            r#"
version: '3'
tasks:
  both:
    desc: Builds it
    summary: Longer text
  desc-only:
    desc: Just this
  neither: {}
"#,
        );
        assert!(out.contains(
            "'both'.Text: |md\n## Description\nBuilds it\n## Summary\nLonger text\n|"
        ));
        assert!(out.contains("'desc-only'.Text: |md\n## Description\nJust this\n|"));
        assert!(!out.contains("'neither'.Text"));
    }

    #[test]
    fn namespaced_target_marked_once() {
        let out = render(
            r#"
version: '3'
includes:
  infra: ./infra
tasks:
  a:
    deps: [infra:provision]
  b:
    deps: [infra:provision, infra:teardown]
    cmds:
      - task: infra:provision
"#,
        );
        assert_eq!(count(&out, "'infra'.'provision'.icon: ${unknownTaskIcon}"), 1);
        assert_eq!(count(&out, "'infra'.'teardown'.icon: ${unknownTaskIcon}"), 1);
        assert_eq!(count(&out, "'b' -> 'infra'.'provision': calls (1)"), 1);
    }

    #[test]
    fn namespace_without_include_is_still_memoized() {
        let out = render(
            r#"
version: '3'
tasks:
  a:
    deps: [ghost:x, ghost:x]
"#,
        );
        assert_eq!(count(&out, "'ghost'.'x'.icon: ${unknownTaskIcon}"), 1);
    }

    #[test]
    fn missing_flat_target_marked_every_time() {
        let out = render(
            r#"
version: '3'
tasks:
  a:
    deps: [missing]
    cmds:
      - task: missing
      - task: "{{.DYNAMIC}}"
"#,
        );
        assert_eq!(count(&out, "'missing'.icon: ${unknownTaskIcon}"), 2);
        assert_eq!(count(&out, "'{{.DYNAMIC}}'.icon: ${unknownTaskIcon}"), 1);
    }

    #[test]
    fn known_flat_target_not_marked() {
        let out = render(
            r#"
version: '3'
tasks:
  a:
    deps: [b]
  b: {}
"#,
        );
        assert!(!out.contains("${unknownTaskIcon}"));
    }

    #[test]
    fn inline_calls_numbered_per_task() {
        let out = render(
            r#"
version: '3'
tasks:
  a:
    cmds:
      - echo hi
      - task: b
      - task: c
  b:
    cmds:
      - task: c
  c: {}
"#,
        );
        assert!(out.contains("'a' -> 'b': calls (1)"));
        assert!(out.contains("'a' -> 'c': calls (2)"));
        assert!(out.contains("'b' -> 'c': calls (1)"));
    }

    #[test]
    fn passed_vars_in_with_container() {
        let out = render(
            r#"
version: '3'
tasks:
  a:
    cmds:
      - task: b
        vars:
          Z: 1
          A: "x"
  b: {}
"#,
        );
        let expected = [
            "'a' -> gen-1: calls (1)",
            "gen-1 -> 'b': passed to {style.stroke-dash: 3}",
            "gen-1: With {shape: parallelogram; style.stroke-dash: 3}",
            "gen-1.'A': {shape: image; icon: ${varIcon}}",
            "gen-1.gen-2: \\\"x\\\" {shape: text}",
            "gen-1.'A' -> gen-1.gen-2: set to",
            "gen-1.'Z': {shape: image; icon: ${varIcon}}",
            "gen-1.gen-3: 1 {shape: text}",
            "gen-1.'Z' -> gen-1.gen-3: set to",
        ]
        .join("\n");
        assert!(out.contains(&expected), "{out}");
    }

    #[test]
    fn unsupported_version_stops_before_output() {
        let tf: Taskfile = serde_yaml::from_str("version: '2'\ntasks:\n  a: {}").unwrap();
        assert!(translate(&tf).is_err());
    }

    #[test]
    fn conflicting_commands_stop_translation() {
        let tf: Taskfile =
            serde_yaml::from_str("version: '3'\ntasks:\n  a:\n    cmd: x\n    cmds: [y]").unwrap();
        let err = translate(&tf).unwrap_err();
        assert!(err.to_string().contains("both cmd and cmds"));
    }

    #[test]
    fn legend_takes_first_id() {
        let tf = taskfile("version: '3'");
        let out = translate(&tf).unwrap();
        let second = out.lines().nth(7).unwrap_or_default();
        assert!(out.starts_with("vars: {\n"));
        assert!(second.starts_with("gen-1: Legend {"), "{second}");
    }
}

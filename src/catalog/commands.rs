use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::diagnostics::CompileError;

/// The automation commands scripts can invoke. Commands live either at
/// the top level or inside a family (`mouse.move`, `keyboard.press`).
#[derive(Debug, Default)]
pub struct CommandCatalog {
    globals: BTreeMap<String, Command>,
    families: BTreeMap<String, BTreeMap<String, Command>>,
}

#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub args: Vec<ArgDescriptor>,
    /// Host type name of the command's output, if it produces one.
    pub result: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ArgDescriptor {
    pub name: String,
    /// Arguments sharing a group id are one-of-required: exactly one of
    /// the group must be supplied. `None` marks an optional argument.
    pub required_group: Option<u32>,
}

impl Command {
    pub fn arg(&self, name: &str) -> Option<&ArgDescriptor> {
        self.args.iter().find(|a| a.name == name)
    }
}

impl CommandCatalog {
    pub fn has_family(&self, name: &str) -> bool {
        self.families.contains_key(name)
    }

    pub fn find(&self, family: Option<&str>, name: &str) -> Option<&Command> {
        match family {
            Some(f) => self.families.get(f)?.get(name),
            None => self.globals.get(name),
        }
    }

    fn insert(&mut self, family: Option<&str>, command: Command) {
        let slot = match family {
            Some(f) => self.families.entry(f.to_string()).or_default(),
            None => &mut self.globals,
        };
        slot.insert(command.name.clone(), command);
    }

    /// The stock command set: enough surface for the built-in drivers.
    pub fn builtin() -> Self {
        let mut cat = CommandCatalog::default();

        let req = |name: &str, group: u32| ArgDescriptor {
            name: name.into(),
            required_group: Some(group),
        };
        let opt = |name: &str| ArgDescriptor { name: name.into(), required_group: None };

        cat.insert(
            Some("mouse"),
            Command {
                name: "move".into(),
                args: vec![req("x", 1), req("y", 2), opt("relative")],
                result: None,
            },
        );
        cat.insert(
            Some("mouse"),
            Command { name: "click".into(), args: vec![opt("button")], result: None },
        );
        cat.insert(
            Some("keyboard"),
            Command { name: "press".into(), args: vec![req("key", 1)], result: None },
        );
        cat.insert(
            Some("keyboard"),
            Command { name: "typetext".into(), args: vec![req("text", 1)], result: None },
        );
        cat.insert(
            Some("dialog"),
            Command {
                name: "show".into(),
                args: vec![req("message", 1), opt("title")],
                result: None,
            },
        );
        cat.insert(
            Some("dialog"),
            Command {
                name: "ask".into(),
                args: vec![req("message", 1)],
                result: Some("string".into()),
            },
        );
        cat.insert(
            None,
            Command {
                name: "delay".into(),
                // seconds and millis are alternatives for the same wait
                args: vec![req("seconds", 1), req("millis", 1)],
                result: None,
            },
        );
        cat.insert(
            None,
            Command { name: "print".into(), args: vec![req("text", 1)], result: None },
        );

        cat
    }

    /// Merge command definitions from a TOML file over the current set.
    /// A redefined command replaces the stock one wholesale.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), CompileError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompileError::catalog(e.to_string(), path.to_path_buf()))?;
        self.merge_toml(&text, path)
    }

    pub fn merge_toml(&mut self, text: &str, path: &Path) -> Result<(), CompileError> {
        let file: CatalogFile = toml::from_str(text)
            .map_err(|e| CompileError::catalog(e.to_string(), path.to_path_buf()))?;

        for def in file.command {
            let command = def.build(path)?;
            self.insert(None, command);
        }
        for (family, fam) in file.family {
            for def in fam.command {
                let command = def.build(path)?;
                self.insert(Some(&family), command);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    command: Vec<CommandDef>,
    #[serde(default)]
    family: BTreeMap<String, FamilyDef>,
}

#[derive(Debug, Deserialize)]
struct FamilyDef {
    #[serde(default)]
    command: Vec<CommandDef>,
}

#[derive(Debug, Deserialize)]
struct CommandDef {
    name: String,
    #[serde(default)]
    arg: Vec<ArgDef>,
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArgDef {
    name: String,
    #[serde(default)]
    required_group: Option<u32>,
}

impl CommandDef {
    fn build(self, path: &Path) -> Result<Command, CompileError> {
        if self.name.is_empty() {
            return Err(CompileError::catalog(
                "command name cannot be empty",
                path.to_path_buf(),
            ));
        }
        let args = self
            .arg
            .into_iter()
            .map(|a| ArgDescriptor { name: a.name, required_group: a.required_group })
            .collect();
        Ok(Command { name: self.name, args, result: self.result })
    }
}

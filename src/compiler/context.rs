use std::collections::{HashMap, HashSet};

use crate::catalog::host::{HostCatalog, TypeId};

/// A registered script variable, or a read-only reference to a host
/// type seeded into every fresh scope.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    /// Name used in the output script, unique across the compilation.
    pub generated: String,
    pub ty: TypeId,
    pub read_only: bool,
    pub is_static_type: bool,
}

/// Flat variable registry for one compilation, plus the counters that
/// keep temporaries and jump labels collision free.
#[derive(Debug, Default)]
pub struct Scope {
    vars: HashMap<String, Variable>,
    used_names: HashSet<String>,
    temp_counter: usize,
    label_counts: HashMap<String, usize>,
}

impl Scope {
    /// Fresh scope with every host type visible as a read-only
    /// static reference.
    pub fn seeded(host: &HostCatalog) -> Self {
        let mut scope = Scope::default();
        for (id, ty) in host.iter() {
            scope.used_names.insert(ty.name.clone());
            scope.vars.insert(
                ty.name.clone(),
                Variable {
                    name: ty.name.clone(),
                    generated: ty.name.clone(),
                    ty: id,
                    read_only: true,
                    is_static_type: true,
                },
            );
        }
        scope
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    /// Register a new variable, picking an unused output name.
    pub fn register(&mut self, name: &str, ty: TypeId) -> &Variable {
        let generated = self.unique_name(name);
        self.used_names.insert(generated.clone());
        self.vars.insert(
            name.to_string(),
            Variable {
                name: name.to_string(),
                generated,
                ty,
                read_only: false,
                is_static_type: false,
            },
        );
        &self.vars[name]
    }

    /// Register a fresh temporary of the given type and return its name.
    pub fn next_temp(&mut self, ty: TypeId) -> String {
        loop {
            self.temp_counter += 1;
            let name = format!("tmp{}", self.temp_counter);
            if !self.vars.contains_key(&name) && !self.used_names.contains(&name) {
                self.register(&name, ty);
                return name;
            }
        }
    }

    /// Unique jump label: first use of a base yields the base itself,
    /// later uses append a counter.
    pub fn next_label(&mut self, base: &str) -> String {
        let count = self.label_counts.entry(base.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{base}{count}")
        }
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.used_names.contains(base) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.used_names.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

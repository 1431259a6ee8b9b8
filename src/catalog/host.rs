use std::collections::HashMap;

/// Index into [`HostCatalog::types`]. Stable for the life of a catalog.
pub type TypeId = usize;

/// Static description of the host types scripts can touch. The catalog
/// is built once and never mutated during compilation.
#[derive(Debug)]
pub struct HostCatalog {
    types: Vec<HostType>,
    by_name: HashMap<String, TypeId>,
}

#[derive(Debug)]
pub struct HostType {
    /// Name scripts use, e.g. `Rectangle`.
    pub name: String,
    /// Fully qualified name emitted into native snippets.
    pub full_name: String,
    /// Whether `null` is a legal value of this type.
    pub allows_null: bool,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
}

#[derive(Debug)]
pub struct Property {
    pub name: String,
    pub ty: TypeId,
    pub is_static: bool,
    pub readable: bool,
    pub writable: bool,
}

#[derive(Debug)]
pub struct Method {
    pub name: String,
    pub is_static: bool,
    pub params: Vec<TypeId>,
    /// `None` for void methods.
    pub ret: Option<TypeId>,
}

impl HostType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn methods_named(&self, name: &str) -> Vec<&Method> {
        self.methods.iter().filter(|m| m.name == name).collect()
    }
}

impl HostCatalog {
    pub fn get(&self, id: TypeId) -> &HostType {
        &self.types[id]
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: TypeId) -> &str {
        &self.types[id].name
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &HostType)> {
        self.types.iter().enumerate()
    }

    /// Register a host type. Scripts see it immediately as a static
    /// reference, and command result clauses can name it.
    pub fn add(&mut self, ty: HostType) -> TypeId {
        let id = self.types.len();
        self.by_name.insert(ty.name.clone(), id);
        self.types.push(ty);
        id
    }

    /// The built-in type set: the primitives plus the small drawing
    /// structs automation commands traffic in.
    pub fn builtin() -> Self {
        let mut cat = HostCatalog { types: Vec::new(), by_name: HashMap::new() };

        // Ids are assigned in insertion order; the primitives go first
        // so the well-known constants below stay valid.
        let int = cat.add(HostType {
            name: "int".into(),
            full_name: "System.Int32".into(),
            allows_null: false,
            properties: vec![],
            methods: vec![],
        });
        let float = cat.add(HostType {
            name: "float".into(),
            full_name: "System.Double".into(),
            allows_null: false,
            properties: vec![],
            methods: vec![],
        });
        let boolean = cat.add(HostType {
            name: "bool".into(),
            full_name: "System.Boolean".into(),
            allows_null: false,
            properties: vec![],
            methods: vec![],
        });
        let string = cat.add(HostType {
            name: "string".into(),
            full_name: "System.String".into(),
            allows_null: true,
            properties: vec![],
            methods: vec![],
        });
        let rectangle = cat.add(HostType {
            name: "Rectangle".into(),
            full_name: "System.Drawing.Rectangle".into(),
            allows_null: false,
            properties: vec![],
            methods: vec![],
        });
        let point = cat.add(HostType {
            name: "Point".into(),
            full_name: "System.Drawing.Point".into(),
            allows_null: false,
            properties: vec![],
            methods: vec![],
        });
        let size = cat.add(HostType {
            name: "Size".into(),
            full_name: "System.Drawing.Size".into(),
            allows_null: false,
            properties: vec![],
            methods: vec![],
        });

        debug_assert_eq!(int, INT);
        debug_assert_eq!(float, FLOAT);
        debug_assert_eq!(boolean, BOOL);
        debug_assert_eq!(string, STRING);

        let prop = |name: &str, ty, is_static, writable| Property {
            name: name.into(),
            ty,
            is_static,
            readable: true,
            writable,
        };
        let method = |name: &str, is_static, params: Vec<TypeId>, ret| Method {
            name: name.into(),
            is_static,
            params,
            ret,
        };

        cat.types[int].properties = vec![
            prop("MaxValue", int, true, false),
            prop("MinValue", int, true, false),
        ];
        cat.types[int].methods = vec![
            method("Parse", true, vec![string], Some(int)),
            method("Parse", true, vec![string, int], Some(int)),
        ];

        cat.types[float].properties = vec![
            prop("MaxValue", float, true, false),
            prop("MinValue", float, true, false),
        ];
        cat.types[float].methods = vec![method("Parse", true, vec![string], Some(float))];

        cat.types[boolean].methods = vec![method("Parse", true, vec![string], Some(boolean))];

        cat.types[string].properties = vec![
            prop("Empty", string, true, false),
            prop("Length", int, false, false),
        ];
        cat.types[string].methods = vec![
            method("IsNullOrEmpty", true, vec![string], Some(boolean)),
            method("ToUpper", false, vec![], Some(string)),
            method("ToLower", false, vec![], Some(string)),
        ];

        cat.types[rectangle].properties = vec![
            prop("Empty", rectangle, true, false),
            prop("X", int, false, true),
            prop("Y", int, false, true),
            prop("Width", int, false, true),
            prop("Height", int, false, true),
            prop("Location", point, false, true),
            prop("Size", size, false, true),
        ];
        cat.types[rectangle].methods = vec![
            method("Inflate", false, vec![size], None),
            method("Inflate", false, vec![int, int], None),
            method("Contains", false, vec![point], Some(boolean)),
        ];

        cat.types[point].properties = vec![
            prop("Empty", point, true, false),
            prop("X", int, false, true),
            prop("Y", int, false, true),
        ];
        cat.types[point].methods = vec![
            method("Offset", false, vec![point], None),
            method("Offset", false, vec![int, int], None),
        ];

        cat.types[size].properties = vec![
            prop("Empty", size, true, false),
            prop("Width", int, false, true),
            prop("Height", int, false, true),
        ];

        cat
    }
}

// Well-known primitive ids, fixed by insertion order in `builtin`.
pub const INT: TypeId = 0;
pub const FLOAT: TypeId = 1;
pub const BOOL: TypeId = 2;
pub const STRING: TypeId = 3;

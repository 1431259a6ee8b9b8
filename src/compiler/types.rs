use crate::catalog::host::{self, HostCatalog, TypeId};
use crate::parser::{BinOp, UnaryOp};

/// The type tag an expression evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// A call with no result. Never storable.
    Void,
    /// The `null` literal before it meets a typed context.
    Null,
    Host(TypeId),
}

impl Value {
    pub fn describe(self, host: &HostCatalog) -> String {
        match self {
            Value::Void => "void".into(),
            Value::Null => "null".into(),
            Value::Host(id) => host.name_of(id).into(),
        }
    }

    /// Implicit conversion: identity, int widens to float, and null
    /// fits any type that admits it.
    pub fn converts_to(self, target: TypeId, host: &HostCatalog) -> bool {
        match self {
            Value::Host(id) if id == target => true,
            Value::Host(host::INT) => target == host::FLOAT,
            Value::Null => host.get(target).allows_null,
            _ => false,
        }
    }
}

fn numeric(id: TypeId) -> bool {
    id == host::INT || id == host::FLOAT
}

fn promote(lhs: TypeId, rhs: TypeId) -> TypeId {
    if lhs == host::FLOAT || rhs == host::FLOAT {
        host::FLOAT
    } else {
        host::INT
    }
}

/// Result type of a binary operation, or `None` when the operand types
/// do not support it.
pub fn binary_result(op: BinOp, lhs: TypeId, rhs: TypeId) -> Option<TypeId> {
    use BinOp::*;
    let both_numeric = numeric(lhs) && numeric(rhs);
    match op {
        Mul | Div | Mod | Sub => both_numeric.then(|| promote(lhs, rhs)),
        Add => {
            if both_numeric {
                Some(promote(lhs, rhs))
            } else if lhs == host::STRING && rhs == host::STRING {
                Some(host::STRING)
            } else {
                None
            }
        }
        Shl | Shr | BitAnd | BitXor | BitOr => {
            (lhs == host::INT && rhs == host::INT).then_some(host::INT)
        }
        Lt | Gt | LtEq | GtEq => both_numeric.then_some(host::BOOL),
        Eq | Neq => (both_numeric || lhs == rhs).then_some(host::BOOL),
        And | Or => (lhs == host::BOOL && rhs == host::BOOL).then_some(host::BOOL),
    }
}

/// Result type of a unary operation, or `None` when unsupported.
pub fn unary_result(op: UnaryOp, operand: TypeId) -> Option<TypeId> {
    match op {
        UnaryOp::Not => (operand == host::BOOL).then_some(host::BOOL),
        UnaryOp::BitNot => (operand == host::INT).then_some(host::INT),
        UnaryOp::Neg | UnaryOp::Plus => numeric(operand).then_some(operand),
    }
}

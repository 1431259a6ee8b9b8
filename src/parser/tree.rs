use crate::span::Spanned;

/// Syntax tree produced by the claiming passes. Trees are immutable once
/// built; the compiler rewrites them by constructing fresh nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Str { value: String, needs_escaping: bool },
    Ident(String),
    Unary { op: UnaryOp, operand: Box<Spanned<Tree>> },
    Binary { op: BinOp, lhs: Box<Spanned<Tree>>, rhs: Box<Spanned<Tree>> },
    Assign { target: Box<Spanned<Tree>>, value: Box<Spanned<Tree>> },
    Incr { op: IncrOp, prefix: bool, target: Spanned<String> },
    Dot { lhs: Box<Spanned<Tree>>, member: Spanned<String> },
    Call { callee: Box<Spanned<Tree>>, args: Vec<Arg> },
    Paren(Box<Spanned<Tree>>),
    Block(Vec<Spanned<Tree>>),
    If {
        cond: Box<Spanned<Tree>>,
        then_block: Box<Spanned<Tree>>,
        else_block: Option<Box<Spanned<Tree>>>,
    },
    While { cond: Box<Spanned<Tree>>, body: Box<Spanned<Tree>> },
    Terminator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Positional(Spanned<Tree>),
    Named { name: Spanned<String>, value: Spanned<Tree> },
}

impl Arg {
    pub fn value(&self) -> &Spanned<Tree> {
        match self {
            Arg::Positional(v) => v,
            Arg::Named { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    Neq,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl BinOp {
    /// Binding strength. Higher binds tighter; `||` sits alone on the
    /// loosest tier so it never mixes silently with `&&`.
    pub fn precedence(self) -> u8 {
        use BinOp::*;
        match self {
            Mul | Div | Mod => 10,
            Add | Sub => 9,
            Shl | Shr => 8,
            Lt | Gt | LtEq | GtEq => 7,
            Eq | Neq => 6,
            BitAnd => 5,
            BitXor => 4,
            BitOr => 3,
            And => 2,
            Or => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        use BinOp::*;
        match self {
            Mul => "*",
            Div => "/",
            Mod => "%",
            Add => "+",
            Sub => "-",
            Shl => "<<",
            Shr => ">>",
            Lt => "<",
            Gt => ">",
            LtEq => "<=",
            GtEq => ">=",
            Eq => "==",
            Neq => "!=",
            BitAnd => "&",
            BitXor => "^",
            BitOr => "|",
            And => "&&",
            Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    BitNot,
    Neg,
    Plus,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrOp {
    Incr,
    Decr,
}

impl IncrOp {
    /// The binary operation the step desugars to.
    pub fn bin_op(self) -> BinOp {
        match self {
            IncrOp::Incr => BinOp::Add,
            IncrOp::Decr => BinOp::Sub,
        }
    }
}

impl Tree {
    /// Whether the tree produces a value usable as an operand. Control
    /// statements and terminators do not.
    pub fn is_value_bearing(&self) -> bool {
        match self {
            Tree::Int(_)
            | Tree::Float(_)
            | Tree::Bool(_)
            | Tree::Null
            | Tree::Str { .. }
            | Tree::Ident(_)
            | Tree::Unary { .. }
            | Tree::Binary { .. }
            | Tree::Assign { .. }
            | Tree::Incr { .. }
            | Tree::Dot { .. }
            | Tree::Call { .. } => true,
            Tree::Paren(inner) => inner.node.is_value_bearing(),
            Tree::Block(_) | Tree::If { .. } | Tree::While { .. } | Tree::Terminator => false,
        }
    }

    /// Whether the tree names a storage location an assignment can write.
    pub fn is_write_target(&self) -> bool {
        matches!(self, Tree::Ident(_) | Tree::Dot { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Greater,
    Less,
    GreaterEq,
    LessEq,
    And,
    Or,
}

impl BinOp {
    pub fn from_symbol(symbol: &str) -> Option<BinOp> {
        match symbol {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            "==" => Some(BinOp::Eq),
            "!=" => Some(BinOp::NotEq),
            ">" => Some(BinOp::Greater),
            "<" => Some(BinOp::Less),
            ">=" => Some(BinOp::GreaterEq),
            "<=" => Some(BinOp::LessEq),
            _ => None,
        }
    }

    /// The Python spelling of this operator.
    pub fn python(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Greater => ">",
            BinOp::Less => "<",
            BinOp::GreaterEq => ">=",
            BinOp::LessEq => "<=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Identifier(String),

    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },

    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },

    List {
        elements: Vec<Expr>,
    },
}

impl Expr {
    pub fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

/// Optional type annotation from "as a/an <type>" in declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Integer,
    Number,
    Text,
    Boolean,
    List,
    Other(String),
}

impl TypeTag {
    pub fn from_keyword(word: &str) -> TypeTag {
        match word {
            "integer" => TypeTag::Integer,
            "number" => TypeTag::Number,
            "string" | "text" => TypeTag::Text,
            "boolean" => TypeTag::Boolean,
            "list" => TypeTag::List,
            other => TypeTag::Other(other.to_string()),
        }
    }

    pub fn python_hint(&self) -> &'static str {
        match self {
            TypeTag::Integer => "int",
            TypeTag::Number => "float",
            TypeTag::Text => "str",
            TypeTag::Boolean => "bool",
            TypeTag::List => "list",
            TypeTag::Other(_) => "Any",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration {
        name: String,
        var_type: Option<TypeTag>,
        value: Expr,
    },

    Assignment {
        name: String,
        value: Expr,
    },

    ForLoop {
        item: String,
        iterable: Expr,
        body: Vec<Statement>,
    },

    WhileLoop {
        condition: Expr,
        body: Vec<Statement>,
    },

    RepeatLoop {
        count: Expr,
        body: Vec<Statement>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Program { statements }
    }
}

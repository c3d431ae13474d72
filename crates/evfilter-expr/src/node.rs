//! Expression tree nodes

use evfilter_types::{TimeUnit, Value};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

/// Date-time arithmetic methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateTimeMethod {
    Plus,
    Minus,
}

impl DateTimeMethod {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plus => "plus",
            Self::Minus => "minus",
        }
    }
}

/// One (count, unit) pair of a time-period literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePeriodPart {
    pub count: Box<ExprNode>,
    pub unit: TimeUnit,
}

/// Compiled expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExprNode {
    // === Operands ===
    Literal {
        value: Value,
    },
    /// Property of the event at index `stream` of the evaluated row
    Property {
        #[serde(default)]
        stream: usize,
        name: String,
    },
    Variable {
        name: String,
    },
    /// Logical clock reading as epoch milliseconds
    CurrentTimestamp,

    // === Operators ===
    Compare {
        op: CompareOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    Arithmetic {
        op: ArithOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    And {
        operands: Vec<ExprNode>,
    },
    Or {
        operands: Vec<ExprNode>,
    },
    Not {
        operand: Box<ExprNode>,
    },
    IsNull {
        operand: Box<ExprNode>,
        #[serde(default)]
        negated: bool,
    },
    Function {
        name: String,
        #[serde(default)]
        args: Vec<ExprNode>,
    },

    // === Date-time ===
    TimePeriod {
        parts: SmallVec<[TimePeriodPart; 4]>,
    },
    DateTimeMethod {
        method: DateTimeMethod,
        receiver: Box<ExprNode>,
        duration: Box<ExprNode>,
    },
}

impl ExprNode {
    // === Constructors ===

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn null() -> Self {
        Self::Literal { value: Value::Null }
    }

    /// Property of the single (first) stream
    pub fn property(name: impl Into<String>) -> Self {
        Self::stream_property(0, name)
    }

    pub fn stream_property(stream: usize, name: impl Into<String>) -> Self {
        Self::Property {
            stream,
            name: name.into(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable { name: name.into() }
    }

    pub fn compare(op: CompareOp, left: ExprNode, right: ExprNode) -> Self {
        Self::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn equal(left: ExprNode, right: ExprNode) -> Self {
        Self::compare(CompareOp::Equal, left, right)
    }

    pub fn arithmetic(op: ArithOp, left: ExprNode, right: ExprNode) -> Self {
        Self::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(operands: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::And {
            operands: operands.into_iter().collect(),
        }
    }

    pub fn or(operands: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::Or {
            operands: operands.into_iter().collect(),
        }
    }

    pub fn not(operand: ExprNode) -> Self {
        Self::Not {
            operand: Box::new(operand),
        }
    }

    pub fn is_null(operand: ExprNode) -> Self {
        Self::IsNull {
            operand: Box::new(operand),
            negated: false,
        }
    }

    pub fn is_not_null(operand: ExprNode) -> Self {
        Self::IsNull {
            operand: Box::new(operand),
            negated: true,
        }
    }

    pub fn function(name: impl Into<String>, args: impl IntoIterator<Item = ExprNode>) -> Self {
        Self::Function {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Time-period literal with expression counts
    pub fn time_period(parts: impl IntoIterator<Item = (ExprNode, TimeUnit)>) -> Self {
        Self::TimePeriod {
            parts: parts
                .into_iter()
                .map(|(count, unit)| TimePeriodPart {
                    count: Box::new(count),
                    unit,
                })
                .collect(),
        }
    }

    /// Time-period literal with constant counts, e.g. `1 hour 10 sec 20 msec`
    pub fn period_literal(parts: &[(i64, TimeUnit)]) -> Self {
        Self::time_period(
            parts
                .iter()
                .map(|(count, unit)| (Self::literal(*count), *unit)),
        )
    }

    pub fn plus(receiver: ExprNode, duration: ExprNode) -> Self {
        Self::DateTimeMethod {
            method: DateTimeMethod::Plus,
            receiver: Box::new(receiver),
            duration: Box::new(duration),
        }
    }

    pub fn minus(receiver: ExprNode, duration: ExprNode) -> Self {
        Self::DateTimeMethod {
            method: DateTimeMethod::Minus,
            receiver: Box::new(receiver),
            duration: Box::new(duration),
        }
    }

    // === Analysis ===

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&ExprNode> {
        match self {
            Self::Literal { .. }
            | Self::Property { .. }
            | Self::Variable { .. }
            | Self::CurrentTimestamp => Vec::new(),
            Self::Compare { left, right, .. } | Self::Arithmetic { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            Self::And { operands } | Self::Or { operands } => operands.iter().collect(),
            Self::Not { operand } | Self::IsNull { operand, .. } => vec![operand.as_ref()],
            Self::Function { args, .. } => args.iter().collect(),
            Self::TimePeriod { parts } => parts.iter().map(|p| p.count.as_ref()).collect(),
            Self::DateTimeMethod {
                receiver, duration, ..
            } => vec![receiver.as_ref(), duration.as_ref()],
        }
    }

    /// Visit this node and all descendants depth-first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ExprNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Check if any node reads a variable
    pub fn references_variables(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if matches!(node, Self::Variable { .. }) {
                found = true;
            }
        });
        found
    }

    /// Names of all variables read by this tree
    pub fn variable_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.walk(&mut |node| {
            if let Self::Variable { name } = node {
                names.insert(name.as_str());
            }
        });
        names
    }

    /// Number of streams the row must supply (highest stream index + 1)
    pub fn stream_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if let Self::Property { stream, .. } = node {
                count = count.max(stream + 1);
            }
        });
        count
    }

    /// Check if any node reads the logical clock
    pub fn uses_clock(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if matches!(node, Self::CurrentTimestamp) {
                found = true;
            }
        });
        found
    }
}

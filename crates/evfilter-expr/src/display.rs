//! Textual rendering of compiled trees, used for audit records

use crate::ExprNode;
use std::fmt;

fn join(f: &mut fmt::Formatter<'_>, nodes: &[ExprNode], separator: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value } => write!(f, "{}", value),
            Self::Property { stream: 0, name } => f.write_str(name),
            Self::Property { stream, name } => write!(f, "s{}.{}", stream, name),
            Self::Variable { name } => f.write_str(name),
            Self::CurrentTimestamp => f.write_str("current_timestamp"),
            Self::Compare { op, left, right } => write!(f, "{} {} {}", left, op.symbol(), right),
            Self::Arithmetic { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Self::And { operands } => {
                f.write_str("(")?;
                join(f, operands, " and ")?;
                f.write_str(")")
            }
            Self::Or { operands } => {
                f.write_str("(")?;
                join(f, operands, " or ")?;
                f.write_str(")")
            }
            Self::Not { operand } => write!(f, "not {}", operand),
            Self::IsNull {
                operand,
                negated: false,
            } => write!(f, "{} is null", operand),
            Self::IsNull {
                operand,
                negated: true,
            } => write!(f, "{} is not null", operand),
            Self::Function { name, args } => {
                write!(f, "{}(", name)?;
                join(f, args, ", ")?;
                f.write_str(")")
            }
            Self::TimePeriod { parts } => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match part.count.as_ref() {
                        Self::Literal { value } => match value.as_long() {
                            Some(count) => write!(f, "{} {}", count, part.unit)?,
                            None => write!(f, "{} {}", value, part.unit)?,
                        },
                        count => write!(f, "{} {}", count, part.unit)?,
                    }
                }
                Ok(())
            }
            Self::DateTimeMethod {
                method,
                receiver,
                duration,
            } => write!(f, "{}.{}({})", receiver, method.name(), duration),
        }
    }
}

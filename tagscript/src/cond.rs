//! Comparison engine behind the `{if: ...}` tag.
//!
//! A condition string is tested against the operators below in fixed order;
//! the first one found (by substring search) splits the condition into two
//! operands:
//!
//! | Operator        | Comparison                                        |
//! |-----------------|---------------------------------------------------|
//! | `==` / `!=`     | trimmed, case-insensitive string equality         |
//! | `>=` `<=` `>` `<` | integer ordering after thousands separators (`,`) are stripped |
//!
//! With no operator present the whole condition is a truthiness check: true
//! unless it case-insensitively equals one of the falsy words (`null`, `no`,
//! `false`, `none`) or is empty.
//!
//! The branch not taken is discarded without further dispatch, so a
//! side-effecting tag inside it never runs.

use crate::error::CompileError;

/// Operators by precedence. `>=`/`<=` are searched before the single-char
/// forms so `a <= b` is never read as `a < (= b)`.
const OPERATORS: [&str; 6] = ["==", "!=", ">=", "<=", ">", "<"];

const FALSY: [&str; 4] = ["null", "no", "false", "none"];

/// Pick a branch: `then_branch` when `condition` holds, `else_branch`
/// otherwise. Branches are returned verbatim; the dispatcher rescans only
/// the one chosen.
pub fn evaluate(
    condition: &str,
    then_branch: &str,
    else_branch: &str,
) -> Result<String, CompileError> {
    Ok(if eval_condition(condition)? {
        then_branch.to_owned()
    } else {
        else_branch.to_owned()
    })
}

/// Evaluate a condition string to a boolean.
pub fn eval_condition(condition: &str) -> Result<bool, CompileError> {
    for op in OPERATORS {
        let Some(pos) = condition.find(op) else { continue };
        let lhs = condition[..pos].trim();
        let rhs = condition[pos + op.len()..].trim();
        return Ok(match op {
            "==" => lhs.eq_ignore_ascii_case(rhs),
            "!=" => !lhs.eq_ignore_ascii_case(rhs),
            _ => {
                let a = parse_operand(condition, lhs)?;
                let b = parse_operand(condition, rhs)?;
                match op {
                    ">=" => a >= b,
                    "<=" => a <= b,
                    ">" => a > b,
                    _ => a < b,
                }
            }
        });
    }
    Ok(truthy(condition.trim()))
}

/// Truthiness of a bare value: everything is true except the falsy words and
/// the empty string.
pub fn truthy(value: &str) -> bool {
    !value.is_empty() && !FALSY.iter().any(|f| value.eq_ignore_ascii_case(f))
}

fn parse_operand(condition: &str, operand: &str) -> Result<i64, CompileError> {
    let stripped: String = operand.chars().filter(|c| *c != ',').collect();
    stripped
        .trim()
        .parse()
        .map_err(|_| CompileError::MalformedCondition {
            condition: condition.to_owned(),
            operand: operand.to_owned(),
        })
}

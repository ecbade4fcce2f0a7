//! Condition parsers
//!
//! Two declarative shapes compile to the same [`Predicate`]:
//! - expression strings: `calculation == 'relax' and (esm_bc == 'bc2' or esm_bc == 'bc3')`
//! - nested lists: `[["esm_bc", "==", "bc2"], "or", ["esm_bc", "==", "bc3"]]`

use super::ast::{CompareOp, Predicate};
use crate::form::error::ConditionError;
use crate::form::state::Value;

/// Parse a condition expression string into an AST
pub fn parse(input: &str) -> Result<Predicate, ConditionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ConditionError::Syntax("empty condition".to_string()));
    }

    if let Some(inner) = strip_outer_parens(input) {
        return parse(inner);
    }

    // `or` binds looser than `and`, so split on it first
    if let Some(pos) = find_top_level(input, " or ") {
        let left = parse(&input[..pos])?;
        let right = parse(&input[pos + 4..])?;
        return Ok(left.or(right));
    }
    if let Some(pos) = find_top_level(input, " and ") {
        let left = parse(&input[..pos])?;
        let right = parse(&input[pos + 5..])?;
        return Ok(left.and(right));
    }

    parse_comparison(input)
}

/// Compile a nested-list condition node.
///
/// A node is a comparison iff it has three elements with `==` or `!=` in the
/// middle; otherwise the middle must be `and` or `or` joining two nodes. A bare
/// string node is parsed as an expression.
pub fn from_tree(node: &serde_json::Value) -> Result<Predicate, ConditionError> {
    let items = match node {
        serde_json::Value::String(expr) => return parse(expr),
        serde_json::Value::Array(items) => items,
        other => {
            return Err(ConditionError::Syntax(format!(
                "expected a list or expression, found {}",
                other
            )))
        }
    };

    if items.len() != 3 {
        return Err(ConditionError::Arity(items.len()));
    }

    let op = items[1]
        .as_str()
        .ok_or_else(|| ConditionError::UnknownOperator(items[1].to_string()))?;

    if let Some(op) = CompareOp::from_symbol(op) {
        let key = items[0]
            .as_str()
            .filter(|k| is_valid_key(k))
            .ok_or_else(|| ConditionError::InvalidKey(items[0].to_string()))?;
        let literal = literal_from_json(&items[2])?;
        return Ok(Predicate::Leaf {
            key: key.to_string(),
            op,
            literal,
        });
    }

    match op.to_ascii_lowercase().as_str() {
        "and" => Ok(from_tree(&items[0])?.and(from_tree(&items[2])?)),
        "or" => Ok(from_tree(&items[0])?.or(from_tree(&items[2])?)),
        _ => Err(ConditionError::UnknownOperator(op.to_string())),
    }
}

fn parse_comparison(input: &str) -> Result<Predicate, ConditionError> {
    let operators = [("!=", CompareOp::NotEq), ("==", CompareOp::Eq)];

    for (op_str, op) in operators {
        if let Some(pos) = find_top_level(input, op_str) {
            let key = input[..pos].trim();
            if !is_valid_key(key) {
                return Err(ConditionError::InvalidKey(key.to_string()));
            }
            let literal = parse_literal(&input[pos + op_str.len()..])?;
            return Ok(Predicate::Leaf {
                key: key.to_string(),
                op,
                literal,
            });
        }
    }

    Err(ConditionError::Syntax(input.to_string()))
}

/// Byte offset of `needle` outside quotes and parentheses
fn find_top_level(input: &str, needle: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth -= 1,
                _ if depth == 0 && input[i..].starts_with(needle) => return Some(i),
                _ => {}
            },
        }
    }
    None
}

/// Inner text when the whole input is wrapped in one pair of parentheses
fn strip_outer_parens(input: &str) -> Option<&str> {
    if !input.starts_with('(') || !input.ends_with(')') {
        return None;
    }

    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        // The first group must close at the very end
                        return (i == input.len() - 1).then(|| input[1..i].trim());
                    }
                }
                _ => {}
            },
        }
    }
    None
}

fn parse_literal(input: &str) -> Result<Value, ConditionError> {
    let input = input.trim();

    if input == "true" {
        return Ok(Value::Flag(true));
    }
    if input == "false" {
        return Ok(Value::Flag(false));
    }

    // String (single or double quotes)
    if input.len() >= 2
        && ((input.starts_with('\'') && input.ends_with('\''))
            || (input.starts_with('"') && input.ends_with('"')))
    {
        return Ok(Value::Text(input[1..input.len() - 1].to_string()));
    }

    if let Ok(n) = input.parse::<i64>() {
        return Ok(Value::Index(n));
    }

    Err(ConditionError::InvalidLiteral(input.to_string()))
}

fn literal_from_json(value: &serde_json::Value) -> Result<Value, ConditionError> {
    match value {
        serde_json::Value::Bool(b) => Ok(Value::Flag(*b)),
        serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Index)
            .ok_or_else(|| ConditionError::InvalidLiteral(n.to_string())),
        other => Err(ConditionError::InvalidLiteral(other.to_string())),
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple_equality() {
        let pred = parse("calculation == 'relax'").unwrap();
        assert_eq!(pred, Predicate::eq("calculation", "relax"));
    }

    #[test]
    fn test_parse_not_equal() {
        let pred = parse("input_dft != \"blyp\"").unwrap();
        assert_eq!(pred, Predicate::ne("input_dft", "blyp"));
    }

    #[test]
    fn test_parse_flag_and_index_literals() {
        assert_eq!(
            parse("lda_plus_u == true").unwrap(),
            Predicate::eq("lda_plus_u", true)
        );
        assert_eq!(parse("gdir == 3").unwrap(), Predicate::eq("gdir", 3));
    }

    #[test]
    fn test_parse_and() {
        let pred = parse("assume_isolated == 'esm' and esm_bc == 'bc2'").unwrap();
        assert_eq!(
            pred,
            Predicate::eq("assume_isolated", "esm").and(Predicate::eq("esm_bc", "bc2"))
        );
    }

    #[test]
    fn test_or_binds_looser_than_and() {
        let pred = parse("a == 'x' and b == 'y' or c == 'z'").unwrap();
        assert_eq!(
            pred,
            Predicate::eq("a", "x")
                .and(Predicate::eq("b", "y"))
                .or(Predicate::eq("c", "z"))
        );
    }

    #[test]
    fn test_parentheses_group() {
        let pred =
            parse("assume_isolated == 'esm' and (esm_bc == 'bc2' or esm_bc == 'bc3')").unwrap();
        assert_eq!(
            pred,
            Predicate::eq("assume_isolated", "esm")
                .and(Predicate::eq("esm_bc", "bc2").or(Predicate::eq("esm_bc", "bc3")))
        );
    }

    #[test]
    fn test_outer_parens_only_when_enclosing() {
        let pred = parse("(a == 'x') or (b == 'y')").unwrap();
        assert_eq!(pred, Predicate::eq("a", "x").or(Predicate::eq("b", "y")));
    }

    #[test]
    fn test_operator_inside_quotes_ignored() {
        let pred = parse("title == 'a or b'").unwrap();
        assert_eq!(pred, Predicate::eq("title", "a or b"));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            parse("this is not valid"),
            Err(ConditionError::Syntax(_))
        ));
        assert!(matches!(
            parse("calculation == relax"),
            Err(ConditionError::InvalidLiteral(_))
        ));
        assert!(matches!(
            parse("bad key == 'x'"),
            Err(ConditionError::InvalidKey(_))
        ));
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_tree_leaf() {
        let pred = from_tree(&json!(["calculation", "==", "relax"])).unwrap();
        assert_eq!(pred, Predicate::eq("calculation", "relax"));
    }

    #[test]
    fn test_tree_nested_connectives() {
        let node = json!([
            ["assume_isolated", "==", "esm"],
            "and",
            [["esm_bc", "==", "bc2"], "or", ["esm_bc", "==", "bc3"]]
        ]);
        let pred = from_tree(&node).unwrap();
        assert_eq!(
            pred,
            Predicate::eq("assume_isolated", "esm")
                .and(Predicate::eq("esm_bc", "bc2").or(Predicate::eq("esm_bc", "bc3")))
        );
    }

    #[test]
    fn test_tree_scalar_literals() {
        assert_eq!(
            from_tree(&json!(["tefield", "!=", true])).unwrap(),
            Predicate::ne("tefield", true)
        );
        assert_eq!(
            from_tree(&json!(["gdir", "==", 2])).unwrap(),
            Predicate::eq("gdir", 2)
        );
    }

    #[test]
    fn test_tree_accepts_expression_children() {
        let node = json!(["calculation == 'md'", "or", ["calculation", "==", "relax"]]);
        assert_eq!(
            from_tree(&node).unwrap(),
            Predicate::eq("calculation", "md").or(Predicate::eq("calculation", "relax"))
        );
    }

    #[test]
    fn test_tree_wrong_arity() {
        assert_eq!(
            from_tree(&json!(["calculation", "=="])),
            Err(ConditionError::Arity(2))
        );
        assert_eq!(
            from_tree(&json!([["a", "==", "x"], "and", ["b", "==", "y"], "extra"])),
            Err(ConditionError::Arity(4))
        );
    }

    #[test]
    fn test_tree_unknown_operator() {
        assert_eq!(
            from_tree(&json!(["nspin", ">", "1"])),
            Err(ConditionError::UnknownOperator(">".to_string()))
        );
        assert!(matches!(
            from_tree(&json!(["nspin", 5, "1"])),
            Err(ConditionError::UnknownOperator(_))
        ));
    }

    #[test]
    fn test_tree_bad_leaf_parts() {
        assert!(matches!(
            from_tree(&json!([["a", "==", "x"], "==", "y"])),
            Err(ConditionError::InvalidKey(_))
        ));
        assert!(matches!(
            from_tree(&json!(["a", "==", ["x"]])),
            Err(ConditionError::InvalidLiteral(_))
        ));
        assert!(matches!(
            from_tree(&json!(["a", "==", 0.5])),
            Err(ConditionError::InvalidLiteral(_))
        ));
        assert!(matches!(from_tree(&json!(42)), Err(ConditionError::Syntax(_))));
    }
}

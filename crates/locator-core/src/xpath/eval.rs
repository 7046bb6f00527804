//! Evaluation of parsed expressions over a [`DomTree`].

use dom_snapshot::{normalize_space, DomTree, NodeId};

use crate::errors::XPathError;

use super::parser::{Axis, CompareOp, Expr, LocationPath, NodeTest, Step};

/// Result of evaluating a sub-expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Node-set in document order
    Nodes(Vec<NodeId>),
    /// Attribute values selected by an `@name` step, in document order
    Strings(Vec<String>),
    Str(String),
    Num(f64),
    Bool(bool),
}

#[derive(Clone, Copy, Debug)]
struct Context {
    node: NodeId,
    position: usize,
    size: usize,
}

pub struct Evaluator<'t> {
    tree: &'t DomTree,
}

impl<'t> Evaluator<'t> {
    pub fn new(tree: &'t DomTree) -> Self {
        Self { tree }
    }

    /// Evaluates a top-level expression, which must select element or text nodes.
    pub fn select(&self, expr: &Expr) -> Result<Vec<NodeId>, XPathError> {
        let root = Context {
            node: self.tree.document(),
            position: 1,
            size: 1,
        };
        match self.eval(expr, root)? {
            Value::Nodes(nodes) => Ok(nodes),
            Value::Strings(_) => Err(XPathError::unsupported(
                "attribute selection as a result",
            )),
            _ => Err(XPathError::unsupported("expression does not select nodes")),
        }
    }

    fn eval(&self, expr: &Expr, ctx: Context) -> Result<Value, XPathError> {
        match expr {
            Expr::Or(left, right) => Ok(Value::Bool(
                self.boolean(left, ctx)? || self.boolean(right, ctx)?,
            )),
            Expr::And(left, right) => Ok(Value::Bool(
                self.boolean(left, ctx)? && self.boolean(right, ctx)?,
            )),
            Expr::Compare(op, left, right) => {
                let left = self.eval(left, ctx)?;
                let right = self.eval(right, ctx)?;
                Ok(Value::Bool(self.compare(*op, &left, &right)))
            }
            Expr::Union(left, right) => {
                match (self.eval(left, ctx)?, self.eval(right, ctx)?) {
                    (Value::Nodes(mut a), Value::Nodes(b)) => {
                        a.extend(b);
                        Ok(Value::Nodes(self.sorted(a)))
                    }
                    _ => Err(XPathError::unsupported("union of non node-sets")),
                }
            }
            Expr::Path(path) => self.eval_path(path, ctx),
            Expr::Filter { base, predicates } => match self.eval(base, ctx)? {
                Value::Nodes(nodes) => {
                    Ok(Value::Nodes(self.apply_predicates(nodes, predicates)?))
                }
                _ => Err(XPathError::unsupported("predicate on a non node-set")),
            },
            Expr::Literal(value) => Ok(Value::Str(value.clone())),
            Expr::Number(value) => Ok(Value::Num(*value)),
            Expr::Call { name, args } => self.call(name, args, ctx),
        }
    }

    fn boolean(&self, expr: &Expr, ctx: Context) -> Result<bool, XPathError> {
        Ok(to_bool(&self.eval(expr, ctx)?))
    }

    fn string(&self, expr: &Expr, ctx: Context) -> Result<String, XPathError> {
        let value = self.eval(expr, ctx)?;
        Ok(self.to_string(&value))
    }

    fn eval_path(&self, path: &LocationPath, ctx: Context) -> Result<Value, XPathError> {
        let mut current = vec![if path.absolute {
            self.tree.document()
        } else {
            ctx.node
        }];

        for (index, step) in path.steps.iter().enumerate() {
            if step.axis == Axis::Attribute {
                if index + 1 != path.steps.len() {
                    return Err(XPathError::unsupported("steps after an attribute step"));
                }
                if !step.predicates.is_empty() {
                    return Err(XPathError::unsupported("predicates on attributes"));
                }
                return Ok(Value::Strings(self.attribute_values(&current, &step.test)));
            }

            let mut next = Vec::new();
            for node in &current {
                let candidates: Vec<NodeId> = self
                    .axis_nodes(*node, step.axis)
                    .into_iter()
                    .filter(|candidate| self.matches(*candidate, step))
                    .collect();
                next.extend(self.apply_predicates(candidates, &step.predicates)?);
            }
            current = self.sorted(next);
        }

        Ok(Value::Nodes(current))
    }

    /// Filters `nodes` (already in axis order) through each predicate in turn.
    fn apply_predicates(
        &self,
        mut nodes: Vec<NodeId>,
        predicates: &[Expr],
    ) -> Result<Vec<NodeId>, XPathError> {
        for predicate in predicates {
            let size = nodes.len();
            let mut kept = Vec::with_capacity(size);
            for (index, node) in nodes.into_iter().enumerate() {
                let ctx = Context {
                    node,
                    position: index + 1,
                    size,
                };
                let keep = match self.eval(predicate, ctx)? {
                    Value::Num(n) => n == ctx.position as f64,
                    other => to_bool(&other),
                };
                if keep {
                    kept.push(node);
                }
            }
            nodes = kept;
        }
        Ok(nodes)
    }

    /// Nodes on `axis` from `node`, in proximity order.
    fn axis_nodes(&self, node: NodeId, axis: Axis) -> Vec<NodeId> {
        let tree = self.tree;
        match axis {
            Axis::Child => tree.children(node).to_vec(),
            Axis::Descendant => tree.descendants(node),
            Axis::DescendantOrSelf => {
                let mut out = vec![node];
                out.extend(tree.descendants(node));
                out
            }
            Axis::SelfNode => vec![node],
            Axis::Parent => tree.parent(node).into_iter().collect(),
            Axis::Ancestor => tree.ancestors(node),
            Axis::AncestorOrSelf => {
                let mut out = vec![node];
                out.extend(tree.ancestors(node));
                out
            }
            Axis::FollowingSibling | Axis::PrecedingSibling => {
                let Some(parent) = tree.parent(node) else {
                    return Vec::new();
                };
                let siblings = tree.children(parent);
                let Some(index) = siblings.iter().position(|sibling| *sibling == node) else {
                    return Vec::new();
                };
                if axis == Axis::FollowingSibling {
                    siblings[index + 1..].to_vec()
                } else {
                    siblings[..index].iter().rev().copied().collect()
                }
            }
            Axis::Attribute => Vec::new(),
        }
    }

    fn matches(&self, node: NodeId, step: &Step) -> bool {
        match &step.test {
            NodeTest::Node => true,
            NodeTest::Text => self.tree.is_text(node),
            NodeTest::Any => self.tree.is_element(node),
            NodeTest::Name(name) => self
                .tree
                .tag_name(node)
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name)),
        }
    }

    fn attribute_values(&self, nodes: &[NodeId], test: &NodeTest) -> Vec<String> {
        let mut out = Vec::new();
        for node in nodes {
            for attribute in self.tree.attributes(*node) {
                let selected = match test {
                    NodeTest::Any | NodeTest::Node => true,
                    NodeTest::Name(name) => attribute.name.eq_ignore_ascii_case(name),
                    NodeTest::Text => false,
                };
                if selected {
                    out.push(attribute.value.clone());
                }
            }
        }
        out
    }

    fn sorted(&self, mut nodes: Vec<NodeId>) -> Vec<NodeId> {
        nodes.sort_by_key(|node| self.tree.doc_order(*node));
        nodes.dedup();
        nodes
    }

    fn to_string(&self, value: &Value) -> String {
        match value {
            Value::Nodes(nodes) => nodes
                .first()
                .map(|node| self.tree.string_value(*node))
                .unwrap_or_default(),
            Value::Strings(values) => values.first().cloned().unwrap_or_default(),
            Value::Str(value) => value.clone(),
            Value::Num(value) => format_number(*value),
            Value::Bool(value) => value.to_string(),
        }
    }

    fn to_number(&self, value: &Value) -> f64 {
        match value {
            Value::Num(value) => *value,
            Value::Bool(value) => {
                if *value {
                    1.0
                } else {
                    0.0
                }
            }
            other => parse_number(&self.to_string(other)),
        }
    }

    /// String values of a node-set like value, `None` for scalars.
    fn set_strings(&self, value: &Value) -> Option<Vec<String>> {
        match value {
            Value::Nodes(nodes) => Some(
                nodes
                    .iter()
                    .map(|node| self.tree.string_value(*node))
                    .collect(),
            ),
            Value::Strings(values) => Some(values.clone()),
            _ => None,
        }
    }

    fn compare(&self, op: CompareOp, left: &Value, right: &Value) -> bool {
        match (self.set_strings(left), self.set_strings(right)) {
            (Some(a), Some(b)) => a
                .iter()
                .any(|x| b.iter().any(|y| compare_strings(op, x, y))),
            (Some(set), None) => self.compare_set(op, &set, right, false),
            (None, Some(set)) => self.compare_set(op, &set, left, true),
            (None, None) => self.compare_scalars(op, left, right),
        }
    }

    /// Existential comparison of a node-set against a scalar. `flipped` means the
    /// scalar is the left operand.
    fn compare_set(&self, op: CompareOp, set: &[String], scalar: &Value, flipped: bool) -> bool {
        match scalar {
            Value::Bool(b) => {
                let set_bool = !set.is_empty();
                if flipped {
                    compare_bools(op, *b, set_bool)
                } else {
                    compare_bools(op, set_bool, *b)
                }
            }
            Value::Num(n) => set.iter().any(|item| {
                let item = parse_number(item);
                if flipped {
                    compare_numbers(op, *n, item)
                } else {
                    compare_numbers(op, item, *n)
                }
            }),
            other => {
                let s = self.to_string(other);
                set.iter().any(|item| {
                    if flipped {
                        compare_strings(op, &s, item)
                    } else {
                        compare_strings(op, item, &s)
                    }
                })
            }
        }
    }

    fn compare_scalars(&self, op: CompareOp, left: &Value, right: &Value) -> bool {
        match op {
            CompareOp::Eq | CompareOp::NotEq => {
                let equal = if matches!(left, Value::Bool(_)) || matches!(right, Value::Bool(_)) {
                    to_bool(left) == to_bool(right)
                } else if matches!(left, Value::Num(_)) || matches!(right, Value::Num(_)) {
                    self.to_number(left) == self.to_number(right)
                } else {
                    self.to_string(left) == self.to_string(right)
                };
                (op == CompareOp::Eq) == equal
            }
            _ => compare_numbers(op, self.to_number(left), self.to_number(right)),
        }
    }

    fn call(&self, name: &str, args: &[Expr], ctx: Context) -> Result<Value, XPathError> {
        let arity = |min: usize, max: usize| -> Result<(), XPathError> {
            if args.len() < min || args.len() > max {
                Err(XPathError::unsupported(format!(
                    "{name}() called with {} arguments",
                    args.len()
                )))
            } else {
                Ok(())
            }
        };
        // Zero-argument forms default to the context node.
        let context_string = || self.tree.string_value(ctx.node);

        match name {
            "contains" => {
                arity(2, 2)?;
                let haystack = self.string(&args[0], ctx)?;
                let needle = self.string(&args[1], ctx)?;
                Ok(Value::Bool(haystack.contains(&needle)))
            }
            "starts-with" => {
                arity(2, 2)?;
                let haystack = self.string(&args[0], ctx)?;
                let prefix = self.string(&args[1], ctx)?;
                Ok(Value::Bool(haystack.starts_with(&prefix)))
            }
            "normalize-space" => {
                arity(0, 1)?;
                let value = match args.first() {
                    Some(arg) => self.string(arg, ctx)?,
                    None => context_string(),
                };
                Ok(Value::Str(normalize_space(&value)))
            }
            "string" => {
                arity(0, 1)?;
                let value = match args.first() {
                    Some(arg) => self.string(arg, ctx)?,
                    None => context_string(),
                };
                Ok(Value::Str(value))
            }
            "string-length" => {
                arity(0, 1)?;
                let value = match args.first() {
                    Some(arg) => self.string(arg, ctx)?,
                    None => context_string(),
                };
                Ok(Value::Num(value.chars().count() as f64))
            }
            "concat" => {
                if args.len() < 2 {
                    return Err(XPathError::unsupported(
                        "concat() needs at least two arguments",
                    ));
                }
                let mut out = String::new();
                for arg in args {
                    out.push_str(&self.string(arg, ctx)?);
                }
                Ok(Value::Str(out))
            }
            "not" => {
                arity(1, 1)?;
                Ok(Value::Bool(!self.boolean(&args[0], ctx)?))
            }
            "true" => {
                arity(0, 0)?;
                Ok(Value::Bool(true))
            }
            "false" => {
                arity(0, 0)?;
                Ok(Value::Bool(false))
            }
            "position" => {
                arity(0, 0)?;
                Ok(Value::Num(ctx.position as f64))
            }
            "last" => {
                arity(0, 0)?;
                Ok(Value::Num(ctx.size as f64))
            }
            "count" => {
                arity(1, 1)?;
                match self.eval(&args[0], ctx)? {
                    Value::Nodes(nodes) => Ok(Value::Num(nodes.len() as f64)),
                    Value::Strings(values) => Ok(Value::Num(values.len() as f64)),
                    _ => Err(XPathError::unsupported("count() of a non node-set")),
                }
            }
            other => Err(XPathError::unsupported(format!("function {other}()"))),
        }
    }
}

fn to_bool(value: &Value) -> bool {
    match value {
        Value::Nodes(nodes) => !nodes.is_empty(),
        Value::Strings(values) => !values.is_empty(),
        Value::Str(value) => !value.is_empty(),
        Value::Num(value) => *value != 0.0 && !value.is_nan(),
        Value::Bool(value) => *value,
    }
}

fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n'));
    let valid = !trimmed.is_empty()
        && trimmed
            .strip_prefix('-')
            .unwrap_or(trimmed)
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.');
    if valid {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn compare_strings(op: CompareOp, left: &str, right: &str) -> bool {
    match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        _ => compare_numbers(op, parse_number(left), parse_number(right)),
    }
}

fn compare_numbers(op: CompareOp, left: f64, right: f64) -> bool {
    match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        CompareOp::Lt => left < right,
        CompareOp::Le => left <= right,
        CompareOp::Gt => left > right,
        CompareOp::Ge => left >= right,
    }
}

fn compare_bools(op: CompareOp, left: bool, right: bool) -> bool {
    match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        _ => compare_numbers(op, left as u8 as f64, right as u8 as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formatting_follows_xpath() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn number_parsing_rejects_garbage() {
        assert_eq!(parse_number(" 12 "), 12.0);
        assert!(parse_number("12px").is_nan());
        assert!(parse_number("").is_nan());
        assert_eq!(parse_number("-1.5"), -1.5);
    }

    #[test]
    fn truthiness() {
        assert!(!to_bool(&Value::Num(f64::NAN)));
        assert!(!to_bool(&Value::Str(String::new())));
        assert!(to_bool(&Value::Strings(vec![String::new()])));
    }
}

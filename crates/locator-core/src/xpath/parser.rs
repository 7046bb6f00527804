//! Recursive-descent parser producing the expression tree.

use crate::errors::XPathError;

use super::lexer::{tokenize, Spanned, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    SelfNode,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Attribute,
}

impl Axis {
    fn from_name(name: &str) -> Option<Axis> {
        Some(match name {
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "self" => Axis::SelfNode,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "following-sibling" => Axis::FollowingSibling,
            "preceding-sibling" => Axis::PrecedingSibling,
            "attribute" => Axis::Attribute,
            _ => return None,
        })
    }

    /// Reverse axes number their predicate positions from the context node outwards.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Parent | Axis::Ancestor | Axis::AncestorOrSelf | Axis::PrecedingSibling
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeTest {
    /// Lower-cased element or attribute name
    Name(String),
    Any,
    Text,
    Node,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Expr>,
}

impl Step {
    fn descendant_or_self() -> Self {
        Step {
            axis: Axis::DescendantOrSelf,
            test: NodeTest::Node,
            predicates: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocationPath {
    pub absolute: bool,
    pub steps: Vec<Step>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Union(Box<Expr>, Box<Expr>),
    Path(LocationPath),
    Filter {
        base: Box<Expr>,
        predicates: Vec<Expr>,
    },
    Literal(String),
    Number(f64),
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Deepest nesting of parentheses, predicates and call arguments accepted.
const MAX_NESTING: usize = 64;

pub fn parse(input: &str) -> Result<Expr, XPathError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(XPathError::syntax(0, "empty expression"));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        depth: 0,
    };
    let expr = parser.parse_or()?;
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(XPathError::syntax(
            extra.position,
            format!("unexpected {:?}", extra.token),
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|spanned| &spanned.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|spanned| &spanned.token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|spanned| spanned.position)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|spanned| spanned.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), XPathError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(XPathError::syntax(
                self.position(),
                format!("expected {expected:?}"),
            ))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(Token::Name(name)) if name == keyword => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn parse_or(&mut self) -> Result<Expr, XPathError> {
        if self.depth >= MAX_NESTING {
            return Err(XPathError::unsupported(format!(
                "expression nested deeper than {MAX_NESTING} levels"
            )));
        }
        self.depth += 1;
        let result = self.parse_or_operands();
        self.depth -= 1;
        result
    }

    fn parse_or_operands(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_equality()?;
        while self.eat_keyword("and") {
            let right = self.parse_equality()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Some(Token::Eq) => CompareOp::Eq,
                Some(Token::NotEq) => CompareOp::NotEq,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_relational()?;
            left = Expr::Compare(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_union()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => CompareOp::Lt,
                Some(Token::Le) => CompareOp::Le,
                Some(Token::Gt) => CompareOp::Gt,
                Some(Token::Ge) => CompareOp::Ge,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_union()?;
            left = Expr::Compare(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_union(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_path_expr()?;
        while self.eat(&Token::Pipe) {
            let right = self.parse_path_expr()?;
            left = Expr::Union(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_path_expr(&mut self) -> Result<Expr, XPathError> {
        match self.peek() {
            Some(Token::Slash) | Some(Token::DoubleSlash) => {
                Ok(Expr::Path(self.parse_absolute_path()?))
            }
            Some(Token::LParen) | Some(Token::Literal(_)) | Some(Token::Number(_)) => {
                self.parse_filter_expr()
            }
            Some(Token::Name(name))
                if self.peek_at(1) == Some(&Token::LParen) && !is_node_type(name) =>
            {
                self.parse_filter_expr()
            }
            Some(_) => {
                let mut steps = Vec::new();
                self.parse_relative_steps(&mut steps)?;
                Ok(Expr::Path(LocationPath {
                    absolute: false,
                    steps,
                }))
            }
            None => Err(XPathError::syntax(self.end, "unexpected end of expression")),
        }
    }

    fn parse_filter_expr(&mut self) -> Result<Expr, XPathError> {
        let primary = self.parse_primary()?;
        let predicates = self.parse_predicates()?;
        if matches!(self.peek(), Some(Token::Slash) | Some(Token::DoubleSlash)) {
            return Err(XPathError::unsupported(
                "location steps after a filter expression",
            ));
        }
        if predicates.is_empty() {
            Ok(primary)
        } else {
            Ok(Expr::Filter {
                base: Box::new(primary),
                predicates,
            })
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, XPathError> {
        let position = self.position();
        match self.advance() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Literal(value)) => Ok(Expr::Literal(value)),
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Name(name)) => {
                self.expect(Token::LParen)?;
                let mut args = Vec::new();
                if !self.eat(&Token::RParen) {
                    loop {
                        args.push(self.parse_or()?);
                        if self.eat(&Token::Comma) {
                            continue;
                        }
                        self.expect(Token::RParen)?;
                        break;
                    }
                }
                Ok(Expr::Call { name, args })
            }
            _ => Err(XPathError::syntax(position, "expected expression")),
        }
    }

    fn parse_absolute_path(&mut self) -> Result<LocationPath, XPathError> {
        let mut steps = Vec::new();
        if self.eat(&Token::DoubleSlash) {
            steps.push(Step::descendant_or_self());
            self.parse_relative_steps(&mut steps)?;
        } else {
            self.expect(Token::Slash)?;
            if self.starts_step() {
                self.parse_relative_steps(&mut steps)?;
            }
        }
        Ok(LocationPath {
            absolute: true,
            steps,
        })
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Name(_)) | Some(Token::Star) | Some(Token::At) | Some(Token::Dot)
                | Some(Token::DotDot)
        )
    }

    fn parse_relative_steps(&mut self, steps: &mut Vec<Step>) -> Result<(), XPathError> {
        loop {
            steps.push(self.parse_step()?);
            if self.eat(&Token::Slash) {
                continue;
            }
            if self.eat(&Token::DoubleSlash) {
                steps.push(Step::descendant_or_self());
                continue;
            }
            return Ok(());
        }
    }

    fn parse_step(&mut self) -> Result<Step, XPathError> {
        if self.eat(&Token::Dot) {
            return Ok(Step {
                axis: Axis::SelfNode,
                test: NodeTest::Node,
                predicates: self.parse_predicates()?,
            });
        }
        if self.eat(&Token::DotDot) {
            return Ok(Step {
                axis: Axis::Parent,
                test: NodeTest::Node,
                predicates: self.parse_predicates()?,
            });
        }

        let axis = if self.eat(&Token::At) {
            Axis::Attribute
        } else if let (Some(Token::Name(name)), Some(Token::ColonColon)) =
            (self.peek(), self.peek_at(1))
        {
            let position = self.position();
            let axis = Axis::from_name(name)
                .ok_or_else(|| XPathError::unsupported(format!("axis '{name}' at {position}")))?;
            self.pos += 2;
            axis
        } else {
            Axis::Child
        };

        let test = self.parse_node_test()?;
        let predicates = self.parse_predicates()?;
        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_node_test(&mut self) -> Result<NodeTest, XPathError> {
        let position = self.position();
        match self.advance() {
            Some(Token::Star) => Ok(NodeTest::Any),
            Some(Token::Name(name)) if self.peek() == Some(&Token::LParen) => {
                self.pos += 1;
                self.expect(Token::RParen)?;
                match name.as_str() {
                    "text" => Ok(NodeTest::Text),
                    "node" => Ok(NodeTest::Node),
                    other => Err(XPathError::unsupported(format!("node type {other}()"))),
                }
            }
            Some(Token::Name(name)) => Ok(NodeTest::Name(name.to_ascii_lowercase())),
            _ => Err(XPathError::syntax(position, "expected node test")),
        }
    }

    fn parse_predicates(&mut self) -> Result<Vec<Expr>, XPathError> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LBracket) {
            predicates.push(self.parse_or()?);
            self.expect(Token::RBracket)?;
        }
        Ok(predicates)
    }
}

fn is_node_type(name: &str) -> bool {
    matches!(
        name,
        "text" | "node" | "comment" | "processing-instruction"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(expr: Expr) -> LocationPath {
        match expr {
            Expr::Path(path) => path,
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn double_slash_expands_to_descendant_or_self() {
        let parsed = path(parse("//div/span").expect("parse"));
        assert!(parsed.absolute);
        assert_eq!(parsed.steps.len(), 3);
        assert_eq!(parsed.steps[0].axis, Axis::DescendantOrSelf);
        assert_eq!(parsed.steps[1].test, NodeTest::Name("div".into()));
        assert_eq!(parsed.steps[2].axis, Axis::Child);
    }

    #[test]
    fn predicates_keep_operator_precedence() {
        let parsed = path(parse("//a[@x='1' or @y='2' and @z='3']").expect("parse"));
        match &parsed.steps[1].predicates[0] {
            Expr::Or(_, right) => assert!(matches!(**right, Expr::And(_, _))),
            other => panic!("unexpected predicate {other:?}"),
        }
    }

    #[test]
    fn function_calls_and_node_types() {
        let parsed = path(parse("//*[contains(text(), 'Sign in')]").expect("parse"));
        match &parsed.steps[1].predicates[0] {
            Expr::Call { name, args } => {
                assert_eq!(name, "contains");
                assert_eq!(args.len(), 2);
                match &args[0] {
                    Expr::Path(inner) => assert_eq!(inner.steps[0].test, NodeTest::Text),
                    other => panic!("unexpected arg {other:?}"),
                }
            }
            other => panic!("unexpected predicate {other:?}"),
        }
    }

    #[test]
    fn explicit_axes_and_abbreviations() {
        let parsed = path(parse("../preceding-sibling::li[1]/.").expect("parse"));
        assert!(!parsed.absolute);
        assert_eq!(parsed.steps[0].axis, Axis::Parent);
        assert_eq!(parsed.steps[1].axis, Axis::PrecedingSibling);
        assert_eq!(parsed.steps[2].axis, Axis::SelfNode);
    }

    #[test]
    fn bare_slash_is_the_document() {
        let parsed = path(parse("/").expect("parse"));
        assert!(parsed.absolute);
        assert!(parsed.steps.is_empty());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse(""), Err(XPathError::Syntax { .. })));
        assert!(matches!(parse("//div["), Err(XPathError::Syntax { .. })));
        assert!(matches!(parse("//div]"), Err(XPathError::Syntax { .. })));
        assert!(matches!(
            parse("//namespace::x"),
            Err(XPathError::Unsupported(_))
        ));
        assert!(matches!(
            parse("//comment()"),
            Err(XPathError::Unsupported(_))
        ));
    }

    #[test]
    fn caps_nesting_depth() {
        let shallow = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert!(parse(&shallow).is_ok());

        let deep = format!("//a[{}1{}]", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(parse(&deep), Err(XPathError::Unsupported(_))));

        let predicates = format!("//a{}", "[b".repeat(5_000));
        assert!(parse(&predicates).is_err());
    }
}

// AST (Abstract Syntax Tree) definitions for Cuppa3 programs

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::ser::Formatter;
use std::fmt;
use std::io;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators. The operator symbol doubles as the node tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Le,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Le => "<=",
        }
    }

    /// Binding strength; higher binds tighter. All binary operators are
    /// left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Eq | BinOp::Le => 1,
            BinOp::Add | BinOp::Sub => 2,
            BinOp::Mul | BinOp::Div => 3,
        }
    }
}

/// Index or slice applied to a variable or an integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceSpec {
    /// `[i]`
    Point(i64),
    /// `[i:j]`
    Range(i64, i64),
}

impl fmt::Display for SliceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceSpec::Point(i) => write!(f, "{}", i),
            SliceSpec::Range(start, end) => write!(f, "({}, {})", start, end),
        }
    }
}

/// AST nodes for statements, expressions and sequences.
///
/// Every variant maps to exactly one tag and a fixed number of children, see
/// [`Node::tag`] and [`Node::children`].
///
/// A statement list of N items is a right-nested chain of N `Seq` cells, so
/// equality, dropping, tuple rendering and [`Node::write_json`] walk chains
/// with a loop instead of recursing once per cell.
#[derive(Debug, Clone)]
pub enum Node {
    // Sequences
    Seq(Box<Node>, Box<Node>),
    Nil,

    // Statements
    FunDecl {
        name: String,
        formal_args: Box<Node>,
        body: Box<Node>,
    },
    Declare {
        name: String,
        init: Box<Node>,
    },
    Assign {
        name: String,
        value: Box<Node>,
    },
    Get(String),
    Put(Box<Node>),
    CallStmt {
        name: String,
        args: Box<Node>,
    },
    Return(Box<Node>),
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    If {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    Block(Box<Node>),

    // Expressions
    Id(String),
    Integer(i64),
    IntIndex {
        value: i64,
        slice: SliceSpec,
    },
    Index {
        name: String,
        slice: SliceSpec,
    },
    CallExp {
        name: String,
        args: Box<Node>,
    },
    Paren(Box<Node>),
    Bracket(Box<Node>),
    List(Box<Node>),
    UMinus(Box<Node>),
    Not(Box<Node>),
    BinaryOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A child slot of a node: either another node or a primitive value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child<'a> {
    Node(&'a Node),
    Name(&'a str),
    Int(i64),
    Slice(SliceSpec),
}

impl Node {
    /// Build a right-nested `seq` chain terminated by `nil`, keeping the
    /// order of `items`.
    pub fn sequence(items: Vec<Node>) -> Node {
        items
            .into_iter()
            .rev()
            .fold(Node::Nil, |rest, item| Node::Seq(Box::new(item), Box::new(rest)))
    }

    pub fn binary(op: BinOp, left: Node, right: Node) -> Node {
        Node::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Node::Nil)
    }

    /// Iterate the items of a `seq` chain. A non-sequence node yields nothing.
    pub fn seq_items(&self) -> SeqItems<'_> {
        SeqItems { current: self }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Node::Seq(..) => "seq",
            Node::Nil => "nil",
            Node::FunDecl { .. } => "fundecl",
            Node::Declare { .. } => "declare",
            Node::Assign { .. } => "assign",
            Node::Get(_) => "get",
            Node::Put(_) => "put",
            Node::CallStmt { .. } => "callstmt",
            Node::Return(_) => "return",
            Node::While { .. } => "while",
            Node::If { .. } => "if",
            Node::Block(_) => "block",
            Node::Id(_) => "id",
            Node::Integer(_) => "integer",
            Node::IntIndex { .. } => "intindex",
            Node::Index { .. } => "index",
            Node::CallExp { .. } => "callexp",
            Node::Paren(_) => "paren",
            Node::Bracket(_) => "bracket",
            Node::List(_) => "list",
            Node::UMinus(_) => "uminus",
            Node::Not(_) => "not",
            Node::BinaryOp { op, .. } => op.symbol(),
        }
    }

    /// Children in wire order
    pub fn children(&self) -> Vec<Child<'_>> {
        match self {
            Node::Seq(item, rest) => vec![Child::Node(item), Child::Node(rest)],
            Node::Nil => Vec::new(),
            Node::FunDecl {
                name,
                formal_args,
                body,
            } => vec![Child::Name(name), Child::Node(formal_args), Child::Node(body)],
            Node::Declare { name, init } => vec![Child::Name(name), Child::Node(init)],
            Node::Assign { name, value } => vec![Child::Name(name), Child::Node(value)],
            Node::Get(name) | Node::Id(name) => vec![Child::Name(name)],
            Node::Put(expr)
            | Node::Return(expr)
            | Node::Block(expr)
            | Node::Paren(expr)
            | Node::Bracket(expr)
            | Node::List(expr)
            | Node::UMinus(expr)
            | Node::Not(expr) => vec![Child::Node(expr)],
            Node::CallStmt { name, args } | Node::CallExp { name, args } => {
                vec![Child::Name(name), Child::Node(args)]
            }
            Node::While { condition, body } => vec![Child::Node(condition), Child::Node(body)],
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => vec![
                Child::Node(condition),
                Child::Node(then_branch),
                Child::Node(else_branch),
            ],
            Node::Integer(value) => vec![Child::Int(*value)],
            Node::IntIndex { value, slice } => vec![Child::Int(*value), Child::Slice(*slice)],
            Node::Index { name, slice } => vec![Child::Name(name), Child::Slice(*slice)],
            Node::BinaryOp { left, right, .. } => vec![Child::Node(left), Child::Node(right)],
        }
    }
}

/// Iterator over the items of a `seq` chain
pub struct SeqItems<'a> {
    current: &'a Node,
}

impl<'a> Iterator for SeqItems<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            Node::Seq(item, rest) => {
                self.current = rest;
                Some(item)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Child<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Node(node) => write!(f, "{}", node),
            Child::Name(name) => write!(f, "'{}'", name),
            Child::Int(value) => write!(f, "{}", value),
            Child::Slice(slice) => write!(f, "{}", slice),
        }
    }
}

/// Tuple notation: `('tag', child, ...)`, with `('nil',)` for childless nodes
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Node::Seq(..) = self {
            let mut open = 0;
            let mut current = self;
            while let Node::Seq(item, rest) = current {
                write!(f, "('seq', {}, ", item)?;
                open += 1;
                current = rest;
            }
            write!(f, "{}", current)?;
            return (0..open).try_for_each(|_| write!(f, ")"));
        }

        let children = self.children();
        write!(f, "('{}'", self.tag())?;
        if children.is_empty() {
            return write!(f, ",)");
        }
        for child in children {
            write!(f, ", {}", child)?;
        }
        write!(f, ")")
    }
}

/// Two nodes are equal when their tags and children are, compared with an
/// explicit work list.
impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        let mut pending = vec![(self, other)];

        while let Some((left, right)) = pending.pop() {
            if left.tag() != right.tag() {
                return false;
            }
            let (left_children, right_children) = (left.children(), right.children());
            if left_children.len() != right_children.len() {
                return false;
            }
            for pair in left_children.into_iter().zip(right_children) {
                match pair {
                    (Child::Node(l), Child::Node(r)) => pending.push((l, r)),
                    (l, r) => {
                        if l != r {
                            return false;
                        }
                    }
                }
            }
        }

        true
    }
}

impl Eq for Node {}

impl Drop for Node {
    fn drop(&mut self) {
        let Node::Seq(_, rest) = self else {
            return;
        };
        // Unlink the chain cell by cell; each cell then drops with a `nil` tail.
        let mut tail = std::mem::replace(&mut **rest, Node::Nil);
        while let Node::Seq(_, next) = &mut tail {
            let following = std::mem::replace(&mut **next, Node::Nil);
            tail = following;
        }
    }
}

impl Serialize for SliceSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SliceSpec::Point(i) => serializer.serialize_i64(*i),
            SliceSpec::Range(start, end) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(start)?;
                seq.serialize_element(end)?;
                seq.end()
            }
        }
    }
}

impl Serialize for Child<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Child::Node(node) => node.serialize(serializer),
            Child::Name(name) => serializer.serialize_str(name),
            Child::Int(value) => serializer.serialize_i64(*value),
            Child::Slice(slice) => slice.serialize(serializer),
        }
    }
}

/// JSON notation: `["tag", child, ...]`
///
/// Serde nests one `serialize` call per array, so this recurses once per
/// `seq` cell. Use [`Node::write_json`] for arbitrarily long programs.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.children();
        let mut seq = serializer.serialize_seq(Some(children.len() + 1))?;
        seq.serialize_element(self.tag())?;
        for child in &children {
            seq.serialize_element(child)?;
        }
        seq.end()
    }
}

/// Pending work for [`Node::write_json`]
enum JsonStep<'a> {
    Open(&'a Node),
    Tag(&'static str),
    Scalar(Child<'a>),
    BeginValue(bool),
    EndValue,
    Close,
}

impl Node {
    /// Write the JSON notation through a `serde_json` formatter.
    ///
    /// Produces the same bytes as serializing with `serde_json` and the same
    /// formatter (`CompactFormatter` or `PrettyFormatter`), but walks the
    /// tree with an explicit stack.
    pub fn write_json<W, F>(&self, writer: &mut W, formatter: &mut F) -> io::Result<()>
    where
        W: io::Write,
        F: Formatter,
    {
        let mut steps = vec![JsonStep::Open(self)];

        while let Some(step) = steps.pop() {
            match step {
                JsonStep::Open(node) => {
                    formatter.begin_array(writer)?;
                    steps.push(JsonStep::Close);
                    for child in node.children().into_iter().rev() {
                        steps.push(JsonStep::EndValue);
                        steps.push(match child {
                            Child::Node(inner) => JsonStep::Open(inner),
                            scalar => JsonStep::Scalar(scalar),
                        });
                        steps.push(JsonStep::BeginValue(false));
                    }
                    steps.push(JsonStep::EndValue);
                    steps.push(JsonStep::Tag(node.tag()));
                    steps.push(JsonStep::BeginValue(true));
                }
                JsonStep::Tag(tag) => serde_json::to_writer(&mut *writer, tag)?,
                JsonStep::Scalar(Child::Name(name)) => serde_json::to_writer(&mut *writer, name)?,
                JsonStep::Scalar(Child::Int(value))
                | JsonStep::Scalar(Child::Slice(SliceSpec::Point(value))) => {
                    formatter.write_i64(writer, value)?
                }
                JsonStep::Scalar(Child::Slice(SliceSpec::Range(start, end))) => {
                    formatter.begin_array(writer)?;
                    for (position, bound) in [start, end].into_iter().enumerate() {
                        formatter.begin_array_value(writer, position == 0)?;
                        formatter.write_i64(writer, bound)?;
                        formatter.end_array_value(writer)?;
                    }
                    formatter.end_array(writer)?;
                }
                JsonStep::Scalar(Child::Node(inner)) => steps.push(JsonStep::Open(inner)),
                JsonStep::BeginValue(first) => formatter.begin_array_value(writer, first)?,
                JsonStep::EndValue => formatter.end_array_value(writer)?,
                JsonStep::Close => formatter.end_array(writer)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_right_nested() {
        let seq = Node::sequence(vec![Node::Integer(1), Node::Integer(2)]);
        assert_eq!(
            seq.to_string(),
            "('seq', ('integer', 1), ('seq', ('integer', 2), ('nil',)))"
        );

        let items: Vec<&Node> = seq.seq_items().collect();
        assert_eq!(items, vec![&Node::Integer(1), &Node::Integer(2)]);
    }

    #[test]
    fn test_empty_sequence_is_nil() {
        assert!(Node::sequence(Vec::new()).is_nil());
        assert_eq!(Node::Nil.seq_items().count(), 0);
    }

    #[test]
    fn test_binary_tag_is_symbol() {
        let node = Node::binary(BinOp::Le, Node::Id("a".into()), Node::Integer(0));
        assert_eq!(node.tag(), "<=");
        assert_eq!(node.to_string(), "('<=', ('id', 'a'), ('integer', 0))");
    }

    #[test]
    fn test_slice_rendering() {
        let point = Node::Index {
            name: "x".into(),
            slice: SliceSpec::Point(1),
        };
        let range = Node::IntIndex {
            value: 7,
            slice: SliceSpec::Range(1, 3),
        };
        assert_eq!(point.to_string(), "('index', 'x', 1)");
        assert_eq!(range.to_string(), "('intindex', 7, (1, 3))");
    }

    #[test]
    fn test_json_shape() {
        let node = Node::Declare {
            name: "x".into(),
            init: Box::new(Node::Index {
                name: "y".into(),
                slice: SliceSpec::Range(0, 2),
            }),
        };
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"["declare","x",["index","y",[0,2]]]"#);
    }

    #[test]
    fn test_long_chains_render_compare_and_drop() {
        let items = || (0..100_000).map(Node::Integer).collect::<Vec<_>>();
        let first = Node::sequence(items());
        let second = Node::sequence(items());
        assert_eq!(first, second);
        assert_ne!(first, Node::sequence((0..99_999).map(Node::Integer).collect()));

        let text = first.to_string();
        assert!(text.starts_with("('seq', ('integer', 0), ('seq', ('integer', 1), "));
        assert!(text.ends_with("('integer', 99999), ('nil',))))"));
        assert_eq!(text.matches(')').count(), 200_001);

        drop(first);
        drop(second);
    }

    #[test]
    fn test_equality_compares_scalars() {
        let a = Node::Index {
            name: "x".into(),
            slice: SliceSpec::Point(1),
        };
        let b = Node::Index {
            name: "x".into(),
            slice: SliceSpec::Range(1, 2),
        };
        assert_ne!(a, b);
        assert_ne!(Node::Get("x".into()), Node::Id("x".into()));
        assert_ne!(
            Node::binary(BinOp::Add, Node::Integer(1), Node::Integer(2)),
            Node::binary(BinOp::Sub, Node::Integer(1), Node::Integer(2))
        );
    }

    #[test]
    fn test_write_json_matches_serde() {
        use serde_json::ser::{CompactFormatter, PrettyFormatter};

        let node = Node::sequence(vec![
            Node::Assign {
                name: "y".into(),
                value: Box::new(Node::List(Box::new(Node::sequence(vec![
                    Node::IntIndex {
                        value: 7,
                        slice: SliceSpec::Range(0, 2),
                    },
                    Node::UMinus(Box::new(Node::Integer(3))),
                ])))),
            },
            Node::Put(Box::new(Node::Index {
                name: "y".into(),
                slice: SliceSpec::Point(1),
            })),
        ]);

        let mut compact = Vec::new();
        node.write_json(&mut compact, &mut CompactFormatter).unwrap();
        assert_eq!(String::from_utf8(compact).unwrap(), serde_json::to_string(&node).unwrap());

        let mut pretty = Vec::new();
        node.write_json(&mut pretty, &mut PrettyFormatter::new()).unwrap();
        assert_eq!(
            String::from_utf8(pretty).unwrap(),
            serde_json::to_string_pretty(&node).unwrap()
        );
    }
}

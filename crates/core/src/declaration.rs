//! Declaration and branch-target resolution.
//!
//! A variable's declaration is found by an ordered chain of strategies
//! combined with [`DeclarationStrategy::or_else`]; the first one to answer
//! wins. Branch targets and `CALL` targets bypass the chain and use label
//! and subroutine lookup.

use pickscope_syntax::{Field, Node, NodeKind};

fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// A way of finding the construct that declares `name`.
pub trait DeclarationStrategy: Send + Sync {
    fn resolve<'t>(&self, root: Node<'t>, name: &str) -> Option<Node<'t>>;

    /// Try `self`, then `other` if `self` finds nothing.
    fn or_else<S: DeclarationStrategy>(self, other: S) -> OrElse<Self, S>
    where
        Self: Sized,
    {
        OrElse {
            first: self,
            second: other,
        }
    }
}

pub struct OrElse<A, B> {
    first: A,
    second: B,
}

impl<A: DeclarationStrategy, B: DeclarationStrategy> DeclarationStrategy for OrElse<A, B> {
    fn resolve<'t>(&self, root: Node<'t>, name: &str) -> Option<Node<'t>> {
        self.first
            .resolve(root, name)
            .or_else(|| self.second.resolve(root, name))
    }
}

/// `EQU`/`EQUATE`, `COMMON`, `DIM` and `SUBROUTINE` statements at top level.
pub struct ExplicitDeclaration {
    forms: &'static [NodeKind],
}

impl ExplicitDeclaration {
    pub fn all() -> Self {
        Self {
            forms: &[
                NodeKind::EquateStatement,
                NodeKind::CommonStatement,
                NodeKind::DimStatement,
                NodeKind::SubroutineStatement,
            ],
        }
    }

    /// The forms hover describes: constants, arrays and shared variables.
    pub fn data_forms() -> Self {
        Self {
            forms: &[
                NodeKind::EquateStatement,
                NodeKind::DimStatement,
                NodeKind::CommonStatement,
            ],
        }
    }

    fn declares(&self, statement: Node<'_>, name: &str) -> bool {
        if !self.forms.contains(&statement.kind()) {
            return false;
        }
        let names = |node: Node<'_>| node.is(NodeKind::Identifier) && same_name(node.text(), name);
        match statement.kind() {
            // Values and subscripts are references, not declarations.
            NodeKind::DimStatement => statement
                .children()
                .filter(|n| n.is(NodeKind::DimSpec))
                .filter_map(|spec| spec.child_by_field(Field::Name))
                .any(names),
            NodeKind::EquateStatement | NodeKind::CommonStatement => statement
                .children()
                .filter(|n| n.field() == Some(Field::Name))
                .any(names),
            // Subroutine name and parameters.
            _ => statement.children().any(names),
        }
    }
}

impl DeclarationStrategy for ExplicitDeclaration {
    fn resolve<'t>(&self, root: Node<'t>, name: &str) -> Option<Node<'t>> {
        root.children()
            .find(|statement| self.declares(*statement, name))
    }
}

/// `FOR` statements binding `name` as the loop variable.
pub struct LoopBinding;

impl DeclarationStrategy for LoopBinding {
    fn resolve<'t>(&self, root: Node<'t>, name: &str) -> Option<Node<'t>> {
        root.descendants().filter(|n| n.is(NodeKind::ForStatement)).find(|statement| {
            statement
                .child_by_field(Field::Variable)
                .or_else(|| statement.first_child_of_kind(NodeKind::Identifier))
                .is_some_and(|variable| same_name(variable.text(), name))
        })
    }
}

/// The first assignment in document order whose target is `name`.
pub struct FirstAssignment;

impl DeclarationStrategy for FirstAssignment {
    fn resolve<'t>(&self, root: Node<'t>, name: &str) -> Option<Node<'t>> {
        root.descendants()
            .filter(|n| n.is(NodeKind::AssignmentStatement))
            .find(|statement| {
                statement
                    .first_child_of_kind(NodeKind::Lvalue)
                    .and_then(|lvalue| lvalue.first_child_of_kind(NodeKind::Identifier))
                    .is_some_and(|target| same_name(target.text(), name))
            })
    }
}

pub fn build_declaration_resolver() -> impl DeclarationStrategy {
    ExplicitDeclaration::all()
        .or_else(LoopBinding)
        .or_else(FirstAssignment)
}

/// The construct declaring `name`, compared case-insensitively.
pub fn resolve_declaration<'t>(root: Node<'t>, name: &str) -> Option<Node<'t>> {
    build_declaration_resolver().resolve(root, name)
}

/// The `label` whose name matches `name`. Top-level labels are preferred;
/// labels nested in blocks are searched only when none matches.
pub fn find_label<'t>(root: Node<'t>, name: &str) -> Option<Node<'t>> {
    root.children()
        .find(|n| is_label_named(*n, name))
        .or_else(|| root.descendants().skip(1).find(|n| is_label_named(*n, name)))
}

fn is_label_named(node: Node<'_>, name: &str) -> bool {
    node.is(NodeKind::Label)
        && node
            .child_by_field(Field::Name)
            .is_some_and(|n| same_name(n.text(), name))
}

/// The top-level `subroutine_statement` with an identifier matching `name`.
pub fn find_subroutine<'t>(root: Node<'t>, name: &str) -> Option<Node<'t>> {
    root.children()
        .filter(|n| n.is(NodeKind::SubroutineStatement))
        .find(|statement| {
            statement
                .children()
                .any(|c| c.is(NodeKind::Identifier) && same_name(c.text(), name))
        })
}

fn is_branch(statement: Node<'_>) -> bool {
    match statement.kind() {
        NodeKind::GotoStatement | NodeKind::GosubStatement | NodeKind::OnGotoStatement => true,
        NodeKind::ReturnStatement => statement.children().any(|c| c.text().eq_ignore_ascii_case("TO")),
        _ => false,
    }
}

fn is_target_kind(node: Node<'_>) -> bool {
    !node.is_missing()
        && matches!(
            node.kind(),
            NodeKind::Number | NodeKind::Identifier | NodeKind::LabelName
        )
}

/// Label operands of a branch statement. For `ON … GOTO` the selector
/// expression before the keyword is excluded.
pub fn branch_targets<'t>(statement: Node<'t>) -> Vec<Node<'t>> {
    let children: Vec<Node<'t>> = statement.children().collect();
    let start = if statement.is(NodeKind::OnGotoStatement) {
        children
            .iter()
            .rposition(|c| {
                c.is(NodeKind::Token)
                    && ["GOTO", "GOSUB", "GO", "TO"]
                        .iter()
                        .any(|w| c.text().eq_ignore_ascii_case(w))
            })
            .map_or(children.len(), |keyword| keyword + 1)
    } else {
        0
    };
    children[start..]
        .iter()
        .copied()
        .filter(|c| is_target_kind(*c))
        .collect()
}

/// Where the node under the cursor is defined.
///
/// Branch statements resolve to a label whether the cursor is on the keyword
/// or the target; `CALL` resolves to a subroutine; identifiers go through
/// [`resolve_declaration`]; bare numbers and label names through
/// [`find_label`].
pub fn find_definition<'t>(root: Node<'t>, node: Node<'t>) -> Option<Node<'t>> {
    if let Some(parent) = node.parent().filter(|p| is_branch(*p)) {
        let targets = branch_targets(parent);
        if targets.contains(&node) {
            return find_label(root, node.text());
        }
        // The ON selector is an ordinary expression.
        if !node.is(NodeKind::Identifier) || !parent.is(NodeKind::OnGotoStatement) {
            return targets.first().and_then(|t| find_label(root, t.text()));
        }
    }

    if let Some(parent) = node.parent().filter(|p| p.is(NodeKind::CallStatement)) {
        let callee = if node.is(NodeKind::Identifier) {
            Some(node)
        } else {
            parent.first_child_of_kind(NodeKind::Identifier)
        };
        return callee.and_then(|c| find_subroutine(root, c.text()));
    }

    match node.kind() {
        NodeKind::Identifier => resolve_declaration(root, node.text()),
        NodeKind::Number | NodeKind::LabelName => find_label(root, node.text()),
        _ => None,
    }
}

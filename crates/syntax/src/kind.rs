/// Node types produced by Pick BASIC grammars.
///
/// Anonymous leaves (keywords, operators, punctuation) are all [`NodeKind::Token`];
/// their grammar type is their own text. Named types that a foreign grammar
/// emits but this dialect does not know become [`NodeKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    SourceFile,
    Label,
    SubroutineStatement,
    DimStatement,
    DimSpec,
    EquateStatement,
    CommonStatement,
    ForStatement,
    LoopStatement,
    IfStatement,
    CaseStatement,
    CaseClause,
    AssignmentStatement,
    Lvalue,
    GotoStatement,
    GosubStatement,
    OnGotoStatement,
    CallStatement,
    ReturnStatement,
    PrintStatement,
    EndStatement,
    KeywordStatement,
    FunctionCall,
    BinaryExpression,
    UnaryExpression,
    ParenthesizedExpression,
    SubstringExpression,
    Identifier,
    Number,
    LabelName,
    String,
    Comment,
    Error,
    Token,
    Unknown,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::SourceFile => "source_file",
            NodeKind::Label => "label",
            NodeKind::SubroutineStatement => "subroutine_statement",
            NodeKind::DimStatement => "dim_statement",
            NodeKind::DimSpec => "dim_spec",
            NodeKind::EquateStatement => "equate_statement",
            NodeKind::CommonStatement => "common_statement",
            NodeKind::ForStatement => "for_statement",
            NodeKind::LoopStatement => "loop_statement",
            NodeKind::IfStatement => "if_statement",
            NodeKind::CaseStatement => "case_statement",
            NodeKind::CaseClause => "case_clause",
            NodeKind::AssignmentStatement => "assignment_statement",
            NodeKind::Lvalue => "lvalue",
            NodeKind::GotoStatement => "goto_statement",
            NodeKind::GosubStatement => "gosub_statement",
            NodeKind::OnGotoStatement => "on_goto_statement",
            NodeKind::CallStatement => "call_statement",
            NodeKind::ReturnStatement => "return_statement",
            NodeKind::PrintStatement => "print_statement",
            NodeKind::EndStatement => "end_statement",
            NodeKind::KeywordStatement => "keyword_statement",
            NodeKind::FunctionCall => "function_call",
            NodeKind::BinaryExpression => "binary_expression",
            NodeKind::UnaryExpression => "unary_expression",
            NodeKind::ParenthesizedExpression => "parenthesized_expression",
            NodeKind::SubstringExpression => "substring_expression",
            NodeKind::Identifier => "identifier",
            NodeKind::Number => "number",
            NodeKind::LabelName => "label_name",
            NodeKind::String => "string",
            NodeKind::Comment => "comment",
            NodeKind::Error => "ERROR",
            NodeKind::Token => "token",
            NodeKind::Unknown => "unknown",
        }
    }

    /// Maps a named grammar type onto the closed set. Returns `None` for
    /// types outside the dialect.
    pub fn from_name(name: &str) -> Option<NodeKind> {
        let kind = match name {
            "source_file" => NodeKind::SourceFile,
            "label" => NodeKind::Label,
            "subroutine_statement" => NodeKind::SubroutineStatement,
            "dim_statement" => NodeKind::DimStatement,
            "dim_spec" => NodeKind::DimSpec,
            "equate_statement" => NodeKind::EquateStatement,
            "common_statement" => NodeKind::CommonStatement,
            "for_statement" => NodeKind::ForStatement,
            "loop_statement" => NodeKind::LoopStatement,
            "if_statement" => NodeKind::IfStatement,
            "case_statement" => NodeKind::CaseStatement,
            "case_clause" => NodeKind::CaseClause,
            "assignment_statement" => NodeKind::AssignmentStatement,
            "lvalue" => NodeKind::Lvalue,
            "goto_statement" => NodeKind::GotoStatement,
            "gosub_statement" => NodeKind::GosubStatement,
            "on_goto_statement" => NodeKind::OnGotoStatement,
            "call_statement" => NodeKind::CallStatement,
            "return_statement" => NodeKind::ReturnStatement,
            "print_statement" => NodeKind::PrintStatement,
            "end_statement" => NodeKind::EndStatement,
            "keyword_statement" => NodeKind::KeywordStatement,
            "function_call" => NodeKind::FunctionCall,
            "binary_expression" => NodeKind::BinaryExpression,
            "unary_expression" => NodeKind::UnaryExpression,
            "parenthesized_expression" => NodeKind::ParenthesizedExpression,
            "substring_expression" => NodeKind::SubstringExpression,
            "identifier" => NodeKind::Identifier,
            "number" => NodeKind::Number,
            "label_name" => NodeKind::LabelName,
            "string" => NodeKind::String,
            "comment" | "inline_comment" => NodeKind::Comment,
            "ERROR" => NodeKind::Error,
            _ => return None,
        };
        Some(kind)
    }

    /// Statements that may carry a branch target (numeric or named label).
    pub fn is_label_bearing(&self) -> bool {
        matches!(
            self,
            NodeKind::Label
                | NodeKind::GotoStatement
                | NodeKind::GosubStatement
                | NodeKind::OnGotoStatement
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named-field labels attached to a child by its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Variable,
    Value,
    Condition,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Variable => "variable",
            Field::Value => "value",
            Field::Condition => "condition",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        match name {
            "name" => Some(Field::Name),
            "variable" => Some(Field::Variable),
            "value" => Some(Field::Value),
            "condition" => Some(Field::Condition),
            _ => None,
        }
    }
}

//! abstract syntax tree of match expressions
//!
//! Every node owns its children, so a tree can be moved and cloned freely.
//! The textual vocabulary (keywords, entity origins) lives here as well, the
//! wire vocabulary of the REST API is handled by [super::mapper].

/// A boolean match expression over entity tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Binary {
        operator: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Not(Box<Expression>),
    Comparison(Comparison),
}

impl Expression {
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::Binary {
            operator: LogicalOperator::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::Binary {
            operator: LogicalOperator::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expression) -> Self {
        Self::Not(Box::new(operand))
    }
}

impl From<Comparison> for Expression {
    fn from(value: Comparison) -> Self {
        Expression::Comparison(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// A single tag matcher: `[entity:]tag OPERATOR [value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub entity: Option<EntityOrigin>,
    pub tag: String,
    pub operator: ComparisonOperator,
    /// absent for unary operators
    pub value: Option<String>,
}

impl Comparison {
    pub fn binary(tag: impl Into<String>, operator: ComparisonOperator, value: impl Into<String>) -> Self {
        Self {
            entity: None,
            tag: tag.into(),
            operator,
            value: Some(value.into()),
        }
    }

    pub fn unary(tag: impl Into<String>, operator: ComparisonOperator) -> Self {
        Self {
            entity: None,
            tag: tag.into(),
            operator,
            value: None,
        }
    }

    pub fn with_entity(mut self, entity: EntityOrigin) -> Self {
        self.entity = Some(entity);
        self
    }
}

/// Narrows which side of a call a comparison applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOrigin {
    Source,
    Destination,
    NotApplicable,
}

impl EntityOrigin {
    pub const ALL: &'static [EntityOrigin] = &[
        EntityOrigin::Source,
        EntityOrigin::Destination,
        EntityOrigin::NotApplicable,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            EntityOrigin::Source => "src",
            EntityOrigin::Destination => "dest",
            EntityOrigin::NotApplicable => "na",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|origin| origin.keyword().eq_ignore_ascii_case(keyword))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equals,
    NotEqual,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    IsEmpty,
    NotEmpty,
    IsBlank,
    NotBlank,
}

impl ComparisonOperator {
    pub const ALL: &'static [ComparisonOperator] = &[
        ComparisonOperator::Equals,
        ComparisonOperator::NotEqual,
        ComparisonOperator::Contains,
        ComparisonOperator::NotContains,
        ComparisonOperator::StartsWith,
        ComparisonOperator::NotStartsWith,
        ComparisonOperator::EndsWith,
        ComparisonOperator::NotEndsWith,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterOrEqual,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessOrEqual,
        ComparisonOperator::IsEmpty,
        ComparisonOperator::NotEmpty,
        ComparisonOperator::IsBlank,
        ComparisonOperator::NotBlank,
    ];

    pub fn keyword(&self) -> &'static str {
        use ComparisonOperator::*;
        match self {
            Equals => "EQUALS",
            NotEqual => "NOT_EQUAL",
            Contains => "CONTAINS",
            NotContains => "NOT_CONTAINS",
            StartsWith => "STARTS_WITH",
            NotStartsWith => "NOT_STARTS_WITH",
            EndsWith => "ENDS_WITH",
            NotEndsWith => "NOT_ENDS_WITH",
            GreaterThan => "GREATER_THAN",
            GreaterOrEqual => "GREATER_OR_EQUAL",
            LessThan => "LESS_THAN",
            LessOrEqual => "LESS_OR_EQUAL",
            IsEmpty => "IS_EMPTY",
            NotEmpty => "NOT_EMPTY",
            IsBlank => "IS_BLANK",
            NotBlank => "NOT_BLANK",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Unary operators test the tag itself and take no value
    pub fn is_unary(&self) -> bool {
        use ComparisonOperator::*;
        matches!(self, IsEmpty | NotEmpty | IsBlank | NotBlank)
    }

    /// The operator matching exactly the entities this one does not
    pub fn negated(&self) -> Self {
        use ComparisonOperator::*;
        match self {
            Equals => NotEqual,
            NotEqual => Equals,
            Contains => NotContains,
            NotContains => Contains,
            StartsWith => NotStartsWith,
            NotStartsWith => StartsWith,
            EndsWith => NotEndsWith,
            NotEndsWith => EndsWith,
            GreaterThan => LessOrEqual,
            LessOrEqual => GreaterThan,
            LessThan => GreaterOrEqual,
            GreaterOrEqual => LessThan,
            IsEmpty => NotEmpty,
            NotEmpty => IsEmpty,
            IsBlank => NotBlank,
            NotBlank => IsBlank,
        }
    }
}

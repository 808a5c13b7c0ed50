use std::fmt::Display;

use itertools::Itertools;

use crate::common::Value;
use crate::errors::{ErrorKind, LarderError, LarderResult};
use crate::filter::{ScalarOperation, SetOperation};
use crate::larder_config::{LarderConfig, PlaceholderStyle};
use crate::specification::{QueryContext, Specification};

/// A parameterized SQL boolean expression.
///
/// Values never appear in `sql`; each `?` placeholder binds the parameter at
/// the same position in `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    sql: String,
    params: Vec<Value>,
}

impl SqlFragment {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        SqlFragment {
            sql: sql.into(),
            params,
        }
    }

    #[inline]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[inline]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Rewrites every `?` placeholder as `$1`, `$2`, ... in order.
    ///
    /// Placeholders are the only `?` a fragment ever contains, since field
    /// names are validated identifiers and values are always bound.
    pub fn to_numbered(&self) -> SqlFragment {
        let mut sql = String::with_capacity(self.sql.len() + self.params.len());
        let mut index = 0;
        for ch in self.sql.chars() {
            if ch == '?' {
                index += 1;
                sql.push('$');
                sql.push_str(&index.to_string());
            } else {
                sql.push(ch);
            }
        }
        SqlFragment {
            sql,
            params: self.params.clone(),
        }
    }

    fn join(predicates: Vec<SqlFragment>, separator: &str) -> SqlFragment {
        let mut params = Vec::new();
        let mut parts = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            parts.push(predicate.sql);
            params.extend(predicate.params);
        }
        SqlFragment {
            sql: format!("({})", parts.join(separator)),
            params,
        }
    }
}

impl Display for SqlFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Query context rendering specifications as SQL `WHERE` expressions.
///
/// Scalar fields map to columns of the same name. A multi-valued field maps
/// to an element table named after the field, with `owner_id` referencing
/// the owning row and `value` holding one element per row.
///
/// # Examples
///
/// ```rust
/// use larder::filter::field;
/// use larder::specification::Specification;
/// use larder::store::SqlContext;
///
/// # fn main() -> Result<(), larder::errors::LarderError> {
/// let context = SqlContext::new().with_alias("d");
/// let spec: Specification<SqlContext> = field("categories").contains_any(["DAIRY_COLD"])?;
/// let fragment = context.render(Some(&spec))?;
/// assert_eq!(
///     fragment.sql(),
///     "(SELECT COUNT(DISTINCT e.value) FROM categories e WHERE e.owner_id = d.id AND e.value IN (?)) > 0"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqlContext {
    alias: Option<String>,
    id_column: String,
    placeholder_style: PlaceholderStyle,
}

impl Default for SqlContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlContext {
    pub fn new() -> Self {
        SqlContext {
            alias: None,
            id_column: "id".to_string(),
            placeholder_style: PlaceholderStyle::default(),
        }
    }

    /// Creates a context following `config`'s placeholder style.
    pub fn with_config(config: &LarderConfig) -> Self {
        SqlContext {
            placeholder_style: config.get_placeholder_style(),
            ..Self::new()
        }
    }

    /// Qualifies every column with a table alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Sets the owning row's key column used by element tables.
    pub fn with_id_column(mut self, id_column: &str) -> Self {
        self.id_column = id_column.to_string();
        self
    }

    /// Renders a complete `WHERE` expression.
    ///
    /// An absent specification renders as `1=1`. Placeholders follow the
    /// configured style.
    pub fn render(&self, specification: Option<&Specification<SqlContext>>) -> LarderResult<SqlFragment> {
        let fragment = match specification {
            Some(spec) => spec.to_predicate(self)?,
            None => self.constant(true),
        };
        log::debug!("Rendered SQL predicate {} with {} parameters", fragment, fragment.params.len());
        match self.placeholder_style {
            PlaceholderStyle::QuestionMark => Ok(fragment),
            PlaceholderStyle::Numbered => Ok(fragment.to_numbered()),
        }
    }

    /// The qualified column for `field`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldName` unless `field` is a dotted sequence of
    /// identifiers.
    pub fn column(&self, field: &str) -> LarderResult<String> {
        validate_identifier(field)?;
        Ok(self.qualify(field))
    }

    fn qualify(&self, name: &str) -> String {
        match &self.alias {
            Some(alias) => format!("{}.{}", alias, name),
            None => name.to_string(),
        }
    }
}

fn validate_identifier(name: &str) -> LarderResult<()> {
    let valid = !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                _ => false,
            }
        });

    if !valid {
        log::error!("'{}' is not a valid SQL identifier", name);
        return Err(LarderError::new(
            &format!("'{}' is not a valid SQL identifier", name),
            ErrorKind::InvalidFieldName,
        ));
    }
    Ok(())
}

impl QueryContext for SqlContext {
    type Expr = SqlFragment;

    fn conjunction(&self, mut predicates: Vec<SqlFragment>) -> SqlFragment {
        match predicates.len() {
            0 => self.constant(true),
            1 => predicates.remove(0),
            _ => SqlFragment::join(predicates, " AND "),
        }
    }

    fn disjunction(&self, mut predicates: Vec<SqlFragment>) -> SqlFragment {
        match predicates.len() {
            0 => self.constant(false),
            1 => predicates.remove(0),
            _ => SqlFragment::join(predicates, " OR "),
        }
    }

    fn negation(&self, predicate: SqlFragment) -> SqlFragment {
        SqlFragment {
            sql: format!("NOT ({})", predicate.sql),
            params: predicate.params,
        }
    }

    fn constant(&self, value: bool) -> SqlFragment {
        SqlFragment::new(if value { "1=1" } else { "1=0" }, Vec::new())
    }

    fn compare(&self, field: &str, operation: ScalarOperation, value: &Value) -> LarderResult<SqlFragment> {
        let column = self.column(field)?;
        Ok(SqlFragment::new(
            format!("{} {} ?", column, operation.symbol()),
            vec![value.clone()],
        ))
    }

    fn membership(&self, field: &str, operation: SetOperation, values: &[Value]) -> LarderResult<SqlFragment> {
        validate_identifier(field)?;
        let placeholders = values.iter().map(|_| "?").join(", ");
        let count = format!(
            "(SELECT COUNT(DISTINCT e.value) FROM {} e WHERE e.owner_id = {} AND e.value IN ({}))",
            field,
            self.qualify(&self.id_column),
            placeholders
        );
        let sql = match operation {
            SetOperation::ContainsAll => format!("{} = {}", count, values.len()),
            SetOperation::ContainsAny => format!("{} > 0", count),
            SetOperation::ContainsNone => format!("{} = 0", count),
            SetOperation::NotContainsAll => format!("{} < {}", count, values.len()),
        };
        Ok(SqlFragment::new(sql, values.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{field, ScalarFilter};
    use crate::specification::combinator;

    fn render(spec: Specification<SqlContext>) -> SqlFragment {
        spec.to_predicate(&SqlContext::new()).unwrap()
    }

    #[test]
    fn test_comparison() {
        let fragment = render(field("quantity").gt(0).unwrap());
        assert_eq!(fragment.sql(), "quantity > ?");
        assert_eq!(fragment.params(), &[Value::I32(0)]);

        let fragment = render(field("title").eq("Bread").unwrap());
        assert_eq!(fragment.sql(), "title = ?");
        assert_eq!(fragment.params(), &[Value::from("Bread")]);
    }

    #[test]
    fn test_range() {
        let min: Specification<SqlContext> = ScalarFilter::greater_or_equal(5).unwrap().to_specification("quantity");
        let max = ScalarFilter::less_than(50).unwrap().to_specification("quantity");
        let fragment = render(min.and(max));
        assert_eq!(fragment.sql(), "(quantity >= ? AND quantity < ?)");
        assert_eq!(fragment.params(), &[Value::I32(5), Value::I32(50)]);
    }

    #[test]
    fn test_nested_logic_keeps_parameter_order() {
        let spec = combinator::or_of_ands([
            vec![Some(field("a").eq(1).unwrap()), Some(field("b").ne(2).unwrap())],
            vec![Some(field("c").lte(3).unwrap())],
        ])
        .unwrap();
        let fragment = render(combinator::not(Some(spec)).unwrap());
        assert_eq!(fragment.sql(), "NOT (((a = ? AND b != ?) OR c <= ?))");
        assert_eq!(fragment.params(), &[Value::I32(1), Value::I32(2), Value::I32(3)]);
    }

    #[test]
    fn test_membership() {
        let fragment = render(field("categories").contains_all(["A", "B", "A"]).unwrap());
        assert_eq!(
            fragment.sql(),
            "(SELECT COUNT(DISTINCT e.value) FROM categories e WHERE e.owner_id = id AND e.value IN (?, ?)) = 2"
        );
        assert_eq!(fragment.params().len(), 2);

        let fragment = render(field("categories").contains_none(["A"]).unwrap());
        assert!(fragment.sql().ends_with("IN (?)) = 0"));
        let fragment = render(field("categories").not_contains_all(["A", "B"]).unwrap());
        assert!(fragment.sql().ends_with("IN (?, ?)) < 2"));
    }

    #[test]
    fn test_alias_and_id_column() {
        let context = SqlContext::new().with_alias("d").with_id_column("donation_id");
        let fragment = field("categories")
            .contains_any::<SqlContext, _, _>(["X"])
            .unwrap()
            .to_predicate(&context)
            .unwrap();
        assert!(fragment.sql().contains("e.owner_id = d.donation_id"));
        assert_eq!(context.column("quantity").unwrap(), "d.quantity");
    }

    #[test]
    fn test_constants() {
        assert_eq!(render(combinator::always_true()).sql(), "1=1");
        assert_eq!(render(combinator::always_false()).sql(), "1=0");
        assert_eq!(SqlContext::new().render(None).unwrap().sql(), "1=1");
    }

    #[test]
    fn test_invalid_identifiers() {
        for name in ["", "1abc", "quantity; DROP TABLE x", "a..b", "a-b"] {
            let spec: Specification<SqlContext> = field(name).eq(1).unwrap();
            let err = spec.to_predicate(&SqlContext::new()).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidFieldName, "{}", name);
        }
        assert_eq!(SqlContext::new().column("location.city").unwrap(), "location.city");
    }

    #[test]
    fn test_numbered_placeholders() {
        let config = LarderConfig::new().placeholder_style(PlaceholderStyle::Numbered);
        let context = SqlContext::with_config(&config);
        let spec = combinator::and([
            Some(field("quantity").gte(1).unwrap()),
            Some(field("categories").contains_any(["A", "B"]).unwrap()),
        ]);
        let fragment = context.render(spec.as_ref()).unwrap();
        assert_eq!(
            fragment.sql(),
            "(quantity >= $1 AND (SELECT COUNT(DISTINCT e.value) FROM categories e WHERE e.owner_id = id AND e.value IN ($2, $3)) > 0)"
        );
        assert_eq!(fragment.params().len(), 3);
    }

    #[test]
    fn test_empty_logical_lists() {
        let context = SqlContext::new();
        assert_eq!(context.conjunction(vec![]).sql(), "1=1");
        assert_eq!(context.disjunction(vec![]).sql(), "1=0");
        let single = context.conjunction(vec![SqlFragment::new("x = ?", vec![Value::I32(1)])]);
        assert_eq!(single.sql(), "x = ?");
    }
}

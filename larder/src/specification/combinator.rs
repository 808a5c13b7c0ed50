//! Null-safe boolean algebra over optional specifications.
//!
//! Search criteria arrive mostly absent, so every operation here treats an
//! absent specification (`None`) as "no constraint" instead of an error:
//! absent inputs are skipped, and an operation left with nothing to combine
//! returns `None` itself. Combining exactly one usable specification returns
//! that specification unchanged rather than wrapping it.
//!
//! ```rust
//! use larder::filter::field;
//! use larder::specification::{combinator, Specification};
//! use larder::store::SqlContext;
//!
//! # fn main() -> Result<(), larder::errors::LarderError> {
//! let city: Option<&str> = None;
//! let query: Option<Specification<SqlContext>> = combinator::and([
//!     Some(field("quantity").gt(0)?),
//!     city.map(|c| field("city").eq(c)).transpose()?,
//! ]);
//! let fragment = query.unwrap().to_predicate(&SqlContext::new())?;
//! assert_eq!(fragment.sql(), "quantity > ?");
//! # Ok(())
//! # }
//! ```

use super::{
    AndSpecification, ConstantSpecification, OrSpecification, QueryContext, Specification,
    SpecificationBuilder,
};

fn combine<C, I>(
    specifications: I,
    join: fn(Vec<Specification<C>>) -> Specification<C>,
) -> Option<Specification<C>>
where
    C: QueryContext,
    I: IntoIterator<Item = Option<Specification<C>>>,
{
    let mut present: Vec<Specification<C>> = specifications.into_iter().flatten().collect();
    match present.len() {
        0 => {
            log::trace!("No specification supplied, combination is absent");
            None
        }
        1 => present.pop(),
        _ => Some(join(present)),
    }
}

/// Conjunction of every present specification.
///
/// Returns `None` when no specification is present and the specification
/// itself when exactly one is.
pub fn and<C, I>(specifications: I) -> Option<Specification<C>>
where
    C: QueryContext,
    I: IntoIterator<Item = Option<Specification<C>>>,
{
    combine(specifications, |specs| Specification::new(AndSpecification::new(specs)))
}

/// Disjunction of every present specification, with the same absence rules
/// as [and].
pub fn or<C, I>(specifications: I) -> Option<Specification<C>>
where
    C: QueryContext,
    I: IntoIterator<Item = Option<Specification<C>>>,
{
    combine(specifications, |specs| Specification::new(OrSpecification::new(specs)))
}

/// Negation; absent stays absent.
pub fn not<C: QueryContext>(specification: Option<Specification<C>>) -> Option<Specification<C>> {
    specification.map(|spec| spec.not())
}

/// AND across groups, each group OR-combined first.
///
/// Groups that contain no present specification are skipped.
pub fn and_of_ors<C, G, I>(groups: G) -> Option<Specification<C>>
where
    C: QueryContext,
    G: IntoIterator<Item = I>,
    I: IntoIterator<Item = Option<Specification<C>>>,
{
    and(groups.into_iter().map(|group| or(group)))
}

/// OR across groups, each group AND-combined first.
///
/// Groups that contain no present specification are skipped.
pub fn or_of_ands<C, G, I>(groups: G) -> Option<Specification<C>>
where
    C: QueryContext,
    G: IntoIterator<Item = I>,
    I: IntoIterator<Item = Option<Specification<C>>>,
{
    or(groups.into_iter().map(|group| and(group)))
}

/// `and(base, extra)` when `condition` holds, otherwise `base` untouched.
pub fn and_if<C: QueryContext>(
    base: Option<Specification<C>>,
    condition: bool,
    extra: Option<Specification<C>>,
) -> Option<Specification<C>> {
    if condition {
        and([base, extra])
    } else {
        base
    }
}

/// `or(base, extra)` when `condition` holds, otherwise `base` untouched.
pub fn or_if<C: QueryContext>(
    base: Option<Specification<C>>,
    condition: bool,
    extra: Option<Specification<C>>,
) -> Option<Specification<C>> {
    if condition {
        or([base, extra])
    } else {
        base
    }
}

/// A specification every record satisfies.
pub fn always_true<C: QueryContext>() -> Specification<C> {
    Specification::new(ConstantSpecification::new(true))
}

/// A specification no record satisfies.
pub fn always_false<C: QueryContext>() -> Specification<C> {
    Specification::new(ConstantSpecification::new(false))
}

/// True iff the specification is absent.
#[inline]
pub fn is_empty<C: QueryContext>(specification: &Option<Specification<C>>) -> bool {
    specification.is_none()
}

/// The first present specification, or `None` when there is none.
pub fn first_non_null<C, I>(specifications: I) -> Option<Specification<C>>
where
    C: QueryContext,
    I: IntoIterator<Item = Option<Specification<C>>>,
{
    specifications.into_iter().flatten().next()
}

/// Starts an empty [SpecificationBuilder].
pub fn builder<C: QueryContext>() -> SpecificationBuilder<C> {
    SpecificationBuilder::new()
}

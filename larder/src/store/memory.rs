use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor, Value, WriteExecutor};
use crate::errors::{ErrorKind, LarderError, LarderResult};
use crate::filter::{ScalarOperation, SetOperation};
use crate::specification::{QueryContext, Specification};

use super::Document;

/// A compiled predicate over [Document]s.
///
/// Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct DocumentPredicate {
    test: Arc<dyn Fn(&Document) -> bool + Send + Sync>,
}

impl DocumentPredicate {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Document) -> bool + Send + Sync + 'static,
    {
        DocumentPredicate { test: Arc::new(test) }
    }

    #[inline]
    pub fn matches(&self, document: &Document) -> bool {
        (self.test)(document)
    }
}

impl Debug for DocumentPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentPredicate")
    }
}

/// Query context of the in-memory [MemoryStore].
///
/// Specifications compile into [DocumentPredicate] closures. A field that
/// is missing or null never satisfies a comparison. For membership a
/// missing field is an empty collection and a scalar field a collection of
/// one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentContext;

impl DocumentContext {
    pub fn new() -> Self {
        DocumentContext
    }
}

pub(crate) fn validate_field_name(field: &str) -> LarderResult<()> {
    if field.is_empty() {
        log::error!("Field name cannot be empty");
        return Err(LarderError::new(
            "Field name cannot be empty",
            ErrorKind::InvalidFieldName,
        ));
    }
    Ok(())
}

impl QueryContext for DocumentContext {
    type Expr = DocumentPredicate;

    fn conjunction(&self, predicates: Vec<DocumentPredicate>) -> DocumentPredicate {
        DocumentPredicate::new(move |doc| predicates.iter().all(|p| p.matches(doc)))
    }

    fn disjunction(&self, predicates: Vec<DocumentPredicate>) -> DocumentPredicate {
        DocumentPredicate::new(move |doc| predicates.iter().any(|p| p.matches(doc)))
    }

    fn negation(&self, predicate: DocumentPredicate) -> DocumentPredicate {
        DocumentPredicate::new(move |doc| !predicate.matches(doc))
    }

    fn constant(&self, value: bool) -> DocumentPredicate {
        DocumentPredicate::new(move |_| value)
    }

    fn compare(&self, field: &str, operation: ScalarOperation, value: &Value) -> LarderResult<DocumentPredicate> {
        validate_field_name(field)?;
        let field = field.to_string();
        let value = value.clone();
        Ok(DocumentPredicate::new(move |doc| {
            let actual = doc.get(&field);
            if actual.is_null() {
                return false;
            }
            operation.apply(&actual, &value)
        }))
    }

    fn membership(&self, field: &str, operation: SetOperation, values: &[Value]) -> LarderResult<DocumentPredicate> {
        validate_field_name(field)?;
        let field = field.to_string();
        let values = values.to_vec();
        Ok(DocumentPredicate::new(move |doc| {
            let actual = doc.get(&field);
            let elements: HashSet<&Value> = match &actual {
                Value::Null => HashSet::new(),
                Value::Array(items) => items.iter().filter(|v| !v.is_null()).collect(),
                scalar => HashSet::from([scalar]),
            };
            let matched = values.iter().filter(|v| elements.contains(v)).count();
            operation.holds(matched, values.len())
        }))
    }
}

/// An in-memory collection of documents queried with
/// [Specification]s over [DocumentContext].
///
/// Clones share the same documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Atomic<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            documents: atomic(Vec::new()),
        }
    }

    pub fn insert(&self, document: Document) {
        self.documents.write_with(|docs| docs.push(document));
    }

    pub fn insert_all<I: IntoIterator<Item = Document>>(&self, documents: I) {
        self.documents.write_with(|docs| docs.extend(documents));
    }

    pub fn size(&self) -> usize {
        self.documents.read_with(|docs| docs.len())
    }

    /// Returns the documents satisfying `specification` in insertion order;
    /// every document when it is absent.
    pub fn find(&self, specification: Option<&Specification<DocumentContext>>) -> LarderResult<Vec<Document>> {
        let Some(specification) = specification else {
            log::debug!("No specification given, returning all documents");
            return Ok(self.documents.read_with(|docs| docs.clone()));
        };

        let predicate = specification.to_predicate(&DocumentContext)?;
        log::debug!("Finding documents matching {}", specification);
        Ok(self.documents.read_with(|docs| {
            docs.iter()
                .filter(|doc| predicate.matches(doc))
                .cloned()
                .collect()
        }))
    }

    /// Number of documents satisfying `specification`.
    pub fn count(&self, specification: Option<&Specification<DocumentContext>>) -> LarderResult<usize> {
        let Some(specification) = specification else {
            return Ok(self.size());
        };

        let predicate = specification.to_predicate(&DocumentContext)?;
        Ok(self
            .documents
            .read_with(|docs| docs.iter().filter(|doc| predicate.matches(doc)).count()))
    }
}

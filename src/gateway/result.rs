//! Lazy read results.

use std::fmt;
use std::marker::PhantomData;

use super::GatewayError;
use crate::entity::{AttributeMap, Entity};

type RowIter = Box<dyn Iterator<Item = Result<AttributeMap, GatewayError>> + Send>;

/// Rows returned by [`Gateway::read`](super::Gateway::read).
///
/// Rows are pulled from the gateway as the set is iterated; nothing is
/// materialized up front.
pub struct ResultSet {
    rows: RowIter,
}

impl ResultSet {
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Result<AttributeMap, GatewayError>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            rows: Box::new(rows.into_iter()),
        }
    }

    pub fn from_rows(rows: Vec<AttributeMap>) -> Self {
        Self::new(rows.into_iter().map(Ok))
    }

    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    /// Set the hydration target: each row becomes an `E`.
    pub fn as_type<E: Entity>(self) -> Records<E> {
        Records {
            rows: self,
            _entity: PhantomData,
        }
    }
}

impl Iterator for ResultSet {
    type Item = Result<AttributeMap, GatewayError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet").finish_non_exhaustive()
    }
}

/// A [`ResultSet`] hydrating each row into `E` as it is pulled.
pub struct Records<E> {
    rows: ResultSet,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Records<E> {
    /// Drain the remaining rows, stopping at the first error.
    pub fn collect_all(self) -> Result<Vec<E>, GatewayError> {
        self.collect()
    }
}

impl<E: Entity> Iterator for Records<E> {
    type Item = Result<E, GatewayError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows
            .next()
            .map(|row| row.map(|attributes| E::from_attributes(Some(attributes))))
    }
}

impl<E> fmt::Debug for Records<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Records")
            .field("entity", &crate::naming::short_type_name::<E>())
            .finish_non_exhaustive()
    }
}

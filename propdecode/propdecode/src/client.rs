//! Query adapter over an external source enumerator.

use propdecode_core::{BoxError, Record, SourceObject};
use tracing::debug;

use crate::{decoder::Decoder, error::DecodeError};

/// Produces raw objects for a query against the external object model.
///
/// Connection, authentication and the query language are owned by the
/// implementation.
pub trait SourceEnumerator {
    type Object: SourceObject;
    type Objects: IntoIterator<Item = Self::Object>;

    fn enumerate(&self, query: &str) -> Result<Self::Objects, BoxError>;
}

/// Errors produced by [`Client::query`].
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The enumerator failed to run the query.
    #[error("query '{query}' failed: {source}")]
    Enumerate {
        query: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Runs queries through a [`SourceEnumerator`] and decodes the results.
pub struct Client<E> {
    enumerator: E,
    decoder: Decoder,
}

impl<E: SourceEnumerator> Client<E> {
    pub fn new(enumerator: E) -> Self {
        Self::with_decoder(enumerator, Decoder::new())
    }

    pub fn with_decoder(enumerator: E, decoder: Decoder) -> Self {
        Self {
            enumerator,
            decoder,
        }
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut Decoder {
        &mut self.decoder
    }

    pub fn enumerator(&self) -> &E {
        &self.enumerator
    }

    pub fn query<T: Record>(&self, query: &str) -> Result<Vec<T>, QueryError> {
        debug!(query, "running query");
        let objects = self
            .enumerator
            .enumerate(query)
            .map_err(|source| QueryError::Enumerate {
                query: query.to_string(),
                source,
            })?;
        Ok(self.decoder.decode(objects)?)
    }
}

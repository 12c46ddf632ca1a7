//! Codec for the `tags` column.
//!
//! `Tags` is the only type that knows how an expense's tag list travels
//! through PostgreSQL (`TEXT[]`) and JSON. An empty list is written as an
//! empty array, never NULL, and element order is kept exactly. NULL
//! elements written by other clients are skipped on read.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new(tags: Vec<String>) -> Self {
        Self(tags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Tags {
    fn from(tags: [S; N]) -> Self {
        Self(tags.into_iter().map(Into::into).collect())
    }
}

// `null` is accepted and read as an empty list
impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tags = Option::<Vec<String>>::deserialize(deserializer)?;
        Ok(Self(tags.unwrap_or_default()))
    }
}

impl Type<Postgres> for Tags {
    fn type_info() -> PgTypeInfo {
        <Vec<String> as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <Vec<String> as Type<Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Postgres> for Tags {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        <Vec<String> as Encode<'q, Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, Postgres> for Tags {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let tags = <Vec<Option<String>> as Decode<'r, Postgres>>::decode(value)?;
        Ok(Self(tags.into_iter().flatten().collect()))
    }
}

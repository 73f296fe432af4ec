use crate::error::CheckError;
use crate::snapshot::{Items, Snapshot};

/// A named list of strings: allow-lists, canonical sequences, anchor types.
///
/// Either built in, or read from a policy document with an optional
/// built-in fallback used only when the policy field is absent. A policy
/// that is present but empty stays empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vocabulary {
    Fixed(Vec<String>),
    Field {
        items: Items,
        fallback: Option<Vec<String>>,
    },
}

impl Vocabulary {
    pub fn fixed<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Vocabulary::Fixed(items.into_iter().map(Into::into).collect())
    }

    pub fn field(items: Items) -> Self {
        Vocabulary::Field {
            items,
            fallback: None,
        }
    }

    pub fn or<I, S>(self, fallback: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Vocabulary::Field { items, .. } => Vocabulary::Field {
                items,
                fallback: Some(fallback.into_iter().map(Into::into).collect()),
            },
            fixed => fixed,
        }
    }

    pub fn resolve(&self, snapshot: &Snapshot) -> Result<Vec<String>, CheckError> {
        match self {
            Vocabulary::Fixed(items) => Ok(items.clone()),
            Vocabulary::Field { items, fallback } => {
                if snapshot.value(items.field()).is_none() {
                    Ok(fallback.clone().unwrap_or_default())
                } else {
                    snapshot.items(items)
                }
            }
        }
    }
}

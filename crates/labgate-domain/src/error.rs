use thiserror::Error;

/// Why a single check could not complete. The evaluator turns this into a
/// failed result for that check only.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("missing required table `{0}`")]
    MissingTable(String),

    #[error("table `{table}` has no column `{column}`")]
    MissingColumn { table: String, column: String },

    #[error("`{field}` is not numeric: {value}")]
    NotNumeric { field: String, value: String },

    #[error("`{0}` must be a list")]
    NotAList(String),

    #[error("`{0}` must be a string")]
    NotAString(String),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("check id `{id}` is already registered for {chapter}")]
    DuplicateCheck { chapter: String, id: String },

    #[error("unknown check id `{id}` for {chapter}")]
    UnknownCheck { chapter: String, id: String },
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("no values supplied for key `{key}`")]
    InvalidValue { key: String },

    #[error("key `{key}` stores `{expected}` values, got `{found}`")]
    TypeConflict {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

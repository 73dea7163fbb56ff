/// Failure to turn a raw attribute string into a typed configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("attribute `{name}`: `{value}` is not a number")]
    InvalidNumber { name: &'static str, value: String },
    #[error("attribute `{name}`: `{value}` is not a #RRGGBB colour")]
    InvalidColor { name: &'static str, value: String },
}

/// Rule evaluation over layer models.
pub mod evaluator;
/// Issues, severities and aggregate status.
pub mod issue;

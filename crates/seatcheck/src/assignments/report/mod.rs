mod result;
pub mod views;

pub use result::ValidationResult;
pub use views::{BalanceStatus, CheckKind, CheckStatus, CheckView, SessionSummary};

pub mod answers;
pub mod engine;
pub mod error;
pub mod plan;
pub mod policy;
pub mod recommend;
pub mod report;
pub mod risk;

pub use answers::*;
pub use engine::*;
pub use error::AuditError;
pub use plan::*;
pub use policy::*;
pub use recommend::*;
pub use report::*;
pub use risk::*;

pub use biz_audit_copy::Locale;

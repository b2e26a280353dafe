//! Company research derived from a ticker's attribute map and financial
//! statements: profile, KPI table and normalized statements.

pub mod format;
pub mod kpi;
pub mod profile;
pub mod report;
pub mod statement;

pub use format::*;
pub use kpi::*;
pub use profile::*;
pub use report::*;
pub use statement::*;

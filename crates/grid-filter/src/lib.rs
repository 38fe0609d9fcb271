//! Compiles grid filter and sort requests into SQL predicates, joins and
//! ordering expressions for element listings.
//!
//! ```text
//! GridRequest ─► FieldResolver ─► ConditionBuilder ─► JoinPlanner ─► CompiledQuery
//!                      │                ▲
//!                      └─► Operator ────┘
//! ```

pub mod compile;
pub mod condition;
pub mod config;
pub mod error;
pub mod join;
pub mod key;
pub mod operator;
pub mod resolver;
pub mod scope;
pub mod sort;

pub use compile::{CompiledQuery, CompiledSql, GridQueryCompiler, GridRequest};
pub use config::CompilerConfig;
pub use error::CompileError;
pub use key::CompoundKey;

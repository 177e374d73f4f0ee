//! # Weft — a minimal object-relational mapper
//!
//! > Fetch flat, weave in memory.
//!
//! Weft builds parameterized SQL from a fluent clause accumulator, maps
//! rows onto dynamic records, and resolves declared relationships between
//! record sets in application memory — one batched `in (...)` query per
//! relationship, never one query per row.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use weft::prelude::*;
//!
//! let registry = Registry::new()
//!     .model("User", "users")
//!     .entity("UserEntity")
//!     .model("Post", "posts")
//!     .entity("PostEntity");
//!
//! let store = AnyStore::connect("postgres://localhost/entity").await?;
//!
//! let mut query = Query::new();
//! query.select(["id", "name"]).where_("id", ">", 1).limit(10);
//!
//! let mut users = Model::new(&registry, "User", &store)?;
//! let users = users
//!     .execute(query)
//!     .all()
//!     .await?
//!     .make_relations_with(&[RelationSpec::new("Post", RelationKind::HasMany, "posts")])
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod paginate;
pub mod parser;
pub mod query;
pub mod record;
pub mod registry;
pub mod relation;
pub mod statement;
pub mod store;
pub mod value;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{WeftError, WeftResult};
    pub use crate::model::{Fetched, Ids, Model};
    pub use crate::paginate::{PageLink, Paginate};
    pub use crate::parser::{parse_where, WhereExpr};
    pub use crate::query::{Connective, Part, Query};
    pub use crate::record::{Attr, Record};
    pub use crate::registry::{ModelDef, Registry};
    pub use crate::relation::{Attached, RelationKind, RelationSpec};
    pub use crate::store::{AnyStore, BoxFuture, Row, Store};
    pub use crate::value::{Binds, Value};
}

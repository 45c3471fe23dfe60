mod compiler;
mod database;
mod kind;

use std::path::Path;

pub use compiler::{
    compile_kind_catalog, load_kind_catalog, CatalogError, CatalogErrorCode, SourceLocation,
};
pub use database::{Capabilities, Category, KindCatalog, KindDef};
pub use kind::{
    BlockStyle, EnemySpecies, EntityKind, Facing, GateRule, Orientation, RenderLayer, ALL_KINDS,
};

const BUILTIN_KINDS_XML: &str = include_str!("../../assets/kinds.xml");

/// Compiles the kind catalog embedded in the engine crate.
pub fn builtin_kind_catalog() -> Result<KindCatalog, CatalogError> {
    compile_kind_catalog(Path::new("<builtin>/kinds.xml"), BUILTIN_KINDS_XML)
}

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use tracing::debug;

use super::database::{Capabilities, Category, KindCatalog, KindDef};
use super::kind::{EntityKind, Facing, RenderLayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownDefType,
    UnknownField,
    DuplicateField,
    MissingField,
    InvalidValue,
    DuplicateKind,
}

#[derive(Debug, Clone)]
pub struct CatalogError {
    pub code: CatalogErrorCode,
    pub message: String,
    pub source_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.source_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.source_path.display()
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

pub fn load_kind_catalog(path: &Path) -> Result<KindCatalog, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError {
        code: CatalogErrorCode::ReadFile,
        message: format!("failed to read kind catalog: {source}"),
        source_path: path.to_path_buf(),
        location: None,
    })?;
    compile_kind_catalog(path, &raw)
}

pub fn compile_kind_catalog(source_path: &Path, raw: &str) -> Result<KindCatalog, CatalogError> {
    let doc = Document::parse(raw).map_err(|error| CatalogError {
        code: CatalogErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        source_path: source_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "Defs" {
        return Err(error_at_node(
            CatalogErrorCode::InvalidRoot,
            "root element must be <Defs>".to_string(),
            source_path,
            &doc,
            root,
        ));
    }

    let mut defs = Vec::<KindDef>::new();
    let mut seen_kinds = HashSet::<EntityKind>::new();
    for child in root.children().filter(|node| node.is_element()) {
        if child.tag_name().name() != "KindDef" {
            return Err(error_at_node(
                CatalogErrorCode::UnknownDefType,
                format!(
                    "unsupported def type <{}>; only <KindDef> is allowed",
                    child.tag_name().name()
                ),
                source_path,
                &doc,
                child,
            ));
        }
        let def = parse_kind_def(source_path, &doc, child)?;
        if !seen_kinds.insert(def.kind) {
            return Err(error_at_node(
                CatalogErrorCode::DuplicateKind,
                format!("kind '{}' is defined more than once", def.kind),
                source_path,
                &doc,
                child,
            ));
        }
        defs.push(def);
    }

    debug!(
        file = %source_path.display(),
        kind_count = defs.len(),
        "kind_catalog_compiled"
    );
    Ok(KindCatalog::from_kind_defs(defs))
}

fn parse_kind_def(
    source_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<KindDef, CatalogError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut kind: Option<EntityKind> = None;
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut layer: Option<RenderLayer> = None;
    let mut capabilities = Capabilities::default();
    let mut initial_facing: Option<Facing> = None;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                CatalogErrorCode::DuplicateField,
                format!("duplicate field <{}> in <KindDef>", field_name),
                source_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "kind" => {
                let value = required_text(source_path, doc, field, "kind")?;
                let parsed = EntityKind::from_token(&value).ok_or_else(|| {
                    error_at_node(
                        CatalogErrorCode::InvalidValue,
                        format!("unknown kind '{}'", value),
                        source_path,
                        doc,
                        field,
                    )
                })?;
                kind = Some(parsed);
            }
            "widthPx" => width = Some(parse_dimension(source_path, doc, field, "widthPx")?),
            "heightPx" => height = Some(parse_dimension(source_path, doc, field, "heightPx")?),
            "layer" => {
                let value = required_text(source_path, doc, field, "layer")?;
                let parsed = RenderLayer::from_token(&value).ok_or_else(|| {
                    error_at_node(
                        CatalogErrorCode::InvalidValue,
                        format!(
                            "invalid layer '{}'; allowed values: Background, Block, Person, Pipe, Overlay",
                            value
                        ),
                        source_path,
                        doc,
                        field,
                    )
                })?;
                layer = Some(parsed);
            }
            // An empty <categories/> is valid: the kind is drawn but never collides.
            "categories" => {
                let raw = field.text().map(str::trim).unwrap_or_default();
                for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    let category = Category::from_token(token).ok_or_else(|| {
                        error_at_node(
                            CatalogErrorCode::InvalidValue,
                            format!(
                                "invalid category '{}'; allowed values: blocking, collectible, hazard, goal",
                                token
                            ),
                            source_path,
                            doc,
                            field,
                        )
                    })?;
                    capabilities = capabilities.with(category);
                }
            }
            "initialFacing" => {
                let value = required_text(source_path, doc, field, "initialFacing")?;
                let parsed = Facing::from_token(&value).ok_or_else(|| {
                    error_at_node(
                        CatalogErrorCode::InvalidValue,
                        format!("invalid initialFacing '{}'; allowed values: Left, Right", value),
                        source_path,
                        doc,
                        field,
                    )
                })?;
                initial_facing = Some(parsed);
            }
            _ => {
                return Err(error_at_node(
                    CatalogErrorCode::UnknownField,
                    format!("unknown field <{}> in <KindDef>", field_name),
                    source_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let kind = require(kind, "kind", source_path, doc, node)?;
    let source_width_px = require(width, "widthPx", source_path, doc, node)?;
    let source_height_px = require(height, "heightPx", source_path, doc, node)?;
    let layer = require(layer, "layer", source_path, doc, node)?;

    Ok(KindDef {
        kind,
        source_width_px,
        source_height_px,
        layer,
        capabilities,
        initial_facing: initial_facing.unwrap_or(match kind {
            EntityKind::Player => Facing::Right,
            _ => Facing::Left,
        }),
    })
}

fn require<T>(
    value: Option<T>,
    field_name: &str,
    source_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<T, CatalogError> {
    value.ok_or_else(|| {
        error_at_node(
            CatalogErrorCode::MissingField,
            format!("missing required field <{}> in <KindDef>", field_name),
            source_path,
            doc,
            node,
        )
    })
}

fn parse_dimension(
    source_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<u32, CatalogError> {
    let value = required_text(source_path, doc, node, field_name)?;
    match value.parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(error_at_node(
            CatalogErrorCode::InvalidValue,
            format!("{} '{}' must be a positive integer", field_name, value),
            source_path,
            doc,
            node,
        )),
    }
}

fn required_text(
    source_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<String, CatalogError> {
    let value = node.text().map(str::trim).unwrap_or_default().to_string();
    if value.is_empty() {
        return Err(error_at_node(
            CatalogErrorCode::MissingField,
            format!("field <{}> must not be empty", field_name),
            source_path,
            doc,
            node,
        ));
    }
    Ok(value)
}

fn error_at_node(
    code: CatalogErrorCode,
    message: String,
    source_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> CatalogError {
    let pos = doc.text_pos_at(node.range().start);
    CatalogError {
        code,
        message,
        source_path: source_path.to_path_buf(),
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}

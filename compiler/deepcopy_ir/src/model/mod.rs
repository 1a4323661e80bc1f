//! JSON interchange form of the type model.
//!
//! A front-end that understands Go sources serializes what it found into
//! this shape; [`build_universe`] turns it into a [`Universe`]. Field,
//! parameter and underlying types are Go type expressions
//! (see [`crate::texpr`]).
//!
//! ```json
//! { "packages": [ {
//!     "path": "example.com/api",
//!     "comments": ["+k8s:deepcopy-gen=package"],
//!     "types": [ { "name": "Config", "kind": "struct",
//!                  "fields": [ { "name": "Sub", "type": "*Sub" } ] } ]
//! } ] }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::texpr::{parse_type_expr, TypeScope};
use crate::{
    is_identifier, Field, Method, ModelError, PackageId, QualifiedName, Receiver, TypeId, TypeKind,
    Universe,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
    pub packages: Vec<PackageModel>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageModel {
    /// Import path.
    pub path: String,
    /// Package clause name; defaults to the last path segment.
    #[serde(default)]
    pub name: Option<String>,
    /// Source directory, used as the output location.
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeModel>,
}

impl PackageModel {
    pub fn package_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Struct,
    /// A named non-struct type; requires `underlying`.
    Alias,
    Interface,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeModel {
    pub name: String,
    pub kind: DeclKind,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub second_closest_comments: Vec<String>,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldModel>,
    #[serde(default)]
    pub underlying: Option<String>,
    /// Declared methods; for interfaces, the method set.
    #[serde(default)]
    pub methods: Vec<MethodModel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldModel {
    /// May be omitted for embedded fields.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub embedded: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodModel {
    pub name: String,
    #[serde(default = "default_pointer_receiver")]
    pub pointer_receiver: bool,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub results: Vec<String>,
}

fn default_pointer_receiver() -> bool {
    true
}

/// Parse a JSON model and build its universe.
pub fn load_model(json: &str) -> Result<Universe, ModelError> {
    let model: ModelFile = serde_json::from_str(json)?;
    build_universe(&model)
}

/// Build a universe from a deserialized model.
///
/// Declarations are registered for every package before any definition is
/// resolved, so types may reference each other across packages in any order.
pub fn build_universe(model: &ModelFile) -> Result<Universe, ModelError> {
    let mut universe = Universe::new();
    let mut declared: Vec<(PackageId, TypeId, &TypeModel)> = Vec::new();

    for package in &model.packages {
        let pkg = universe.add_package(package.path.clone(), package.package_name());
        if !package.comments.is_empty() {
            universe.set_package_comments(pkg, package.comments.clone());
        }
        if let Some(dir) = &package.dir {
            universe.set_package_dir(pkg, dir.clone());
        }
        for decl in &package.types {
            if !is_identifier(&decl.name) {
                return Err(ModelError::InvalidDeclaration {
                    package: package.path.clone(),
                    name: decl.name.clone(),
                    reason: "type name is not an identifier".to_string(),
                });
            }
            let qualified = QualifiedName::new(package.path.clone(), decl.name.clone());
            if universe.lookup(&qualified).is_some() {
                return Err(ModelError::DuplicateType {
                    package: package.path.clone(),
                    name: decl.name.clone(),
                });
            }
            let id = universe.declare(pkg, decl.name.clone());
            declared.push((pkg, id, decl));
        }
    }

    for &(pkg, id, decl) in &declared {
        define(&mut universe, pkg, id, decl)?;
    }

    debug!(
        packages = model.packages.len(),
        types = declared.len(),
        "model loaded"
    );
    Ok(universe)
}

fn define(
    universe: &mut Universe,
    pkg: PackageId,
    id: TypeId,
    decl: &TypeModel,
) -> Result<(), ModelError> {
    let scope = TypeScope {
        package: pkg,
        type_params: &decl.type_params,
    };
    universe.set_type_params(id, decl.type_params.clone());
    universe.set_comments(
        id,
        decl.comments.clone(),
        decl.second_closest_comments.clone(),
    );

    let kind = match decl.kind {
        DeclKind::Struct => {
            let mut fields = Vec::with_capacity(decl.fields.len());
            for field in &decl.fields {
                let ty = parse_type_expr(universe, scope, &field.ty)?;
                fields.push(build_field(universe, pkg, decl, field, ty)?);
            }
            TypeKind::Struct { fields }
        }
        DeclKind::Alias => {
            let Some(underlying) = &decl.underlying else {
                return Err(ModelError::MissingUnderlying {
                    package: universe.package(pkg).path.clone(),
                    name: decl.name.clone(),
                });
            };
            TypeKind::Alias {
                underlying: parse_type_expr(universe, scope, underlying)?,
            }
        }
        DeclKind::Interface => TypeKind::Interface,
    };
    universe.define(id, kind);

    for method in &decl.methods {
        let params = method
            .params
            .iter()
            .map(|p| parse_type_expr(universe, scope, p))
            .collect::<Result<Vec<_>, _>>()?;
        let results = method
            .results
            .iter()
            .map(|r| parse_type_expr(universe, scope, r))
            .collect::<Result<Vec<_>, _>>()?;
        let receiver = if method.pointer_receiver {
            Receiver::Pointer
        } else {
            Receiver::Value
        };
        universe.add_method(
            id,
            Method::new(method.name.clone(), receiver)
                .with_params(params)
                .with_results(results),
        );
    }
    Ok(())
}

fn build_field(
    universe: &Universe,
    pkg: PackageId,
    decl: &TypeModel,
    field: &FieldModel,
    ty: TypeId,
) -> Result<Field, ModelError> {
    let invalid = |reason: &str| ModelError::InvalidDeclaration {
        package: universe.package(pkg).path.clone(),
        name: format!("{}.{}", decl.name, field.name),
        reason: reason.to_string(),
    };

    if !field.embedded {
        if !is_identifier(&field.name) {
            return Err(invalid("field name is not an identifier"));
        }
        return Ok(Field::new(field.name.clone(), ty));
    }

    let name = if field.name.is_empty() {
        let target = match universe.kind(ty) {
            TypeKind::Pointer { elem } => *elem,
            _ => ty,
        };
        universe
            .name(target)
            .map(|n| n.name.clone())
            .ok_or_else(|| invalid("embedded field must name a type"))?
    } else {
        field.name.clone()
    };
    Ok(Field::new(name, ty).embedded())
}

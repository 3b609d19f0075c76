//! The type engine boundary: `tryType(nodeId) → Ok(TypeDescriptor)
//! | Err(CommonError)`. Type inference itself is out of scope; this module
//! only names the shape of what it returns, since the field-access
//! autocomplete analysis needs to pattern-match on it.

use indexmap::IndexMap;

use pq_core::node::NodeId;

use crate::error::AnalysisError;

/// What the type engine reports for a node.
///
/// `DefinedRecord`/`DefinedTable` are the only variants the field-access
/// analysis cares about; everything else (primitives, `AnyUnion` with no
/// record/table member, unresolved) simply yields no field completions.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    DefinedRecord {
        fields: IndexMap<String, TypeDescriptor>,
        is_open: bool,
    },
    DefinedTable {
        fields: IndexMap<String, TypeDescriptor>,
        is_open: bool,
    },
    AnyUnion {
        members: Vec<TypeDescriptor>,
    },
    Primitive {
        name: &'static str,
        is_nullable: bool,
    },
    Unknown,
}

impl TypeDescriptor {
    /// If the inferred type is a defined record or defined table
    /// (including any-union branches that are defined records/tables),
    /// enumerates its `(fieldName, fieldType)` pairs.
    ///
    /// Returns `None` when no branch of this type is a record/table —
    /// the field-access analysis then reports no candidates rather than
    /// treating it as an error.
    pub fn record_or_table_fields(&self) -> Option<&IndexMap<String, TypeDescriptor>> {
        match self {
            TypeDescriptor::DefinedRecord { fields, .. }
            | TypeDescriptor::DefinedTable { fields, .. } => Some(fields),
            TypeDescriptor::AnyUnion { members } => {
                members.iter().find_map(TypeDescriptor::record_or_table_fields)
            }
            TypeDescriptor::Primitive { .. } | TypeDescriptor::Unknown => None,
        }
    }
}

/// The opaque `typeOf` collaborator: a function `typeOf(nodeId) ->
/// TypeDescriptor | error` treated as a black box by this crate.
pub trait TypeProvider {
    fn try_type(&self, id: NodeId) -> Result<TypeDescriptor, AnalysisError>;
}

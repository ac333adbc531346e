use std::fmt;

use crate::{
    typesystem::{ElementType, RuntimeClass, RuntimeType},
    Error, Result,
};

/// Native calling-convention representation of a runtime type.
///
/// This is what a foreign-function invocation layer consumes to describe argument and
/// field shapes: either a single scalar tag, or the flattened layout of a value type.
/// A [`NativeAlias::Aggregate`] always contains scalars only; value-type fields that
/// are themselves value types are expanded in place during resolution, so the native
/// layer never sees nested lists.
///
/// `Display` renders the conventional FFI tags: `"int32"`, `"pointer"`,
/// `"[int32, double]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeAlias {
    /// No value (return type only)
    Void,
    /// 8bit boolean
    Bool,
    /// signed 8bit integer
    Int8,
    /// unsigned 8bit integer
    UInt8,
    /// signed 16bit integer
    Int16,
    /// unsigned 16bit integer
    UInt16,
    /// signed 32bit integer
    Int32,
    /// unsigned 32bit integer
    UInt32,
    /// signed 64bit integer
    Int64,
    /// unsigned 64bit integer
    UInt64,
    /// 32bit floating-point
    Float,
    /// 64bit floating-point
    Double,
    /// Address-sized value: references, raw pointers, platform integers, strings, arrays
    Pointer,
    /// Flattened value-type layout: the scalar aliases of all non-static fields in
    /// declaration order
    Aggregate(Vec<NativeAlias>),
}

impl NativeAlias {
    /// Whether this alias is a single scalar tag rather than a flattened layout
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, NativeAlias::Aggregate(_))
    }

    /// The flattened field aliases of an aggregate, or `None` for scalars
    #[must_use]
    pub fn as_aggregate(&self) -> Option<&[NativeAlias]> {
        match self {
            NativeAlias::Aggregate(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for NativeAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeAlias::Void => write!(f, "void"),
            NativeAlias::Bool => write!(f, "bool"),
            NativeAlias::Int8 => write!(f, "int8"),
            NativeAlias::UInt8 => write!(f, "uint8"),
            NativeAlias::Int16 => write!(f, "int16"),
            NativeAlias::UInt16 => write!(f, "uint16"),
            NativeAlias::Int32 => write!(f, "int32"),
            NativeAlias::UInt32 => write!(f, "uint32"),
            NativeAlias::Int64 => write!(f, "int64"),
            NativeAlias::UInt64 => write!(f, "uint64"),
            NativeAlias::Float => write!(f, "float"),
            NativeAlias::Double => write!(f, "double"),
            NativeAlias::Pointer => write!(f, "pointer"),
            NativeAlias::Aggregate(fields) => {
                write!(f, "[")?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Resolves the native alias of a type.
///
/// By-reference parameters are always a native pointer, whatever the underlying kind.
/// Otherwise the storage kind dispatches: primitives map to their fixed-width scalar,
/// address-shaped kinds map to `Pointer`, value types flatten their fields, and
/// reference-shaped kinds flatten too when the owning class turns out to be a value
/// type (boxed or generic value types). Anything else degrades to `Pointer` with a
/// warning instead of aborting resolution.
pub(crate) fn resolve(ty: &RuntimeType, depth: usize) -> Result<NativeAlias> {
    let limit = ty.runtime().get()?.config().max_value_type_depth;
    if depth > limit {
        return Err(Error::RecursionLimit(limit));
    }

    if ty.is_by_reference()? {
        return Ok(NativeAlias::Pointer);
    }

    match ty.element()? {
        ElementType::Void => Ok(NativeAlias::Void),
        ElementType::Boolean => Ok(NativeAlias::Bool),
        ElementType::Char => Ok(NativeAlias::UInt8),
        ElementType::I1 => Ok(NativeAlias::Int8),
        ElementType::U1 => Ok(NativeAlias::UInt8),
        ElementType::I2 => Ok(NativeAlias::Int16),
        ElementType::U2 => Ok(NativeAlias::UInt16),
        ElementType::I4 => Ok(NativeAlias::Int32),
        ElementType::U4 => Ok(NativeAlias::UInt32),
        ElementType::I8 => Ok(NativeAlias::Int64),
        ElementType::U8 => Ok(NativeAlias::UInt64),
        ElementType::R4 => Ok(NativeAlias::Float),
        ElementType::R8 => Ok(NativeAlias::Double),
        ElementType::ValueType => flatten_value_type(ty.class()?, depth),
        ElementType::I
        | ElementType::U
        | ElementType::Ptr
        | ElementType::String
        | ElementType::SzArray
        | ElementType::Array => Ok(NativeAlias::Pointer),
        ElementType::Class | ElementType::Object | ElementType::GenericInst => {
            let class = ty.class()?;
            if class.is_value_type()? {
                flatten_value_type(class, depth)
            } else {
                Ok(NativeAlias::Pointer)
            }
        }
        element => {
            log::warn!(
                "native alias: defaulting {}, \"{}\" to pointer",
                ty.name()?,
                element
            );
            Ok(NativeAlias::Pointer)
        }
    }
}

/// Flattens the non-static fields of a value type, in declaration order, into a flat
/// list of scalar aliases. Fields that are themselves value types are spliced inline.
fn flatten_value_type(class: &RuntimeClass, depth: usize) -> Result<NativeAlias> {
    let mut flat = Vec::new();

    for (_, field) in class.fields()?.iter() {
        if field.is_static()? {
            continue;
        }

        // Recurses directly instead of going through the field type's cached
        // `native_alias`: the cache slot must not be re-entered while a cyclic
        // graph is still resolving, and the depth guard needs to travel along.
        let field_type = field.ty()?;
        match resolve(&field_type, depth + 1)? {
            NativeAlias::Aggregate(inner) => flat.extend(inner),
            scalar => flat.push(scalar),
        }
    }

    Ok(NativeAlias::Aggregate(flat))
}

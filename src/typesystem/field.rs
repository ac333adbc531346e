use std::{fmt, sync::Arc};

use bitflags::bitflags;
use once_cell::sync::OnceCell;

use crate::{
    runtime::{FieldHandle, RuntimeRef, TypeHandle},
    typesystem::RuntimeTypeRc,
    Result,
};

/// A reference-counted pointer to a [`RuntimeField`]
pub type RuntimeFieldRc = Arc<RuntimeField>;

/// A vector that holds a list of [`RuntimeField`] of one class, in declaration order
pub type FieldList = Arc<boxcar::Vec<RuntimeFieldRc>>;

/// Bitmask for access-level extraction out of raw field flags
pub const FIELD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    /// `FieldAttributes` bitmask of a field, ECMA-335 II.23.1.5
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldAttributes: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const INIT_ONLY = 0x0020;
        /// Value is compile time constant
        const LITERAL = 0x0040;
        /// Reserved (field should not be serialized when type is remoted)
        const NOT_SERIALIZED = 0x0080;
        /// Field has RVA
        const HAS_FIELD_RVA = 0x0100;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// CLI provides 'special' behavior, depending upon the name of the field
        const RTSPECIAL_NAME = 0x0400;
        /// Field has marshalling information
        const HAS_FIELD_MARSHAL = 0x1000;
        /// Implementation is forwarded through `PInvoke`
        const PINVOKE_IMPL = 0x2000;
        /// Field has default
        const HAS_DEFAULT = 0x8000;
    }
}

impl FieldAttributes {
    /// Extract the known attribute bits from a raw flags value
    #[must_use]
    pub fn from_raw(flags: u32) -> Self {
        FieldAttributes::from_bits_truncate(flags)
    }
}

/// Represents a `FieldInfo` of the target process.
///
/// A borrowed view over one field of a [`crate::typesystem::RuntimeClass`], with the
/// same lazily-computed, memoized property contract as the other descriptors.
pub struct RuntimeField {
    runtime: RuntimeRef,
    handle: FieldHandle,
    name: OnceCell<String>,
    flags: OnceCell<FieldAttributes>,
    offset: OnceCell<u32>,
    // Handle only: holding the type Arc here would close a strong cycle through
    // self-typed static fields (type -> class -> field -> type).
    ty: OnceCell<TypeHandle>,
}

impl RuntimeField {
    pub(crate) fn new(runtime: RuntimeRef, handle: FieldHandle) -> Self {
        RuntimeField {
            runtime,
            handle,
            name: OnceCell::new(),
            flags: OnceCell::new(),
            offset: OnceCell::new(),
            ty: OnceCell::new(),
        }
    }

    /// The foreign handle identifying this field
    #[must_use]
    pub fn handle(&self) -> FieldHandle {
        self.handle
    }

    /// Gets the name of this field
    pub fn name(&self) -> Result<&str> {
        self.name
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let address = runtime.api().field_get_name(self.handle)?;
                runtime.api().read_utf8_str(address)
            })
            .map(String::as_str)
    }

    /// Gets the attribute bitmask of this field
    pub fn flags(&self) -> Result<FieldAttributes> {
        self.flags
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let raw = runtime.api().field_get_flags(self.handle)?;
                Ok(FieldAttributes::from_raw(raw))
            })
            .map(|flags| *flags)
    }

    /// Determines whether this field is static (excluded from value-type flattening)
    pub fn is_static(&self) -> Result<bool> {
        Ok(self.flags()?.contains(FieldAttributes::STATIC))
    }

    /// Gets the byte offset of this field within its declaring class
    pub fn offset(&self) -> Result<u32> {
        self.offset
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                runtime.api().field_get_offset(self.handle)
            })
            .map(|offset| *offset)
    }

    /// Gets the type of this field.
    ///
    /// The descriptor comes out of the runtime's interning registry, so repeated calls
    /// return the same instance; only the underlying handle query is memoized here.
    ///
    /// # Errors
    /// [`crate::Error::NullHandle`] if the target reports no type for this field,
    /// which only happens on a broken target.
    pub fn ty(&self) -> Result<RuntimeTypeRc> {
        let handle = self
            .ty
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let address = runtime.api().field_get_type(self.handle)?;
                TypeHandle::new(address)
            })
            .map(|handle| *handle)?;

        Ok(self.runtime.get()?.type_from_handle(handle))
    }
}

impl PartialEq for RuntimeField {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for RuntimeField {}

impl fmt::Debug for RuntimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeField")
            .field("handle", &self.handle)
            .field("name", &self.name.get())
            .finish_non_exhaustive()
    }
}

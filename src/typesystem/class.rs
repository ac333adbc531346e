use std::{fmt, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
    runtime::{ClassHandle, FieldHandle, GenericClassHandle, RuntimeRef},
    typesystem::{FieldList, RuntimeField},
    Result,
};

/// A reference-counted pointer to a [`RuntimeClass`]
pub type RuntimeClassRc = Arc<RuntimeClass>;

/// A reference-counted pointer to a [`GenericClass`]
pub type GenericClassRc = Arc<GenericClass>;

/// Represents an `Il2CppClass` of the target process.
///
/// Like [`crate::typesystem::RuntimeType`], a borrowed view with lazily-computed,
/// memoized properties. Obtained from [`crate::runtime::Runtime::class_at`] or from a
/// type's [`crate::typesystem::RuntimeType::class`]; interned per handle.
pub struct RuntimeClass {
    runtime: RuntimeRef,
    handle: ClassHandle,
    name: OnceCell<String>,
    namespace: OnceCell<String>,
    value_type: OnceCell<bool>,
    fields: OnceCell<FieldList>,
}

impl RuntimeClass {
    pub(crate) fn new(runtime: RuntimeRef, handle: ClassHandle) -> Self {
        RuntimeClass {
            runtime,
            handle,
            name: OnceCell::new(),
            namespace: OnceCell::new(),
            value_type: OnceCell::new(),
            fields: OnceCell::new(),
        }
    }

    /// The foreign handle identifying this class
    #[must_use]
    pub fn handle(&self) -> ClassHandle {
        self.handle
    }

    /// Gets the name of this class, e.g. `Vector3`
    pub fn name(&self) -> Result<&str> {
        self.name
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let address = runtime.api().class_get_name(self.handle)?;
                runtime.api().read_utf8_str(address)
            })
            .map(String::as_str)
    }

    /// Gets the namespace of this class, e.g. `UnityEngine`
    pub fn namespace(&self) -> Result<&str> {
        self.namespace
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let address = runtime.api().class_get_namespace(self.handle)?;
                runtime.api().read_utf8_str(address)
            })
            .map(String::as_str)
    }

    /// Determines whether instances of this class are value types.
    ///
    /// Value types are passed by value across calls and get flattened by
    /// [`crate::typesystem::RuntimeType::native_alias`]; everything else is passed as
    /// a pointer.
    pub fn is_value_type(&self) -> Result<bool> {
        self.value_type
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                runtime.api().class_is_value_type(self.handle)
            })
            .map(|value_type| *value_type)
    }

    /// Gets the fields of this class, static fields included, in declaration order.
    ///
    /// # Errors
    /// [`crate::Error::NullHandle`] if the enumeration yields a null entry, which only
    /// happens on a broken target.
    pub fn fields(&self) -> Result<&FieldList> {
        self.fields.get_or_try_init(|| {
            let runtime = self.runtime.get()?;
            let addresses = runtime.api().class_get_fields(self.handle)?;

            let fields = Arc::new(boxcar::Vec::with_capacity(addresses.len()));
            for address in addresses {
                let handle = FieldHandle::new(address)?;
                fields.push(Arc::new(RuntimeField::new(self.runtime.clone(), handle)));
            }

            Ok(fields)
        })
    }
}

impl PartialEq for RuntimeClass {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for RuntimeClass {}

impl fmt::Debug for RuntimeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeClass")
            .field("handle", &self.handle)
            .field("name", &self.name.get())
            .finish_non_exhaustive()
    }
}

/// Represents an `Il2CppGenericClass`, the projection of a generic instantiation.
///
/// Mostly an opaque token for callers that need to correlate instantiations; the one
/// useful query is the inflated class behind it, which exists only once the runtime
/// has materialized the instantiation.
pub struct GenericClass {
    runtime: RuntimeRef,
    handle: GenericClassHandle,
    cached_class: OnceCell<Option<RuntimeClassRc>>,
}

impl GenericClass {
    pub(crate) fn new(runtime: RuntimeRef, handle: GenericClassHandle) -> Self {
        GenericClass {
            runtime,
            handle,
            cached_class: OnceCell::new(),
        }
    }

    /// The foreign handle identifying this generic-class projection
    #[must_use]
    pub fn handle(&self) -> GenericClassHandle {
        self.handle
    }

    /// Gets the inflated class of this instantiation, or `None` while the runtime has
    /// not materialized it yet
    pub fn cached_class(&self) -> Result<Option<&RuntimeClassRc>> {
        self.cached_class
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let address = runtime.api().generic_class_get_cached_class(self.handle)?;
                if address == 0 {
                    Ok(None)
                } else {
                    runtime.class_at(address).map(Some)
                }
            })
            .map(Option::as_ref)
    }
}

impl fmt::Debug for GenericClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericClass")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use once_cell::sync::OnceCell;

use crate::{
    runtime::{GenericClassHandle, ObjectHandle, RuntimeRef, TypeHandle},
    typesystem::{
        native, ElementType, GenericClass, GenericClassRc, NativeAlias, RuntimeClassRc,
        RuntimeObject, RuntimeObjectRc,
    },
    Result,
};

/// A reference-counted pointer to a [`RuntimeType`]
pub type RuntimeTypeRc = Arc<RuntimeType>;

/// Represents an `Il2CppType` of the target process.
///
/// A `RuntimeType` is a borrowed view over foreign memory: it holds a non-null
/// [`TypeHandle`] and queries everything else through the runtime's
/// [`crate::runtime::RuntimeApi`] on first access. Every property is memoized; once a
/// value has been computed, every later read returns the identical cached value and the
/// underlying API is not consulted again. Types are process-lifetime metadata in the
/// runtimes this crate targets, so cached values never go stale.
///
/// Descriptors are obtained from [`crate::runtime::Runtime::type_at`], which interns
/// them per handle; equality and hashing are by handle.
pub struct RuntimeType {
    runtime: RuntimeRef,
    handle: TypeHandle,
    name: OnceCell<String>,
    element: OnceCell<ElementType>,
    by_ref: OnceCell<bool>,
    class: OnceCell<RuntimeClassRc>,
    data_type: OnceCell<Option<RuntimeTypeRc>>,
    generic_class: OnceCell<GenericClassRc>,
    object: OnceCell<RuntimeObjectRc>,
    alias: OnceCell<NativeAlias>,
}

impl RuntimeType {
    pub(crate) fn new(runtime: RuntimeRef, handle: TypeHandle) -> Self {
        RuntimeType {
            runtime,
            handle,
            name: OnceCell::new(),
            element: OnceCell::new(),
            by_ref: OnceCell::new(),
            class: OnceCell::new(),
            data_type: OnceCell::new(),
            generic_class: OnceCell::new(),
            object: OnceCell::new(),
            alias: OnceCell::new(),
        }
    }

    /// The foreign handle identifying this type
    #[must_use]
    pub fn handle(&self) -> TypeHandle {
        self.handle
    }

    pub(crate) fn runtime(&self) -> &RuntimeRef {
        &self.runtime
    }

    /// Gets the full name of this type, e.g. `System.Collections.Generic.List<System.Int32>`.
    ///
    /// # Errors
    /// [`crate::Error::Malformed`] if the name bytes are not valid UTF-8.
    pub fn name(&self) -> Result<&str> {
        self.name
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let address = runtime.api().type_get_name(self.handle)?;
                runtime.api().read_utf8_str(address)
            })
            .map(String::as_str)
    }

    /// Gets the storage kind of this type
    pub fn element(&self) -> Result<ElementType> {
        self.element
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let raw = runtime.api().type_get_type_enum(self.handle)?;
                Ok(ElementType::from_raw(raw))
            })
            .map(|element| *element)
    }

    /// Determines whether this type is passed by reference
    pub fn is_by_reference(&self) -> Result<bool> {
        self.by_ref
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                runtime.api().type_is_by_reference(self.handle)
            })
            .map(|by_ref| *by_ref)
    }

    /// Gets the class this type belongs to.
    ///
    /// # Errors
    /// [`crate::Error::NullHandle`] if the target reports no class for this type,
    /// which only happens on a broken target.
    pub fn class(&self) -> Result<&RuntimeClassRc> {
        self.class.get_or_try_init(|| {
            let runtime = self.runtime.get()?;
            let address = runtime.api().class_from_type(self.handle)?;
            runtime.class_at(address)
        })
    }

    /// Gets the encompassed type of this array type, or `None` for non-array types.
    ///
    /// Absence is a normal outcome here, not an error: the target reports null for
    /// every type that has no element type.
    pub fn data_type(&self) -> Result<Option<&RuntimeTypeRc>> {
        self.data_type
            .get_or_try_init(|| {
                let runtime = self.runtime.get()?;
                let address = runtime.api().type_get_data_type(self.handle)?;
                if address == 0 {
                    Ok(None)
                } else {
                    runtime.type_at(address).map(Some)
                }
            })
            .map(Option::as_ref)
    }

    /// Gets the generic-class projection of this generic instance type
    pub fn generic_class(&self) -> Result<&GenericClassRc> {
        self.generic_class.get_or_try_init(|| {
            let runtime = self.runtime.get()?;
            let address = runtime.api().type_get_generic_class(self.handle)?;
            let handle = GenericClassHandle::new(address)?;
            Ok(Arc::new(GenericClass::new(self.runtime.clone(), handle)))
        })
    }

    /// Gets the reflection object encompassing this type
    pub fn object(&self) -> Result<&RuntimeObjectRc> {
        self.object.get_or_try_init(|| {
            let runtime = self.runtime.get()?;
            let address = runtime.api().type_get_object(self.handle)?;
            let handle = ObjectHandle::new(address)?;
            Ok(Arc::new(RuntimeObject::new(self.runtime.clone(), handle)))
        })
    }

    /// Gets the native calling-convention representation of this type.
    ///
    /// Resolved on first access and cached; see [`NativeAlias`] for the resolution
    /// rules and [`crate::runtime::RuntimeConfig::max_value_type_depth`] for the
    /// flattening bound.
    pub fn native_alias(&self) -> Result<&NativeAlias> {
        self.alias.get_or_try_init(|| native::resolve(self, 0))
    }
}

impl PartialEq for RuntimeType {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for RuntimeType {}

impl Hash for RuntimeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeType")
            .field("handle", &self.handle)
            .field("name", &self.name.get())
            .field("element", &self.element.get())
            .finish_non_exhaustive()
    }
}

//! Connection to the instrumented target process.
//!
//! This module is the composition root of the crate: [`Runtime`] owns the
//! [`RuntimeApi`] bridge into the target, interns type and class descriptors so that
//! one foreign handle maps to one descriptor instance, and caches process-wide layout
//! constants. Descriptors hold a [`RuntimeRef`] (a weak reference) back to the runtime,
//! which breaks the ownership cycle between the registries and the entities they store.
//!
//! # Key Types
//! - [`Runtime`] - the composition root, constructed as [`RuntimeRc`]
//! - [`RuntimeApi`] - the trait an instrumentation bridge implements
//! - [`RuntimeConfig`] - resolution limits
//! - [`TypeHandle`], [`ClassHandle`], [`FieldHandle`], [`ObjectHandle`],
//!   [`GenericClassHandle`] - opaque non-null foreign references

mod api;
mod handle;

pub use api::RuntimeApi;
pub use handle::{ClassHandle, FieldHandle, GenericClassHandle, ObjectHandle, TypeHandle};

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use crate::{
    typesystem::{RuntimeClass, RuntimeClassRc, RuntimeType, RuntimeTypeRc},
    Error, Result,
};

/// A reference-counted pointer to a [`Runtime`]
pub type RuntimeRc = Arc<Runtime>;

/// Limits applied while resolving descriptors.
///
/// Passed to [`Runtime::with_config`]; [`Runtime::new`] uses [`RuntimeConfig::default`].
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Maximum nesting depth of value types during native-alias flattening.
    ///
    /// Valid metadata cannot nest value types cyclically, so this bound only exists to
    /// turn a corrupt target into [`Error::RecursionLimit`] instead of a stack
    /// overflow. The default of 32 is far above anything real code declares.
    pub max_value_type_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            max_value_type_depth: 32,
        }
    }
}

/// A handle on the type system of one instrumented IL2CPP process.
///
/// All descriptors ([`RuntimeType`], [`RuntimeClass`], ...) are created through this
/// struct and query the target through the [`RuntimeApi`] it owns. Types and classes
/// are interned per handle: asking twice for the same foreign address returns the same
/// `Arc`, so every lazily-computed property is computed at most once process-wide.
///
/// # Examples
///
/// ```rust,no_run
/// use il2scope::runtime::Runtime;
/// # fn bridge() -> Box<dyn il2scope::runtime::RuntimeApi> { unimplemented!() }
///
/// let runtime = Runtime::new(bridge());
/// let ty = runtime.type_at(0x7f32_1440_08a0)?;
/// println!("{} -> {}", ty.name()?, ty.native_alias()?);
/// # Ok::<(), il2scope::Error>(())
/// ```
pub struct Runtime {
    api: Box<dyn RuntimeApi>,
    config: RuntimeConfig,
    /// Byte offset of the storage-kind bitfield inside `Il2CppType`, fetched once
    type_enum_offset: OnceCell<u32>,
    types: DashMap<TypeHandle, RuntimeTypeRc>,
    classes: DashMap<ClassHandle, RuntimeClassRc>,
}

impl Runtime {
    /// Creates a runtime over the given bridge with the default [`RuntimeConfig`]
    pub fn new(api: Box<dyn RuntimeApi>) -> RuntimeRc {
        Runtime::with_config(api, RuntimeConfig::default())
    }

    /// Creates a runtime over the given bridge with an explicit [`RuntimeConfig`]
    pub fn with_config(api: Box<dyn RuntimeApi>, config: RuntimeConfig) -> RuntimeRc {
        Arc::new(Runtime {
            api,
            config,
            type_enum_offset: OnceCell::new(),
            types: DashMap::new(),
            classes: DashMap::new(),
        })
    }

    /// The raw introspection bridge this runtime queries through
    pub fn api(&self) -> &dyn RuntimeApi {
        self.api.as_ref()
    }

    /// The limits applied while resolving descriptors
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Byte offset of the storage-kind bitfield inside the `Il2CppType` struct.
    ///
    /// Fetched from the target on first access and cached for the lifetime of the
    /// runtime; the layout of `Il2CppType` cannot change while the process runs.
    ///
    /// # Errors
    /// Propagates the [`RuntimeApi`] failure if the constant cannot be fetched.
    pub fn type_enum_offset(&self) -> Result<u32> {
        self.type_enum_offset
            .get_or_try_init(|| self.api.type_offset_of_type_enum())
            .map(|offset| *offset)
    }

    /// Returns the [`RuntimeType`] descriptor for a raw `Il2CppType` address.
    ///
    /// The descriptor is interned: the same address always yields the same `Arc`.
    ///
    /// # Errors
    /// [`Error::NullHandle`] if `address` is zero.
    pub fn type_at(self: &Arc<Self>, address: u64) -> Result<RuntimeTypeRc> {
        Ok(self.type_from_handle(TypeHandle::new(address)?))
    }

    /// Returns the [`RuntimeClass`] descriptor for a raw `Il2CppClass` address.
    ///
    /// The descriptor is interned: the same address always yields the same `Arc`.
    ///
    /// # Errors
    /// [`Error::NullHandle`] if `address` is zero.
    pub fn class_at(self: &Arc<Self>, address: u64) -> Result<RuntimeClassRc> {
        Ok(self.class_from_handle(ClassHandle::new(address)?))
    }

    pub(crate) fn type_from_handle(self: &Arc<Self>, handle: TypeHandle) -> RuntimeTypeRc {
        self.types
            .entry(handle)
            .or_insert_with(|| Arc::new(RuntimeType::new(RuntimeRef::new(self), handle)))
            .clone()
    }

    pub(crate) fn class_from_handle(self: &Arc<Self>, handle: ClassHandle) -> RuntimeClassRc {
        self.classes
            .entry(handle)
            .or_insert_with(|| Arc::new(RuntimeClass::new(RuntimeRef::new(self), handle)))
            .clone()
    }
}

/// A weak reference from a descriptor back to its [`Runtime`].
///
/// The runtime interns descriptors in its registries, so a strong reference in the
/// other direction would leak both. Upgrading fails with [`Error::RuntimeDetached`]
/// once the runtime has been dropped.
#[derive(Clone)]
pub struct RuntimeRef {
    weak_ref: Weak<Runtime>,
}

impl RuntimeRef {
    pub(crate) fn new(runtime: &RuntimeRc) -> Self {
        RuntimeRef {
            weak_ref: Arc::downgrade(runtime),
        }
    }

    /// Gets a strong reference to the runtime
    ///
    /// # Errors
    /// [`Error::RuntimeDetached`] if the runtime has been dropped.
    pub fn get(&self) -> Result<RuntimeRc> {
        self.weak_ref.upgrade().ok_or(Error::RuntimeDetached)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::test::FakeProcess;

    #[test]
    fn test_type_enum_offset_fetched_once() {
        let mut process = FakeProcess::new();
        process.type_enum_offset = 0x48;
        let (runtime, counters) = process.build();

        assert_eq!(runtime.type_enum_offset().unwrap(), 0x48);
        assert_eq!(runtime.type_enum_offset().unwrap(), 0x48);
        assert_eq!(
            counters.type_offset_of_type_enum.load(Ordering::Relaxed),
            1
        );
    }

    #[test]
    fn test_type_interning_returns_same_instance() {
        let mut process = FakeProcess::new();
        let address = process.add_primitive("System.Int32", crate::typesystem::ELEMENT_TYPE::I4);
        let (runtime, _) = process.build();

        let first = runtime.type_at(address).unwrap();
        let second = runtime.type_at(address).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_type_at_rejects_null() {
        let (runtime, _) = FakeProcess::new().build();
        assert!(matches!(
            runtime.type_at(0),
            Err(Error::NullHandle("TypeHandle"))
        ));
    }

    #[test]
    fn test_runtime_ref_detach() {
        let mut process = FakeProcess::new();
        let address = process.add_primitive("System.Int32", crate::typesystem::ELEMENT_TYPE::I4);
        let (runtime, _) = process.build();

        let ty = runtime.type_at(address).unwrap();
        drop(runtime);

        assert!(matches!(ty.name(), Err(Error::RuntimeDetached)));
    }
}

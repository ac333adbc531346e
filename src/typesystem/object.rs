use std::{fmt, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
    runtime::{ObjectHandle, RuntimeRef},
    typesystem::RuntimeClassRc,
    Result,
};

/// A reference-counted pointer to a [`RuntimeObject`]
pub type RuntimeObjectRc = Arc<RuntimeObject>;

/// Represents an `Il2CppObject` of the target process.
///
/// Obtained from [`crate::typesystem::RuntimeType::object`] (the reflection object of
/// a type). A borrowed view; the object itself lives in the managed heap of the
/// target, this descriptor never keeps it alive.
pub struct RuntimeObject {
    runtime: RuntimeRef,
    handle: ObjectHandle,
    class: OnceCell<RuntimeClassRc>,
}

impl RuntimeObject {
    pub(crate) fn new(runtime: RuntimeRef, handle: ObjectHandle) -> Self {
        RuntimeObject {
            runtime,
            handle,
            class: OnceCell::new(),
        }
    }

    /// The foreign handle identifying this object
    #[must_use]
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Gets the class of this object
    pub fn class(&self) -> Result<&RuntimeClassRc> {
        self.class.get_or_try_init(|| {
            let runtime = self.runtime.get()?;
            let address = runtime.api().object_get_class(self.handle)?;
            runtime.class_at(address)
        })
    }
}

impl PartialEq for RuntimeObject {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for RuntimeObject {}

impl fmt::Debug for RuntimeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeObject")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

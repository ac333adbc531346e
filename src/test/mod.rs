//! Shared functionality which is used in unit tests: an in-memory fake of an
//! instrumented process and its introspection bridge, plus invocation counters for
//! asserting the compute-once contract of the descriptor layer.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    runtime::{
        ClassHandle, FieldHandle, GenericClassHandle, ObjectHandle, Runtime, RuntimeApi,
        RuntimeRc, TypeHandle,
    },
    Error, Result,
};

/// Public access bits of a field, used as the baseline for fake field flags
const FIELD_PUBLIC: u32 = 0x0006;
/// Static bit of a field
const FIELD_STATIC: u32 = 0x0010;

/// Invocation counters, one per bridge primitive the tests assert on
#[derive(Default)]
pub struct ApiCounters {
    pub class_from_type: AtomicUsize,
    pub type_get_data_type: AtomicUsize,
    pub type_is_by_reference: AtomicUsize,
    pub type_get_name: AtomicUsize,
    pub type_get_type_enum: AtomicUsize,
    pub type_offset_of_type_enum: AtomicUsize,
    pub class_get_fields: AtomicUsize,
    pub class_is_value_type: AtomicUsize,
    pub read_utf8_str: AtomicUsize,
}

#[derive(Clone, Default)]
struct FakeType {
    name_ptr: u64,
    element: u32,
    by_ref: bool,
    class: u64,
    data_type: u64,
    generic_class: u64,
    object: u64,
}

#[derive(Clone, Default)]
struct FakeClass {
    name_ptr: u64,
    namespace_ptr: u64,
    value_type: bool,
    fields: Vec<u64>,
}

#[derive(Clone, Default)]
struct FakeField {
    name_ptr: u64,
    flags: u32,
    offset: u32,
    ty: u64,
}

#[derive(Clone, Default)]
struct FakeObject {
    class: u64,
}

#[derive(Clone, Default)]
struct FakeGenericClass {
    cached_class: u64,
}

/// Builder for an in-memory fake process graph.
///
/// Helpers hand out raw foreign addresses the way a real target would; wire a graph
/// together, then [`FakeProcess::build`] it into a [`Runtime`] plus the counters of
/// the underlying fake bridge.
pub struct FakeProcess {
    next_address: u64,
    /// Value returned for the `Il2CppType` storage-kind byte offset
    pub type_enum_offset: u32,
    types: HashMap<u64, FakeType>,
    classes: HashMap<u64, FakeClass>,
    fields: HashMap<u64, FakeField>,
    objects: HashMap<u64, FakeObject>,
    generic_classes: HashMap<u64, FakeGenericClass>,
    strings: HashMap<u64, Vec<u8>>,
    // type address -> class address, for helpers that wire entities together
    type_class: HashMap<u64, u64>,
}

impl FakeProcess {
    pub fn new() -> Self {
        FakeProcess {
            next_address: 0x1000,
            type_enum_offset: 0x30,
            types: HashMap::new(),
            classes: HashMap::new(),
            fields: HashMap::new(),
            objects: HashMap::new(),
            generic_classes: HashMap::new(),
            strings: HashMap::new(),
            type_class: HashMap::new(),
        }
    }

    fn alloc(&mut self) -> u64 {
        let address = self.next_address;
        self.next_address += 0x10;
        address
    }

    fn intern_str(&mut self, value: &str) -> u64 {
        let address = self.alloc();
        self.strings.insert(address, value.as_bytes().to_vec());
        address
    }

    /// Adds a type with no class behind it (primitives, pointer-shaped kinds)
    pub fn add_primitive(&mut self, name: &str, element: u32) -> u64 {
        let name_ptr = self.intern_str(name);
        let address = self.alloc();
        self.types.insert(
            address,
            FakeType {
                name_ptr,
                element,
                ..FakeType::default()
            },
        );
        address
    }

    /// Adds a value type with the given `(name, field type address, is_static)` fields
    pub fn add_value_type(&mut self, name: &str, fields: &[(&str, u64, bool)]) -> u64 {
        self.add_type_with_class(name, crate::typesystem::ELEMENT_TYPE::VALUETYPE, true, fields)
    }

    /// Adds a reference or value class type (storage kind `class`)
    pub fn add_class_type(
        &mut self,
        name: &str,
        value_type: bool,
        fields: &[(&str, u64, bool)],
    ) -> u64 {
        self.add_type_with_class(name, crate::typesystem::ELEMENT_TYPE::CLASS, value_type, fields)
    }

    /// Adds a generic instantiation type (storage kind `genericinst`)
    pub fn add_generic_inst(
        &mut self,
        name: &str,
        value_type: bool,
        fields: &[(&str, u64, bool)],
    ) -> u64 {
        self.add_type_with_class(
            name,
            crate::typesystem::ELEMENT_TYPE::GENERICINST,
            value_type,
            fields,
        )
    }

    /// Adds a single-dimension array type over the given element type
    pub fn add_szarray(&mut self, name: &str, element_type: u64) -> u64 {
        let address = self.add_primitive(name, crate::typesystem::ELEMENT_TYPE::SZARRAY);
        self.types.get_mut(&address).unwrap().data_type = element_type;
        address
    }

    /// Marks a type as passed by reference
    pub fn set_by_reference(&mut self, type_address: u64) {
        self.types.get_mut(&type_address).unwrap().by_ref = true;
    }

    /// Replaces a type's name bytes with invalid UTF-8
    pub fn corrupt_name(&mut self, type_address: u64) {
        let name_ptr = self.types[&type_address].name_ptr;
        self.strings.insert(name_ptr, vec![0xff, 0xfe, 0xfd]);
    }

    /// Appends a field to the class behind an already-added type
    pub fn add_field(&mut self, type_address: u64, name: &str, field_type: u64, is_static: bool) {
        let class_address = self.type_class[&type_address];
        let index = self.classes[&class_address].fields.len();
        let field_address = self.make_field(name, field_type, is_static, index);
        self.classes
            .get_mut(&class_address)
            .unwrap()
            .fields
            .push(field_address);
    }

    /// Attaches a reflection object to a type; the object's class is the class behind
    /// `class_type`. Returns the object address.
    pub fn attach_object(&mut self, type_address: u64, class_type: u64) -> u64 {
        let class = self.type_class[&class_type];
        let address = self.alloc();
        self.objects.insert(address, FakeObject { class });
        self.types.get_mut(&type_address).unwrap().object = address;
        address
    }

    /// Attaches a generic-class projection to a type. When `inflated`, the projection
    /// resolves back to the type's own class. Returns the projection address.
    pub fn attach_generic_class(&mut self, type_address: u64, inflated: bool) -> u64 {
        let cached_class = if inflated {
            self.type_class[&type_address]
        } else {
            0
        };
        let address = self.alloc();
        self.generic_classes
            .insert(address, FakeGenericClass { cached_class });
        self.types.get_mut(&type_address).unwrap().generic_class = address;
        address
    }

    /// Builds the [`Runtime`] over the assembled graph, returning the bridge counters
    /// alongside
    pub fn build(self) -> (RuntimeRc, Arc<ApiCounters>) {
        let counters = Arc::new(ApiCounters::default());
        let api = FakeApi {
            process: self,
            counters: counters.clone(),
        };
        (Runtime::new(Box::new(api)), counters)
    }

    fn add_type_with_class(
        &mut self,
        name: &str,
        element: u32,
        value_type: bool,
        fields: &[(&str, u64, bool)],
    ) -> u64 {
        let (namespace, short_name) = name.split_once('.').unwrap_or(("", name));
        let namespace_ptr = self.intern_str(namespace);
        let short_name_ptr = self.intern_str(short_name);

        let field_addresses: Vec<u64> = fields
            .iter()
            .enumerate()
            .map(|(index, (field_name, field_type, is_static))| {
                self.make_field(field_name, *field_type, *is_static, index)
            })
            .collect();

        let class_address = self.alloc();
        self.classes.insert(
            class_address,
            FakeClass {
                name_ptr: short_name_ptr,
                namespace_ptr,
                value_type,
                fields: field_addresses,
            },
        );

        let name_ptr = self.intern_str(name);
        let type_address = self.alloc();
        self.types.insert(
            type_address,
            FakeType {
                name_ptr,
                element,
                class: class_address,
                ..FakeType::default()
            },
        );
        self.type_class.insert(type_address, class_address);

        type_address
    }

    fn make_field(&mut self, name: &str, field_type: u64, is_static: bool, index: usize) -> u64 {
        let name_ptr = self.intern_str(name);
        let address = self.alloc();
        let flags = if is_static {
            FIELD_PUBLIC | FIELD_STATIC
        } else {
            FIELD_PUBLIC
        };
        self.fields.insert(
            address,
            FakeField {
                name_ptr,
                flags,
                offset: 0x10 + (index as u32) * 8,
                ty: field_type,
            },
        );
        address
    }
}

struct FakeApi {
    process: FakeProcess,
    counters: Arc<ApiCounters>,
}

impl FakeApi {
    fn ty(&self, handle: TypeHandle) -> Result<&FakeType> {
        self.process.types.get(&handle.address()).ok_or(Error::MemoryRead {
            address: handle.address(),
        })
    }

    fn class(&self, handle: ClassHandle) -> Result<&FakeClass> {
        self.process
            .classes
            .get(&handle.address())
            .ok_or(Error::MemoryRead {
                address: handle.address(),
            })
    }

    fn field(&self, handle: FieldHandle) -> Result<&FakeField> {
        self.process
            .fields
            .get(&handle.address())
            .ok_or(Error::MemoryRead {
                address: handle.address(),
            })
    }
}

impl RuntimeApi for FakeApi {
    fn class_from_type(&self, ty: TypeHandle) -> Result<u64> {
        self.counters.class_from_type.fetch_add(1, Ordering::Relaxed);
        Ok(self.ty(ty)?.class)
    }

    fn type_get_data_type(&self, ty: TypeHandle) -> Result<u64> {
        self.counters
            .type_get_data_type
            .fetch_add(1, Ordering::Relaxed);
        Ok(self.ty(ty)?.data_type)
    }

    fn type_get_generic_class(&self, ty: TypeHandle) -> Result<u64> {
        Ok(self.ty(ty)?.generic_class)
    }

    fn type_is_by_reference(&self, ty: TypeHandle) -> Result<bool> {
        self.counters
            .type_is_by_reference
            .fetch_add(1, Ordering::Relaxed);
        Ok(self.ty(ty)?.by_ref)
    }

    fn type_get_name(&self, ty: TypeHandle) -> Result<u64> {
        self.counters.type_get_name.fetch_add(1, Ordering::Relaxed);
        Ok(self.ty(ty)?.name_ptr)
    }

    fn type_get_object(&self, ty: TypeHandle) -> Result<u64> {
        Ok(self.ty(ty)?.object)
    }

    fn type_get_type_enum(&self, ty: TypeHandle) -> Result<u32> {
        self.counters
            .type_get_type_enum
            .fetch_add(1, Ordering::Relaxed);
        Ok(self.ty(ty)?.element)
    }

    fn type_offset_of_type_enum(&self) -> Result<u32> {
        self.counters
            .type_offset_of_type_enum
            .fetch_add(1, Ordering::Relaxed);
        Ok(self.process.type_enum_offset)
    }

    fn class_get_name(&self, class: ClassHandle) -> Result<u64> {
        Ok(self.class(class)?.name_ptr)
    }

    fn class_get_namespace(&self, class: ClassHandle) -> Result<u64> {
        Ok(self.class(class)?.namespace_ptr)
    }

    fn class_is_value_type(&self, class: ClassHandle) -> Result<bool> {
        self.counters
            .class_is_value_type
            .fetch_add(1, Ordering::Relaxed);
        Ok(self.class(class)?.value_type)
    }

    fn class_get_fields(&self, class: ClassHandle) -> Result<Vec<u64>> {
        self.counters
            .class_get_fields
            .fetch_add(1, Ordering::Relaxed);
        Ok(self.class(class)?.fields.clone())
    }

    fn field_get_name(&self, field: FieldHandle) -> Result<u64> {
        Ok(self.field(field)?.name_ptr)
    }

    fn field_get_flags(&self, field: FieldHandle) -> Result<u32> {
        Ok(self.field(field)?.flags)
    }

    fn field_get_offset(&self, field: FieldHandle) -> Result<u32> {
        Ok(self.field(field)?.offset)
    }

    fn field_get_type(&self, field: FieldHandle) -> Result<u64> {
        Ok(self.field(field)?.ty)
    }

    fn object_get_class(&self, object: ObjectHandle) -> Result<u64> {
        self.process
            .objects
            .get(&object.address())
            .map(|obj| obj.class)
            .ok_or(Error::MemoryRead {
                address: object.address(),
            })
    }

    fn generic_class_get_cached_class(&self, generic: GenericClassHandle) -> Result<u64> {
        self.process
            .generic_classes
            .get(&generic.address())
            .map(|projection| projection.cached_class)
            .ok_or(Error::MemoryRead {
                address: generic.address(),
            })
    }

    fn read_utf8_str(&self, address: u64) -> Result<String> {
        self.counters.read_utf8_str.fetch_add(1, Ordering::Relaxed);
        let bytes = self
            .process
            .strings
            .get(&address)
            .ok_or(Error::MemoryRead { address })?;
        String::from_utf8(bytes.clone())
            .map_err(|_| malformed_error!("Invalid UTF-8 string at 0x{:016x}", address))
    }
}

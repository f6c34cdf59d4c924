//! A small fake foreign library used by the tests.
//!
//! Objects and boxed values are allocated with `Box`, every instance carries a counter that is
//! incremented when it's freed so tests can check how often this happened without sharing global
//! state. Finalizers that only see an address record it in `FREED_ADDRESSES`; tests that use it
//! must use addresses no other test uses.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    ffi::c_void,
    mem::size_of,
    ptr::NonNull,
    sync::{
        atomic::{AtomicI32, AtomicUsize, Ordering},
        Arc,
    },
};

use gi_managed::{
    data::types::{
        enums::{EnumType, FlagsType},
        type_tag::GetTypeFn,
        wrapped_ptr::copy_sized,
        CopyFn, RefFn,
    },
    impl_managed_wrapper,
    memory::alloc::free_mem,
    prelude::*,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

static FREED_ADDRESSES: Lazy<Mutex<HashMap<usize, usize>>> = Lazy::new(Default::default);

pub unsafe extern "C" fn record_free(ptr: *mut c_void) {
    *FREED_ADDRESSES.lock().entry(ptr as usize).or_default() += 1;
}

pub fn times_freed(addr: usize) -> usize {
    FREED_ADDRESSES.lock().get(&addr).copied().unwrap_or(0)
}

pub fn record_free_fn() -> FinalizerFn {
    record_free
}

// Runtime types

pub const OBJECT_TYPE: TypeTag = TypeTag::from_raw(80);
pub const WIDGET_TYPE: TypeTag = TypeTag::from_raw(0x1000);
pub const BUTTON_TYPE: TypeTag = TypeTag::from_raw(0x1010);
pub const LABEL_TYPE: TypeTag = TypeTag::from_raw(0x1020);
pub const COLOR_TYPE: TypeTag = TypeTag::from_raw(0x2000);
pub const ORIENTATION_TYPE: TypeTag = TypeTag::from_raw(0x3000);
pub const STATE_FLAGS_TYPE: TypeTag = TypeTag::from_raw(0x3010);

pub struct Registry;

impl TypeTagProvider for Registry {
    unsafe fn instance_type(&self, ptr: NonNull<c_void>) -> TypeTag {
        ptr.cast::<FakeObject>().as_ref().type_tag
    }

    fn is_a(&self, ty: TypeTag, ancestor: TypeTag) -> bool {
        let mut current = Some(ty);
        while let Some(ty) = current {
            if ty == ancestor {
                return true;
            }

            current = match ty {
                t if t == BUTTON_TYPE || t == LABEL_TYPE => Some(WIDGET_TYPE),
                t if t == WIDGET_TYPE => Some(OBJECT_TYPE),
                _ => None,
            };
        }

        false
    }

    fn type_name(&self, ty: TypeTag) -> String {
        match ty {
            t if t == BUTTON_TYPE => "FakeButton".into(),
            t if t == LABEL_TYPE => "FakeLabel".into(),
            t if t == WIDGET_TYPE => "FakeWidget".into(),
            _ => format!("{:?}", ty),
        }
    }
}

// Reference-counted objects

#[repr(C)]
pub struct FakeObject {
    pub type_tag: TypeTag,
    pub refcount: AtomicUsize,
    pub freed: Arc<AtomicUsize>,
}

pub fn new_fake_object(type_tag: TypeTag) -> (*mut FakeObject, Arc<AtomicUsize>) {
    let freed = Arc::new(AtomicUsize::new(0));
    let obj = Box::new(FakeObject {
        type_tag,
        refcount: AtomicUsize::new(1),
        freed: freed.clone(),
    });

    (Box::into_raw(obj), freed)
}

pub unsafe fn refcount(obj: *mut FakeObject) -> usize {
    (*obj).refcount.load(Ordering::SeqCst)
}

pub unsafe extern "C" fn fake_object_ref(ptr: *mut c_void) -> *mut c_void {
    (*ptr.cast::<FakeObject>())
        .refcount
        .fetch_add(1, Ordering::SeqCst);
    ptr
}

pub unsafe extern "C" fn fake_object_unref(ptr: *mut c_void) {
    let obj = ptr.cast::<FakeObject>();
    if (*obj).refcount.fetch_sub(1, Ordering::SeqCst) == 1 {
        let obj = Box::from_raw(obj);
        obj.freed.fetch_add(1, Ordering::SeqCst);
    }
}

unsafe extern "C" fn widget_get_type() -> TypeTag {
    WIDGET_TYPE
}

unsafe extern "C" fn button_get_type() -> TypeTag {
    BUTTON_TYPE
}

unsafe extern "C" fn label_get_type() -> TypeTag {
    LABEL_TYPE
}

#[derive(Clone, Debug)]
pub struct Widget(ManagedPtr<FakeObject>);

impl_managed_wrapper!(Widget, FakeObject);

unsafe impl HasTypeTag for Widget {
    const GET_TYPE: GetTypeFn = widget_get_type;
}

unsafe impl GObject for Widget {
    const REF: RefFn = fake_object_ref;
    const UNREF: FinalizerFn = fake_object_unref;
}

#[derive(Clone, Debug)]
pub struct Button(ManagedPtr<FakeObject>);

impl_managed_wrapper!(Button, FakeObject);

unsafe impl HasTypeTag for Button {
    const GET_TYPE: GetTypeFn = button_get_type;
}

unsafe impl GObject for Button {
    const REF: RefFn = fake_object_ref;
    const UNREF: FinalizerFn = fake_object_unref;
}

#[derive(Clone, Debug)]
pub struct Label(ManagedPtr<FakeObject>);

impl_managed_wrapper!(Label, FakeObject);

unsafe impl HasTypeTag for Label {
    const GET_TYPE: GetTypeFn = label_get_type;
}

unsafe impl GObject for Label {
    const REF: RefFn = fake_object_ref;
    const UNREF: FinalizerFn = fake_object_unref;
}

// Boxed values

#[repr(C)]
pub struct FakeColor {
    pub rgba: u32,
    pub freed: Arc<AtomicUsize>,
}

pub fn new_fake_color(rgba: u32) -> (*mut FakeColor, Arc<AtomicUsize>) {
    let freed = Arc::new(AtomicUsize::new(0));
    let color = Box::new(FakeColor {
        rgba,
        freed: freed.clone(),
    });

    (Box::into_raw(color), freed)
}

pub static COLOR_COPIES: AtomicUsize = AtomicUsize::new(0);

unsafe extern "C" fn fake_color_copy(ptr: *const c_void) -> *mut c_void {
    let src = &*ptr.cast::<FakeColor>();
    COLOR_COPIES.fetch_add(1, Ordering::SeqCst);

    // A color with rgba 0 can't be copied.
    if src.rgba == 0 {
        return std::ptr::null_mut();
    }

    let copy = Box::new(FakeColor {
        rgba: src.rgba,
        freed: Arc::new(AtomicUsize::new(0)),
    });

    Box::into_raw(copy).cast()
}

unsafe extern "C" fn fake_color_free(ptr: *mut c_void) {
    let color = Box::from_raw(ptr.cast::<FakeColor>());
    color.freed.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn color_get_type() -> TypeTag {
    COLOR_TYPE
}

#[derive(Clone, Debug)]
pub struct Color(ManagedPtr<FakeColor>);

impl_managed_wrapper!(Color, FakeColor);

impl Color {
    pub fn rgba(&self) -> u32 {
        self.with_managed_ptr(|ptr| unsafe { ptr.as_ref().rgba })
    }

    pub fn freed(&self) -> Arc<AtomicUsize> {
        self.with_managed_ptr(|ptr| unsafe { ptr.as_ref().freed.clone() })
    }
}

unsafe impl HasTypeTag for Color {
    const GET_TYPE: GetTypeFn = color_get_type;
}

unsafe impl BoxedType for Color {
    const COPY: CopyFn = fake_color_copy;
    const FREE: FinalizerFn = fake_color_free;
}

// Plain structs

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FakeRectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug)]
pub struct Rectangle(ManagedPtr<FakeRectangle>);

impl_managed_wrapper!(Rectangle, FakeRectangle);

impl Rectangle {
    pub fn get(&self) -> FakeRectangle {
        self.with_managed_ptr(|ptr| unsafe { *ptr.as_ptr() })
    }

    pub fn set(&self, rect: FakeRectangle) {
        self.with_managed_ptr(|ptr| unsafe { *ptr.as_ptr() = rect })
    }
}

unsafe impl WrappedPtr for Rectangle {
    const SIZE: usize = size_of::<FakeRectangle>();
    const COPY: CopyFn = copy_sized::<Self>;
    const FREE: Option<FinalizerFn> = Some(free_mem);
}

// A struct that is owned by a foreign container and must never be freed by the bindings.
#[derive(Clone, Debug)]
pub struct ContainerEntry(ManagedPtr<FakeRectangle>);

impl_managed_wrapper!(ContainerEntry, FakeRectangle);

unsafe impl WrappedPtr for ContainerEntry {
    const SIZE: usize = size_of::<FakeRectangle>();
    const COPY: CopyFn = copy_sized::<Self>;
    const FREE: Option<FinalizerFn> = None;
}

// Enums and flags

pub static ORIENTATION_TYPE_CALLS: AtomicI32 = AtomicI32::new(0);

unsafe extern "C" fn orientation_get_type() -> TypeTag {
    ORIENTATION_TYPE_CALLS.fetch_add(1, Ordering::SeqCst);
    ORIENTATION_TYPE
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Other(i32),
}

unsafe impl HasTypeTag for Orientation {
    const GET_TYPE: GetTypeFn = orientation_get_type;
}

impl EnumType for Orientation {
    fn to_raw(self) -> i32 {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
            Orientation::Other(raw) => raw,
        }
    }

    fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Orientation::Horizontal,
            1 => Orientation::Vertical,
            raw => Orientation::Other(raw),
        }
    }
}

unsafe extern "C" fn state_flags_get_type() -> TypeTag {
    STATE_FLAGS_TYPE
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateFlag {
    Active,
    Prelight,
    Selected,
    Other(u32),
}

unsafe impl HasTypeTag for StateFlag {
    const GET_TYPE: GetTypeFn = state_flags_get_type;
}

impl FlagsType for StateFlag {
    fn to_raw(self) -> u32 {
        match self {
            StateFlag::Active => 1 << 0,
            StateFlag::Prelight => 1 << 1,
            StateFlag::Selected => 1 << 2,
            StateFlag::Other(raw) => raw,
        }
    }

    fn from_raw(raw: u32) -> Self {
        match raw {
            1 => StateFlag::Active,
            2 => StateFlag::Prelight,
            4 => StateFlag::Selected,
            raw => StateFlag::Other(raw),
        }
    }
}

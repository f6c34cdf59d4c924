mod util;

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use gi_managed::{error::TypeError, prelude::*};

    use super::util::{
        fake_object_unref, init_logger, new_fake_object, refcount, Button, Label, Registry,
        Widget, BUTTON_TYPE, WIDGET_TYPE,
    };

    #[test]
    fn wrapped_object_is_unreffed_once() {
        init_logger();

        let (obj, freed) = new_fake_object(WIDGET_TYPE);
        let widget = unsafe { Widget::wrap_object(obj) }.unwrap();
        let clone = widget.clone();
        assert_eq!(unsafe { refcount(obj) }, 1);

        std::mem::drop(widget);
        assert_eq!(freed.load(Ordering::SeqCst), 0);

        std::mem::drop(clone);
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn borrowed_object_gets_own_reference() {
        let (obj, freed) = new_fake_object(WIDGET_TYPE);
        let widget = unsafe { Widget::new_object(obj) }.unwrap();
        assert_eq!(unsafe { refcount(obj) }, 2);

        std::mem::drop(widget);
        assert_eq!(unsafe { refcount(obj) }, 1);
        assert_eq!(freed.load(Ordering::SeqCst), 0);

        unsafe { fake_object_unref(obj.cast()) };
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disowned_object_transfers_reference() {
        let (obj, freed) = new_fake_object(WIDGET_TYPE);
        let widget = unsafe { Widget::wrap_object(obj) }.unwrap();

        // A foreign container takes over the reference.
        let raw = widget.disown();
        assert_eq!(raw.as_ptr(), obj);
        std::mem::drop(widget);
        assert_eq!(freed.load(Ordering::SeqCst), 0);
        assert_eq!(unsafe { refcount(obj) }, 1);

        unsafe { fake_object_unref(raw.as_ptr().cast()) };
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn release_object_unrefs_immediately() {
        let (obj, freed) = new_fake_object(WIDGET_TYPE);
        let widget = unsafe { Widget::wrap_object(obj) }.unwrap();

        assert!(widget.release_object().is_ok());
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shared_object_is_not_released() {
        let (obj, freed) = new_fake_object(BUTTON_TYPE);
        let widget = unsafe { Widget::wrap_object(obj) }.unwrap();
        let clone = widget.clone();

        let widget = widget.release_object().unwrap_err();
        assert_eq!(freed.load(Ordering::SeqCst), 0);
        assert!(!clone.is_disowned());

        // The other handle can still use the object.
        let button: Button = clone.try_cast_to(&Registry).unwrap();
        assert_eq!(button.as_ptr(), obj);

        // A cast is a handle too.
        let clone = clone.release_object().unwrap_err();
        std::mem::drop(widget);
        std::mem::drop(clone);
        assert_eq!(freed.load(Ordering::SeqCst), 0);

        assert!(button.release_object().is_ok());
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn released_disowned_object_keeps_reference() {
        let (obj, freed) = new_fake_object(WIDGET_TYPE);
        let widget = unsafe { Widget::wrap_object(obj) }.unwrap();

        let raw = widget.disown();
        assert!(widget.release_object().is_ok());
        assert_eq!(unsafe { refcount(obj) }, 1);
        assert_eq!(freed.load(Ordering::SeqCst), 0);

        unsafe { fake_object_unref(raw.as_ptr().cast()) };
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn wrapping_null_object_fails() {
        let err = unsafe { Widget::wrap_object(std::ptr::null_mut()) }.unwrap_err();
        assert!(!err.is_unexpected_null());
        assert!(unsafe { Widget::new_object(std::ptr::null_mut()) }.is_err());
    }

    #[test]
    fn cast_shares_managed_pointer() {
        let (obj, freed) = new_fake_object(BUTTON_TYPE);
        let widget = unsafe { Widget::wrap_object(obj) }.unwrap();

        let button: Button = widget.cast_to(&Registry).unwrap();
        assert!(ManagedPtr::same_identity(
            widget.managed_ptr(),
            button.managed_ptr()
        ));
        assert_eq!(unsafe { refcount(obj) }, 1);

        button.disown();
        assert!(widget.is_disowned());

        std::mem::drop(widget);
        std::mem::drop(button);
        assert_eq!(freed.load(Ordering::SeqCst), 0);
        unsafe { fake_object_unref(obj.cast()) };
    }

    #[test]
    fn upcast_always_succeeds() {
        let (obj, freed) = new_fake_object(BUTTON_TYPE);
        let button = unsafe { Button::wrap_object(obj) }.unwrap();

        let widget: Widget = button.try_cast_to(&Registry).unwrap();
        std::mem::drop(button);
        assert_eq!(freed.load(Ordering::SeqCst), 0);

        std::mem::drop(widget);
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_cast_fails() {
        let (obj, _freed) = new_fake_object(BUTTON_TYPE);
        let widget = unsafe { Widget::wrap_object(obj) }.unwrap();

        assert!(widget.cast_to::<Label, _>(&Registry).is_none());

        let err = widget.try_cast_to::<Label, _>(&Registry).unwrap_err();
        match *err {
            GiError::TypeError(TypeError::NotA {
                ref value_type,
                target_type,
            }) => {
                assert_eq!(value_type, "FakeButton");
                assert_eq!(target_type, "Label");
            }
            ref e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn type_of_object_is_static_type() {
        let (obj, _freed) = new_fake_object(BUTTON_TYPE);
        let widget = unsafe { Widget::wrap_object(obj) }.unwrap();

        assert_eq!(type_of(&widget), WIDGET_TYPE);
        assert_eq!(Button::type_tag(), BUTTON_TYPE);

        // The runtime type is still known after the object has been disowned.
        let raw = widget.disown();
        assert_eq!(type_of(&widget), WIDGET_TYPE);
        unsafe { fake_object_unref(raw.as_ptr().cast()) };
    }
}

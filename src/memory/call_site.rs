//! Diagnostic records of where managed pointers are created and disowned.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    panic::Location,
    thread::{self, ThreadId},
};
#[cfg(feature = "mem-debug")]
use std::{backtrace::Backtrace, sync::Arc};

/// The location and thread where some ownership operation took place.
///
/// Call sites are captured with `#[track_caller]`, so the location is the first caller outside
/// this crate. If the `mem-debug` feature is enabled a full backtrace is captured as well.
#[derive(Clone, Debug)]
pub struct CallSite {
    location: &'static Location<'static>,
    thread: ThreadId,
    #[cfg(feature = "mem-debug")]
    backtrace: Arc<Backtrace>,
}

impl CallSite {
    /// Capture the current call site, returns `None` if the `call-sites` feature is disabled.
    #[track_caller]
    #[inline]
    pub fn capture() -> Option<Self> {
        if cfg!(feature = "call-sites") {
            Some(CallSite {
                location: Location::caller(),
                thread: thread::current().id(),
                #[cfg(feature = "mem-debug")]
                backtrace: Arc::new(Backtrace::force_capture()),
            })
        } else {
            None
        }
    }

    /// The source location of the call.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The thread the call was made from.
    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    /// The backtrace captured with this call site.
    #[cfg(feature = "mem-debug")]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} on {:?}", self.location, self.thread)?;

        #[cfg(feature = "mem-debug")]
        write!(f, "\n{}", self.backtrace)?;

        Ok(())
    }
}

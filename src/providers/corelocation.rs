//! macOS sensor provider backed by the CoreLocation framework.
//!
//! A one-shot channel bridges the Objective-C delegate callbacks back into
//! async Rust. CoreLocation often replays the last known fix first; fixes
//! older than `maximum_age` are discarded so a stale reading never satisfies
//! the request.

use super::{LocationError, Position, PositionOptions, PositionProvider};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::debug;
use objc::declare::ClassDecl;
use objc::rc::Id;
use objc::runtime::{Class, Object, Sel};
use objc::{class, msg_send, sel, sel_impl};
use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr;
use std::sync::{Mutex, OnceLock};
use tokio::sync::oneshot;

// kCLAuthorizationStatus: 1 = restricted, 2 = denied
const AUTH_RESTRICTED: i32 = 1;
const AUTH_DENIED: i32 = 2;

// kCLLocationAccuracyBest / kCLLocationAccuracyHundredMeters
const ACCURACY_BEST: f64 = -1.0;
const ACCURACY_HUNDRED_METERS: f64 = 100.0;

struct Fix {
    latitude: f64,
    longitude: f64,
    accuracy: f64,
    timestamp: f64,
}

struct DelegateState {
    tx: Mutex<Option<oneshot::Sender<Result<Fix, LocationError>>>>,
    /// Fixes older than this many seconds are ignored.
    max_age_secs: f64,
}

impl DelegateState {
    fn new(tx: oneshot::Sender<Result<Fix, LocationError>>, max_age_secs: f64) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
            max_age_secs,
        }
    }

    fn send(&self, value: Result<Fix, LocationError>) {
        if let Some(sender) = self.tx.lock().ok().and_then(|mut guard| guard.take()) {
            let _ = sender.send(value);
        }
    }
}

#[repr(C)]
struct CLLocationCoordinate2D {
    latitude: f64,
    longitude: f64,
}

fn delegate_class() -> &'static Class {
    static CLASS: OnceLock<&'static Class> = OnceLock::new();
    CLASS.get_or_init(|| unsafe {
        let superclass = class!(NSObject);
        let mut decl = ClassDecl::new("GeoOriginCLDelegate", superclass)
            .expect("failed to declare GeoOriginCLDelegate class");
        decl.add_ivar::<*mut c_void>("state");
        decl.add_method(
            sel!(locationManager:didUpdateLocations:),
            update as extern "C" fn(&mut Object, Sel, *mut Object, *mut Object),
        );
        decl.add_method(
            sel!(locationManager:didFailWithError:),
            fail as extern "C" fn(&mut Object, Sel, *mut Object, *mut Object),
        );
        decl.add_method(sel!(dealloc), dealloc as extern "C" fn(&mut Object, Sel));
        decl.register()
    })
}

unsafe fn take_state(this: &Object) -> Option<&'static DelegateState> {
    let ptr: *mut c_void = *this.get_ivar("state");
    if ptr.is_null() {
        None
    } else {
        Some(&*(ptr as *mut DelegateState))
    }
}

unsafe extern "C" fn update(
    this: &mut Object,
    _: Sel,
    manager: *mut Object,
    locations: *mut Object,
) {
    if let Some(state) = take_state(this) {
        let count: usize = msg_send![locations, count];
        if count == 0 {
            return;
        }
        let location_obj: *mut Object = msg_send![locations, lastObject];
        if location_obj.is_null() {
            return;
        }
        let timestamp_obj: *mut Object = msg_send![location_obj, timestamp];
        let timestamp: f64 = msg_send![timestamp_obj, timeIntervalSince1970];

        // A cached fix within the tolerance is as good as a fresh reading.
        // Anything older: keep updating until a fresh fix arrives.
        let age = Utc::now().timestamp() as f64 - timestamp;
        if age > state.max_age_secs {
            return;
        }

        let coordinate: CLLocationCoordinate2D = msg_send![location_obj, coordinate];
        let accuracy: f64 = msg_send![location_obj, horizontalAccuracy];
        state.send(Ok(Fix {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            accuracy,
            timestamp,
        }));
    }
    let _: () = msg_send![manager, stopUpdatingLocation];
}

unsafe extern "C" fn fail(this: &mut Object, _: Sel, manager: *mut Object, error: *mut Object) {
    if let Some(state) = take_state(this) {
        let description: *mut Object = msg_send![error, localizedDescription];
        let c_string: *const std::os::raw::c_char = msg_send![description, UTF8String];
        let reason = if c_string.is_null() {
            "unknown".to_string()
        } else {
            CStr::from_ptr(c_string).to_string_lossy().into_owned()
        };
        state.send(Err(LocationError::Sensor(reason)));
    }
    let _: () = msg_send![manager, stopUpdatingLocation];
}

unsafe extern "C" fn dealloc(this: &mut Object, _: Sel) {
    let ptr: *mut c_void = *this.get_ivar("state");
    if !ptr.is_null() {
        drop(Box::from_raw(ptr as *mut DelegateState));
        this.set_ivar("state", ptr::null_mut());
    }
    let superclass = (*this).class().superclass().unwrap();
    let _: () = msg_send![super(this, superclass), dealloc];
}

pub struct CoreLocationProvider;

#[async_trait]
impl PositionProvider for CoreLocationProvider {
    fn is_available(&self) -> bool {
        unsafe { msg_send![class!(CLLocationManager), locationServicesEnabled] }
    }

    async fn current_position(
        &self,
        opts: &PositionOptions,
    ) -> Result<Position, LocationError> {
        let (tx, rx) = oneshot::channel();

        unsafe {
            debug!("requesting CoreLocation fix");

            let services_enabled: bool =
                msg_send![class!(CLLocationManager), locationServicesEnabled];
            if !services_enabled {
                return Err(LocationError::Unavailable);
            }

            let status: i32 = msg_send![class!(CLLocationManager), authorizationStatus];
            if status == AUTH_DENIED || status == AUTH_RESTRICTED {
                return Err(LocationError::PermissionDenied);
            }

            let manager_ptr: *mut Object = msg_send![class!(CLLocationManager), alloc];
            let manager_ptr: *mut Object = msg_send![manager_ptr, init];
            if manager_ptr.is_null() {
                return Err(LocationError::Sensor(
                    "failed to create CLLocationManager".into(),
                ));
            }
            let delegate_class = delegate_class();
            let delegate_ptr: *mut Object = msg_send![delegate_class, alloc];
            let delegate_ptr: *mut Object = msg_send![delegate_ptr, init];
            if delegate_ptr.is_null() {
                return Err(LocationError::Sensor("failed to allocate delegate".into()));
            }

            let state = Box::new(DelegateState::new(tx, opts.maximum_age.as_secs_f64()));
            let state_ptr = Box::into_raw(state) as *mut c_void;
            (*delegate_ptr).set_ivar("state", state_ptr);

            let desired_accuracy = if opts.high_accuracy {
                ACCURACY_BEST
            } else {
                ACCURACY_HUNDRED_METERS
            };

            let manager: Id<Object> = Id::from_ptr(manager_ptr);
            let delegate: Id<Object> = Id::from_ptr(delegate_ptr);
            let _: () = msg_send![&*manager, setDelegate: &*delegate];
            let _: () = msg_send![&*manager, setDesiredAccuracy: desired_accuracy];
            let _: () = msg_send![&*manager, requestWhenInUseAuthorization];
            let _: () = msg_send![&*manager, startUpdatingLocation];

            let result = tokio::time::timeout(opts.timeout, rx).await;
            match result {
                Ok(Ok(Ok(fix))) => {
                    let secs = fix.timestamp.floor();
                    let mut nanos = ((fix.timestamp - secs) * 1_000_000_000.0) as i64;
                    let mut secs = secs as i64;
                    if nanos < 0 {
                        nanos += 1_000_000_000;
                        secs -= 1;
                    }
                    let timestamp = Utc
                        .timestamp_opt(secs, nanos as u32)
                        .single()
                        .unwrap_or_else(Utc::now);
                    let accuracy_m = if fix.accuracy.is_sign_positive() {
                        Some(fix.accuracy)
                    } else {
                        None
                    };
                    Ok(Position {
                        latitude: fix.latitude,
                        longitude: fix.longitude,
                        accuracy_m,
                        timestamp,
                    })
                }
                Ok(Ok(Err(err))) => Err(err),
                Ok(Err(_canceled)) => {
                    Err(LocationError::Sensor("CoreLocation channel closed".into()))
                }
                Err(_) => {
                    let _: () = msg_send![&*manager, stopUpdatingLocation];
                    Err(LocationError::Timeout)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegate_class_is_singleton() {
        let first = delegate_class() as *const Class as usize;
        let second = delegate_class() as *const Class as usize;
        assert_eq!(first, second);
    }
}

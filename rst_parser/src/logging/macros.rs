//! Type-safe logging macros using Code types with Display support
//!
//! Every macro takes the [`LoggingService`](crate::logging::LoggingService)
//! as its first argument; context values may be any `Display` type.

// ============================================================================
// ERROR LOGGING MACROS
// ============================================================================

/// Log error with Code type
#[macro_export]
macro_rules! log_error {
    ($service:expr, $code:expr, $message:expr) => {
        $service.log_event($crate::logging::LogEvent::error($code, $message))
    };

    ($service:expr, $code:expr, $message:expr, doc = $doc:expr $(, $key:expr => $value:expr)*) => {
        {
            let event = $crate::logging::LogEvent::error($code, $message).with_doc_id($doc);
            $(
                let event = event.with_context($key, &format!("{}", $value));
            )*
            $service.log_event(event);
        }
    };

    ($service:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let event = $crate::logging::LogEvent::error($code, $message);
            $(
                let event = event.with_context($key, &format!("{}", $value));
            )+
            $service.log_event(event);
        }
    };
}

// ============================================================================
// SUCCESS LOGGING MACROS
// ============================================================================

/// Log success with Code type
#[macro_export]
macro_rules! log_success {
    ($service:expr, $code:expr, $message:expr) => {
        $service.log_event($crate::logging::LogEvent::success($code, $message))
    };

    ($service:expr, $code:expr, $message:expr, doc = $doc:expr $(, $key:expr => $value:expr)*) => {
        {
            if $service.should_log($crate::logging::LogLevel::Info) {
                let event = $crate::logging::LogEvent::success($code, $message).with_doc_id($doc);
                $(
                    let event = event.with_context($key, &format!("{}", $value));
                )*
                $service.log_event(event);
            }
        }
    };

    ($service:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            if $service.should_log($crate::logging::LogLevel::Info) {
                let event = $crate::logging::LogEvent::success($code, $message);
                $(
                    let event = event.with_context($key, &format!("{}", $value));
                )+
                $service.log_event(event);
            }
        }
    };
}

// ============================================================================
// WARNING LOGGING MACROS
// ============================================================================

/// Log warning with Code type
#[macro_export]
macro_rules! log_warning {
    ($service:expr, $code:expr, $message:expr) => {
        $service.log_event($crate::logging::LogEvent::warning_with_code($code, $message))
    };

    ($service:expr, $code:expr, $message:expr, doc = $doc:expr $(, $key:expr => $value:expr)*) => {
        {
            let event =
                $crate::logging::LogEvent::warning_with_code($code, $message).with_doc_id($doc);
            $(
                let event = event.with_context($key, &format!("{}", $value));
            )*
            $service.log_event(event);
        }
    };

    ($service:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let event = $crate::logging::LogEvent::warning_with_code($code, $message);
            $(
                let event = event.with_context($key, &format!("{}", $value));
            )+
            $service.log_event(event);
        }
    };
}

// ============================================================================
// INFO / DEBUG LOGGING MACROS
// ============================================================================

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($service:expr, $message:expr) => {
        $service.log_event($crate::logging::LogEvent::info($message))
    };

    ($service:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            if $service.should_log($crate::logging::LogLevel::Info) {
                let event = $crate::logging::LogEvent::info($message);
                $(
                    let event = event.with_context($key, &format!("{}", $value));
                )+
                $service.log_event(event);
            }
        }
    };
}

/// Log debug message; context values are only formatted when debug is enabled
#[macro_export]
macro_rules! log_debug {
    ($service:expr, $message:expr) => {
        {
            if $service.should_log($crate::logging::LogLevel::Debug) {
                $service.log_event($crate::logging::LogEvent::debug($message));
            }
        }
    };

    ($service:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            if $service.should_log($crate::logging::LogLevel::Debug) {
                let event = $crate::logging::LogEvent::debug($message);
                $(
                    let event = event.with_context($key, &format!("{}", $value));
                )+
                $service.log_event(event);
            }
        }
    };
}

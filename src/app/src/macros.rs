/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.error_message, None)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.backoff_ticks, 0;
///     model.error_message, None
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

/// Macro for parameterless device commands (status-only response).
///
/// The brewer commands carry no body and no credentials; only success or
/// failure of the request is reported back.
///
/// NOTE: URLs are prefixed with `https://relative`.
/// `crux_http` requires absolute URLs and rejects relative paths.
/// Shells strip this prefix before sending requests.
///
/// # Example
/// ```ignore
/// device_command!("/toggle", ToggleResponse, "Toggle")
/// ```
#[macro_export]
macro_rules! device_command {
    ($endpoint:expr, $response_event:ident, $action:expr) => {
        $crate::HttpCmd::get($crate::build_url($endpoint))
            .build()
            .then_send(|result| {
                let event_result = $crate::process_status_response($action, result);
                $crate::events::Event::$response_event(event_result)
            })
    };
}

/// Macro for a sequenced status read expecting a JSON body.
///
/// The sequence number travels with the response so stale replies can be
/// told apart from fresh ones.
///
/// # Example
/// ```ignore
/// status_get!("/status", seq, MachineStatus, "Status")
/// ```
#[macro_export]
macro_rules! status_get {
    ($endpoint:expr, $seq:expr, $response_type:ty, $action:expr) => {{
        let seq: u64 = $seq;
        $crate::HttpCmd::get($crate::build_url($endpoint))
            .build()
            .then_send(move |result| {
                let result: Result<$response_type, String> =
                    $crate::process_json_response($action, result);
                $crate::events::Event::StatusResponse { seq, result }
            })
    }};
}

use super::*;

/// `<script>` elements in the live document. Load completion is tracked in
/// `IDENTITY_SCRIPT_LOADED` for the lifetime of the page.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct DomScriptRegistry;

impl ScriptRegistry for DomScriptRegistry {
    fn is_loaded(&self, src: &str) -> bool {
        find_script(src).is_some()
    }

    fn inject(&self, src: &str) -> Result<(), IdentityError> {
        let document = document().map_err(IdentityError::ScriptLoad)?;
        let script = document
            .create_element("script")
            .map_err(|_| {
                IdentityError::ScriptLoad("failed to create script element".to_string())
            })?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| {
                IdentityError::ScriptLoad("script element has wrong type".to_string())
            })?;
        script.set_src(src);
        script.set_async(true);
        script.set_defer(true);
        attach_load_listener(&script);
        let head = document.head().ok_or_else(|| {
            IdentityError::ScriptLoad("document head is unavailable".to_string())
        })?;
        head.append_child(&script).map_err(|_| {
            IdentityError::ScriptLoad("failed to append script element".to_string())
        })?;
        Ok(())
    }
}

pub(super) fn find_script(src: &str) -> Option<web_sys::Element> {
    let selector = format!("script[src=\"{src}\"]");
    document().ok()?.query_selector(&selector).ok()?
}

fn attach_load_listener(script: &web_sys::Element) {
    if script.has_attribute(SCRIPT_LOAD_LISTENER_ATTRIBUTE) {
        return;
    }
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
        mark_identity_script_loaded();
    }));
    if script
        .add_event_listener_with_callback("load", callback.as_ref().unchecked_ref())
        .is_err()
    {
        return;
    }
    let _ = script.set_attribute(SCRIPT_LOAD_LISTENER_ATTRIBUTE, "");
    IDENTITY_SCRIPT_LOAD_HANDLERS.with(|handlers| handlers.borrow_mut().push(callback));
}

fn mark_identity_script_loaded() {
    IDENTITY_SCRIPT_LOADED.with(|loaded| loaded.set(true));
    let waiters =
        IDENTITY_SCRIPT_WAITERS.with(|waiters| std::mem::take(&mut *waiters.borrow_mut()));
    for waiter in waiters {
        let _ = waiter.send(());
    }
}

async fn wait_for_identity_script() -> Result<(), IdentityError> {
    if google_identity_api().is_ok() {
        return Ok(());
    }
    if IDENTITY_SCRIPT_LOADED.with(Cell::get) {
        return google_identity_api().map(|_| ());
    }
    let script = find_script(GOOGLE_IDENTITY_SCRIPT_SRC).ok_or_else(|| {
        IdentityError::ScriptLoad("identity script was never injected".to_string())
    })?;
    attach_load_listener(&script);

    let (sender, receiver) = oneshot::channel();
    IDENTITY_SCRIPT_WAITERS.with(|waiters| waiters.borrow_mut().push(sender));
    receiver
        .await
        .map_err(|_| IdentityError::ScriptLoad("identity script load was abandoned".to_string()))?;
    google_identity_api().map(|_| ())
}

/// `window.google.accounts.id`.
fn google_identity_api() -> Result<JsValue, IdentityError> {
    let window = web_sys::window()
        .ok_or_else(|| IdentityError::WidgetUnavailable("window is unavailable".to_string()))?;
    let mut current: JsValue = window.into();
    for segment in GOOGLE_IDENTITY_API_PATH {
        current = js_sys::Reflect::get(&current, &JsValue::from_str(segment))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .ok_or_else(|| {
                IdentityError::WidgetUnavailable(format!("`{segment}` is not defined"))
            })?;
    }
    Ok(current)
}

fn call_api_method(
    api: &JsValue,
    name: &str,
    args: &js_sys::Array,
) -> Result<JsValue, IdentityError> {
    let method = js_sys::Reflect::get(api, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| IdentityError::WidgetUnavailable(format!("`{name}` is not a function")))?;
    method
        .apply(api, args)
        .map_err(|_| IdentityError::WidgetUnavailable(format!("`{name}` threw")))
}

fn identity_callback() -> JsValue {
    IDENTITY_CALLBACK.with(|slot| {
        let mut slot = slot.borrow_mut();
        let callback = slot.get_or_insert_with(|| {
            Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |response| {
                deliver_credential_response(&response);
            }))
        });
        callback.as_ref().clone()
    })
}

fn deliver_credential_response(response: &JsValue) {
    let read = |field: &str| {
        js_sys::Reflect::get(response, &JsValue::from_str(field))
            .ok()
            .and_then(|value| value.as_string())
    };
    let payload = CredentialResponse {
        credential: read("credential"),
        select_by: read("select_by"),
    };
    let waiter = IDENTITY_CREDENTIAL_WAITER.with(|slot| slot.borrow_mut().take());
    match waiter {
        Some(waiter) => {
            let _ = waiter.send(payload);
        }
        None => console_warn("identity callback fired with no sign-in in progress"),
    }
}

/// Google Identity Services behind [`IdentityDelegate`]. Each call re-initializes the
/// widget and renders its button; the newest call owns the callback.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct GoogleIdentityDelegate;

#[async_trait(?Send)]
impl IdentityDelegate for GoogleIdentityDelegate {
    async fn initiate(
        &self,
        config: &IdentityConfig,
    ) -> Result<CredentialResponse, IdentityError> {
        wait_for_identity_script().await?;
        let api = google_identity_api()?;

        let (sender, receiver) = oneshot::channel();
        IDENTITY_CREDENTIAL_WAITER.with(|slot| *slot.borrow_mut() = Some(sender));

        let options = js_sys::Object::new();
        js_sys::Reflect::set(
            &options,
            &JsValue::from_str("client_id"),
            &JsValue::from_str(&config.client_id),
        )
        .map_err(|_| IdentityError::WidgetUnavailable("failed to set client_id".to_string()))?;
        js_sys::Reflect::set(&options, &JsValue::from_str("callback"), &identity_callback())
            .map_err(|_| IdentityError::WidgetUnavailable("failed to set callback".to_string()))?;
        call_api_method(&api, "initialize", &js_sys::Array::of1(&options))?;

        let container = element_by_id(&config.container_id)
            .ok_or_else(|| IdentityError::ContainerMissing(config.container_id.clone()))?;
        let button_json = serde_json::to_string(&config.button)
            .map_err(|error| IdentityError::WidgetUnavailable(error.to_string()))?;
        let button_options = js_sys::JSON::parse(&button_json)
            .map_err(|_| IdentityError::WidgetUnavailable("invalid button options".to_string()))?;
        call_api_method(
            &api,
            "renderButton",
            &js_sys::Array::of2(&container, &button_options),
        )?;

        receiver.await.map_err(|_| {
            IdentityError::WidgetUnavailable("sign-in attempt was superseded".to_string())
        })
    }
}

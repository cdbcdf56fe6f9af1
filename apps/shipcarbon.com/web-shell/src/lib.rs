#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
mod shell_state;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};

    use async_trait::async_trait;
    use chrono::Utc;
    use futures::channel::oneshot;
    use gloo_net::http::Request;
    use shipcarbon_client_core::access_request::{
        AccessRequest, AccessRequestForm, AccessRequestTransport, FormView, TransportResponse,
        submit_access_request,
    };
    use shipcarbon_client_core::config::ShellConfig;
    use shipcarbon_client_core::identity::{
        CredentialResponse, IdentityConfig, IdentityDelegate, IdentityError, SIGN_IN_FAILED_MESSAGE,
        ScriptRegistry, SignInFlow, SignInOutcome,
    };
    use shipcarbon_client_core::routes::{AppRoute, RouteResolution};
    use shipcarbon_client_core::session::{SessionStorage, SessionStorageError, SessionStore};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlButtonElement, HtmlInputElement, HtmlScriptElement, HtmlTextAreaElement};

    use crate::shell_state::ShellState;
    use crate::wasm_constants::*;

    mod dom;
    mod identity;
    mod lifecycle;
    mod network;
    mod routing;
    mod storage;

    use dom::*;
    use identity::*;
    use lifecycle::*;
    use network::*;
    use routing::*;
    use storage::*;

    thread_local! {
        static SHELL_STATE: RefCell<ShellState> = RefCell::new(ShellState::default());
        static SIGN_IN_FLOW: RefCell<Option<SignInFlow<BrowserLocalStorage>>> = const { RefCell::new(None) };
        static IDENTITY_SCRIPT_LOADED: Cell<bool> = const { Cell::new(false) };
        static IDENTITY_SCRIPT_WAITERS: RefCell<Vec<oneshot::Sender<()>>> = const { RefCell::new(Vec::new()) };
        static IDENTITY_SCRIPT_LOAD_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static IDENTITY_CREDENTIAL_WAITER: RefCell<Option<oneshot::Sender<CredentialResponse>>> = const { RefCell::new(None) };
        static IDENTITY_CALLBACK: RefCell<Option<Closure<dyn FnMut(JsValue)>>> = const { RefCell::new(None) };
        static ACTION_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static ESCAPE_KEY_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>> = const { RefCell::new(None) };
        static ACCESS_REQUEST_SUBMIT_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        set_boot_phase("booting", "initializing ShipCarbon web shell");
        if let Err(error) = boot() {
            set_boot_error(&error);
        }
    }

    #[wasm_bindgen]
    pub fn boot_diagnostics_json() -> String {
        SHELL_STATE.with(|state| {
            serde_json::to_string(&state.borrow().diagnostics).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}".to_string()
            })
        })
    }

    #[wasm_bindgen]
    pub fn navigate(path: String) {
        navigate_to(&AppRoute::from_path(&path));
    }

    /// Drops the stored credential. The next guarded navigation sees a signed-out visitor.
    #[wasm_bindgen]
    pub fn sign_out() {
        if let Err(error) = SessionStore::new(BrowserLocalStorage).clear() {
            console_warn(&format!("failed to clear credential: {error}"));
        }
        SHELL_STATE.with(|state| state.borrow_mut().diagnostics.has_credential = false);
    }

    fn boot() -> Result<(), String> {
        let config = ShellConfig::from_json_or_default(read_shell_config_json().as_deref());
        let credential = SessionStore::new(BrowserLocalStorage)
            .get()
            .unwrap_or_else(|error| {
                console_warn(&format!("credential unavailable: {error}"));
                None
            });
        let path = current_pathname();
        let (state, resolution) = ShellState::boot(config.clone(), &path, credential.as_ref());
        SHELL_STATE.with(|cell| *cell.borrow_mut() = state);

        if let RouteResolution::Redirect(route) = resolution {
            set_boot_phase("redirecting", &format!("{path} requires a credential"));
            return redirect_to(&route);
        }

        match config.identity_config() {
            Ok(identity) => SIGN_IN_FLOW.with(|slot| {
                *slot.borrow_mut() = Some(SignInFlow::new(
                    SessionStore::new(BrowserLocalStorage),
                    identity,
                ));
            }),
            Err(error) => console_warn(&format!("sign-in disabled: {error}")),
        }

        install_action_handlers()?;
        install_access_request_form()?;
        set_boot_phase("ready", "page enhanced");
        Ok(())
    }

    fn install_action_handlers() -> Result<(), String> {
        let document = document()?;

        ACTION_CLICK_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                handle_action_click(event);
            }));
            let _ = document
                .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
            *slot.borrow_mut() = Some(callback);
        });

        ESCAPE_KEY_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let callback =
                Closure::<dyn FnMut(web_sys::KeyboardEvent)>::wrap(Box::new(move |event| {
                    if event.key() == "Escape" {
                        close_sign_in();
                    }
                }));
            let _ = document
                .add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref());
            *slot.borrow_mut() = Some(callback);
        });

        Ok(())
    }

    fn handle_action_click(event: web_sys::Event) {
        let Some(action) = action_from_event(&event) else {
            return;
        };
        match action.as_str() {
            ACTION_OPEN_SIGN_IN => {
                event.prevent_default();
                open_sign_in();
            }
            ACTION_CLOSE_SIGN_IN => {
                event.prevent_default();
                close_sign_in();
            }
            ACTION_TOGGLE_MOBILE_MENU => {
                let open = SHELL_STATE.with(|state| state.borrow_mut().toggle_mobile_menu());
                render_mobile_menu(open);
            }
            ACTION_RETURN_TO_DASHBOARD => {
                event.prevent_default();
                navigate_to(&AppRoute::DashboardHome);
            }
            _ => {}
        }
    }

    fn open_sign_in() {
        render_sign_in_modal(true);
        let opened = SIGN_IN_FLOW.with(|slot| {
            slot.borrow_mut().as_mut().map(|flow| {
                let result = flow.open_modal(&DomScriptRegistry);
                (result, flow.config().clone(), flow.modal().attempt)
            })
        });
        let Some((result, config, attempt)) = opened else {
            render_sign_in_error(Some(SIGN_IN_FAILED_MESSAGE));
            record_sign_in_attempt(0, Some(IdentityError::MissingClientId.to_string()));
            return;
        };
        if let Err(error) = result {
            render_sign_in_error(Some(SIGN_IN_FAILED_MESSAGE));
            record_sign_in_attempt(attempt, Some(error.to_string()));
            return;
        }
        render_sign_in_error(None);
        record_sign_in_attempt(attempt, None);

        spawn_local(async move {
            let result = GoogleIdentityDelegate.initiate(&config).await;
            let outcome = SIGN_IN_FLOW.with(|slot| {
                let mut slot = slot.borrow_mut();
                let flow = slot.as_mut()?;
                if flow.modal().attempt != attempt {
                    return None;
                }
                Some((flow.complete(result, Utc::now()), flow.modal().error.clone()))
            });
            match outcome {
                Some((SignInOutcome::Navigate(route), _)) => {
                    render_sign_in_modal(false);
                    navigate_to(&route);
                }
                Some((SignInOutcome::Failed { message }, error)) => {
                    render_sign_in_error(Some(&message));
                    record_sign_in_attempt(attempt, error);
                }
                None => {}
            }
        });
    }

    fn close_sign_in() {
        SIGN_IN_FLOW.with(|slot| {
            if let Some(flow) = slot.borrow_mut().as_mut() {
                flow.close_modal();
            }
        });
        render_sign_in_modal(false);
    }

    fn record_sign_in_attempt(attempt: u32, error: Option<String>) {
        SHELL_STATE.with(|state| state.borrow_mut().record_sign_in_attempt(attempt, error));
    }

    fn install_access_request_form() -> Result<(), String> {
        let Some(form) = element_by_id(ACCESS_REQUEST_FORM_ID) else {
            return Ok(());
        };

        let prefill = SHELL_STATE.with(|state| {
            state
                .borrow()
                .form
                .as_ref()
                .map(|form| form.email().to_string())
                .filter(|email| !email.is_empty())
        });
        if let Some(email) = prefill {
            if input_value(ACCESS_REQUEST_EMAIL_ID).is_empty() {
                set_input_value(ACCESS_REQUEST_EMAIL_ID, &email);
            }
        }

        ACCESS_REQUEST_SUBMIT_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                let event: web_sys::Event = event;
                event.prevent_default();
                submit_access_request_form();
            }));
            let _ =
                form.add_event_listener_with_callback("submit", callback.as_ref().unchecked_ref());
            *slot.borrow_mut() = Some(callback);
        });
        Ok(())
    }

    fn submit_access_request_form() {
        let email = input_value(ACCESS_REQUEST_EMAIL_ID);
        let purpose = textarea_value(ACCESS_REQUEST_PURPOSE_ID);
        let begun = SHELL_STATE.with(|cell| {
            let mut state = cell.borrow_mut();
            let form = state
                .form
                .get_or_insert_with(|| AccessRequestForm::new(""));
            form.set_email(&email);
            form.set_purpose(&purpose);
            form.begin_submit()
        });
        render_access_request_view();
        let Ok(request) = begun else {
            return;
        };

        spawn_local(async move {
            let result = submit_access_request(&GlooAccessRequestTransport, &request).await;
            if let Err(error) = &result {
                console_warn(&format!("access request failed: {error}"));
            }
            SHELL_STATE.with(|cell| {
                let mut state = cell.borrow_mut();
                if let Some(form) = state.form.as_mut() {
                    form.finish_submit(&result);
                }
                state.record_submit(&result);
            });
            render_access_request_view();
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::boot_diagnostics_json;

#[cfg(not(target_arch = "wasm32"))]
pub fn boot_diagnostics_json() -> String {
    "{\"phase\":\"native\",\"detail\":\"web shell diagnostics only available on wasm\"}".to_string()
}

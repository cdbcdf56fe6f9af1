use serde::Serialize;
use shipcarbon_client_core::access_request::{
    AccessRequestForm, SubmitError, TransportResponse,
};
use shipcarbon_client_core::config::ShellConfig;
use shipcarbon_client_core::routes::{AppRoute, RouteResolution, resolve_route};
use shipcarbon_client_core::session::Credential;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootDiagnostics {
    pub phase: String,
    pub detail: String,
    pub route_path: String,
    pub route_guard: String,
    pub has_credential: bool,
    pub sign_in_attempts: u32,
    pub submit_total: u64,
    pub submit_failures: u64,
    pub last_error: Option<String>,
}

impl Default for BootDiagnostics {
    fn default() -> Self {
        Self {
            phase: "idle".to_string(),
            detail: "web shell not started".to_string(),
            route_path: "/".to_string(),
            route_guard: "open".to_string(),
            has_credential: false,
            sign_in_attempts: 0,
            submit_total: 0,
            submit_failures: 0,
            last_error: None,
        }
    }
}

/// Browser-side state for the view the server rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    pub config: ShellConfig,
    pub route: AppRoute,
    pub form: Option<AccessRequestForm>,
    pub mobile_menu_open: bool,
    pub diagnostics: BootDiagnostics,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            config: ShellConfig::default(),
            route: AppRoute::Landing,
            form: None,
            mobile_menu_open: false,
            diagnostics: BootDiagnostics::default(),
        }
    }
}

#[cfg_attr(test, allow(dead_code))]
impl ShellState {
    /// Resolves the guard for `path`. The form is only prepared when the request view renders.
    pub fn boot(
        config: ShellConfig,
        path: &str,
        credential: Option<&Credential>,
    ) -> (Self, RouteResolution) {
        let resolution = resolve_route(path, config.route_guard, credential.is_some());
        let route = match &resolution {
            RouteResolution::Render(route) | RouteResolution::Redirect(route) => route.clone(),
        };
        let form = matches!(resolution, RouteResolution::Render(AppRoute::RequestForm))
            .then(|| AccessRequestForm::new(&config.email_prefill.resolve(credential)));
        let diagnostics = BootDiagnostics {
            phase: "booting".to_string(),
            detail: "shell state restored".to_string(),
            route_path: route.to_path(),
            route_guard: config.route_guard.as_str().to_string(),
            has_credential: credential.is_some(),
            ..BootDiagnostics::default()
        };
        let state = Self {
            config,
            route,
            form,
            mobile_menu_open: false,
            diagnostics,
        };
        (state, resolution)
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.mobile_menu_open
    }

    pub fn record_submit(&mut self, result: &Result<TransportResponse, SubmitError>) {
        self.diagnostics.submit_total = self.diagnostics.submit_total.saturating_add(1);
        if let Err(error) = result {
            self.diagnostics.submit_failures = self.diagnostics.submit_failures.saturating_add(1);
            self.diagnostics.last_error = Some(error.to_string());
        }
    }

    pub fn record_sign_in_attempt(&mut self, attempt: u32, error: Option<String>) {
        self.diagnostics.sign_in_attempts = attempt;
        if error.is_some() {
            self.diagnostics.last_error = error;
        }
    }

    pub fn set_phase(&mut self, phase: &str, detail: &str) {
        self.diagnostics.phase = phase.to_string();
        self.diagnostics.detail = detail.to_string();
        if phase != "error" {
            self.diagnostics.last_error = None;
        }
    }

    pub fn set_error(&mut self, message: &str) {
        self.diagnostics.phase = "error".to_string();
        self.diagnostics.detail = "startup failed".to_string();
        self.diagnostics.last_error = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipcarbon_client_core::config::EmailPrefill;
    use shipcarbon_client_core::routes::RouteGuard;

    #[test]
    fn default_guard_renders_request_form_without_credential() {
        let (state, resolution) = ShellState::boot(ShellConfig::default(), "/request_form", None);

        assert_eq!(resolution, RouteResolution::Render(AppRoute::RequestForm));
        let form = state.form.expect("form prepared");
        assert_eq!(form.email(), "");
        assert_eq!(state.diagnostics.route_path, "/request_form");
        assert!(!state.diagnostics.has_credential);
    }

    #[test]
    fn guarded_dashboard_redirects_to_landing() {
        let config = ShellConfig {
            route_guard: RouteGuard::RequireCredential,
            ..ShellConfig::default()
        };

        let (state, resolution) = ShellState::boot(config, "/dashboard-home", None);

        assert_eq!(resolution, RouteResolution::Redirect(AppRoute::Landing));
        assert_eq!(state.route, AppRoute::Landing);
        assert_eq!(state.form, None);
        assert_eq!(state.diagnostics.route_guard, "require_credential");
    }

    #[test]
    fn fixed_prefill_seeds_form_email() {
        let config = ShellConfig {
            email_prefill: EmailPrefill::Fixed {
                email: "user@example.com".to_string(),
            },
            ..ShellConfig::default()
        };

        let (state, _) = ShellState::boot(config, "/request-api", None);

        assert_eq!(
            state.form.as_ref().map(AccessRequestForm::email),
            Some("user@example.com")
        );
    }

    #[test]
    fn submit_failures_are_counted() {
        let (mut state, _) = ShellState::boot(ShellConfig::default(), "/", None);

        state.record_submit(&Ok(TransportResponse { status: 202 }));
        state.record_submit(&Err(SubmitError::Status(500)));

        assert_eq!(state.diagnostics.submit_total, 2);
        assert_eq!(state.diagnostics.submit_failures, 1);
        assert_eq!(
            state.diagnostics.last_error.as_deref(),
            Some("access request rejected with status 500")
        );
    }

    #[test]
    fn mobile_menu_toggles() {
        let mut state = ShellState::default();
        assert!(state.toggle_mobile_menu());
        assert!(!state.toggle_mobile_menu());
    }
}

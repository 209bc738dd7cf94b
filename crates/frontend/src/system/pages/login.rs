use contracts::system::auth::LoginResponse;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::system::auth::api;

/// What one finished login exchange means for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LoginOutcome {
    EnterChat,
    ShowError(String),
}

/// Maps the API result onto the form reaction: a server-supplied error
/// string beats the generic fallback, and transport failures get the
/// connectivity message.
fn login_outcome(result: Result<LoginResponse, String>) -> LoginOutcome {
    match result {
        Ok(response) if response.success => LoginOutcome::EnterChat,
        Ok(response) => LoginOutcome::ShowError(
            response
                .error
                .unwrap_or_else(|| "Invalid credentials".to_string()),
        ),
        Err(_) => LoginOutcome::ShowError("Connection error. Please try again.".to_string()),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error_message, set_error_message) = create_signal(Option::<String>::None);
    let (is_loading, set_is_loading) = create_signal(false);

    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get();
        let password_val = password.get();
        let navigate = navigate.clone();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            let result = api::login(username_val, password_val).await;
            if let Err(e) = &result {
                log::error!("Login request failed: {}", e);
            }
            match login_outcome(result) {
                LoginOutcome::EnterChat => {
                    log::info!("Login ok, entering chat");
                    navigate("/chat", Default::default());
                }
                LoginOutcome::ShowError(message) => {
                    set_error_message.set(Some(message));
                    set_is_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"WebAI"</h1>
                <h2>"Sign in"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="username">"Username"</label>
                        <input
                            type="text"
                            id="username"
                            value=move || username.get()
                            on:input=move |ev| {
                                set_username.set(event_target_value(&ev));
                                // Typing hides a stale error right away
                                set_error_message.set(None);
                            }
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            type="password"
                            id="password"
                            value=move || password.get()
                            on:input=move |ev| {
                                set_password.set(event_target_value(&ev));
                                set_error_message.set(None);
                            }
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(success: bool, error: Option<&str>) -> LoginResponse {
        LoginResponse {
            success,
            username: None,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_success_enters_chat() {
        assert_eq!(
            login_outcome(Ok(response(true, None))),
            LoginOutcome::EnterChat
        );
    }

    #[test]
    fn test_server_error_is_shown() {
        assert_eq!(
            login_outcome(Ok(response(false, Some("bad")))),
            LoginOutcome::ShowError("bad".to_string())
        );
    }

    #[test]
    fn test_missing_error_falls_back_to_generic_message() {
        assert_eq!(
            login_outcome(Ok(response(false, None))),
            LoginOutcome::ShowError("Invalid credentials".to_string())
        );
    }

    #[test]
    fn test_transport_failure_shows_connectivity_message() {
        assert_eq!(
            login_outcome(Err("Failed to send request".to_string())),
            LoginOutcome::ShowError("Connection error. Please try again.".to_string())
        );
    }
}

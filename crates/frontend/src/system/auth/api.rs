use contracts::system::auth::{LoginRequest, LoginResponse, LogoutResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Login with username and password
///
/// Non-ok statuses still carry a JSON body (401 comes with
/// `{success: false, error}`), so the body is parsed regardless of status;
/// `Err` is reserved for transport failures and unreadable bodies.
pub async fn login(username: String, password: String) -> Result<LoginResponse, String> {
    let request = LoginRequest { username, password };

    let response = Request::post(&api_url("/api/login"))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Logout (clears the server-side session)
pub async fn logout() -> Result<LogoutResponse, String> {
    let response = Request::post(&api_url("/api/logout"))
        .header("Content-Type", "application/json")
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Logout failed: {}", response.status()));
    }

    response
        .json::<LogoutResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

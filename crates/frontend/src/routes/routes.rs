use crate::domain::chat::ui::view::ChatPage;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

/// Page routing.
///
/// The session cookie is HttpOnly, so the client cannot tell whether it is
/// logged in; `/` always lands on the login page and the server-side checks
/// decide what the chat connection is allowed to do.
#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Routes fallback=|| view! { <Redirect path="/login" /> }>
                <Route path=path!("/") view=|| view! { <Redirect path="/login" /> } />
                <Route path=path!("/login") view=LoginPage />
                <Route path=path!("/chat") view=ChatPage />
            </Routes>
        </Router>
    }
}

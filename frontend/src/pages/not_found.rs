use leptos::prelude::*;

use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl">"This page does not exist."</p>
                <Link to=AppRoute::Home class="btn btn-primary">"Back to QuizHub"</Link>
            </div>
        </div>
    }
}

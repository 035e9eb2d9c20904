use leptos::prelude::*;

/// Shown for every route other than the timeline.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Nothing here"</h1>
			<a href="/">"Back to the timeline"</a>
		</div>
	}
}

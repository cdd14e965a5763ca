use leptos::prelude::*;

use crate::config::MessageKind;
use crate::signature_editor::SignatureEditor;

const TABS: [(&str, &str); 2] = [("email", "Email"), ("sms", "SMS")];

#[component]
pub fn App() -> impl IntoView {
    let (kind_key, set_kind_key) = signal("email".to_string());
    let (read_only, set_read_only) = signal(false);
    let email_body = RwSignal::new(String::new());
    let sms_body = RwSignal::new(String::new());

    let tab_style = move |key: &'static str| {
        move || {
            let active = kind_key.get() == key;
            format!(
                "padding: 0.5rem 1rem; border: none; border-bottom: 2px solid {}; background: transparent; cursor: pointer; font-weight: 600; color: {};",
                if active { "var(--accent-color, #6366f1)" } else { "transparent" },
                if active { "var(--accent-color, #6366f1)" } else { "#6b7280" }
            )
        }
    };

    let editor_view = move || {
        let key = kind_key.get();
        let body = if key == "sms" { sms_body } else { email_body };
        view! {
            <SignatureEditor
                value=body
                on_change=Callback::new(move |html: String| body.set(html))
                disabled=read_only
                kind=MessageKind::parse(&key)
            />
        }
    };

    let preview = move || {
        if kind_key.get() == "sms" {
            sms_body.get()
        } else {
            email_body.get()
        }
    };

    view! {
        <main class="app-layout" style="display: flex; flex-direction: column; gap: 1rem; max-width: 960px; margin: 0 auto; padding: 2rem; color: #1a1a1a;">
            <header style="display: flex; align-items: center; justify-content: space-between; border-bottom: 1px solid #e5e7eb;">
                <nav style="display: flex;">
                    {TABS.into_iter().map(|(key, label)| view! {
                        <button style=tab_style(key) on:click=move |_| set_kind_key.set(key.to_string())>
                            {label}
                        </button>
                    }).collect_view()}
                </nav>
                <label style="font-size: 0.875rem; color: #6b7280; display: flex; gap: 0.5rem; align-items: center;">
                    <input
                        type="checkbox"
                        prop:checked=move || read_only.get()
                        on:change=move |ev| set_read_only.set(event_target_checked(&ev))
                    />
                    "Read only"
                </label>
            </header>
            {editor_view}
            <section>
                <h3 style="font-size: 0.875rem; color: #6b7280; margin: 0 0 0.5rem;">"HTML"</h3>
                <pre style="white-space: pre-wrap; word-break: break-all; background: #f4f5f7; padding: 1rem; border-radius: 8px; font-size: 0.8rem;">
                    {preview}
                </pre>
            </section>
        </main>
    }
}

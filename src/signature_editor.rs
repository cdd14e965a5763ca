use gloo_timers::callback::Timeout;
use leptos::callback::{Callable, Callback};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{debug, info, trace, warn};

use crate::config::{EditorSettings, MessageKind};
use crate::dropdown::{self, DropdownState, OutsideClickListener, PointerHit};
use crate::loader::{self, PollStatus};
use crate::locator::{DomToolbar, ToolbarButtonLocator};
use crate::overlay::{ButtonRect, PositionTracker, ScrollOffset};
use crate::signatures::{self, Signature, TauriSignatureSource};
use crate::splice::{self, DocumentHandle, SignatureChoice};
use crate::tinymce::{self, Editor, EditorHooks, EditorInstance};

const CHECKMARK_PATH: &str = "M16.707 5.293a1 1 0 010 1.414l-8 8a1 1 0 01-1.414 0l-4-4a1 1 0 011.414-1.414L8 12.586l7.293-7.293a1 1 0 011.414 0z";

fn loading_view() -> impl IntoView {
    view! {
        <div style="height: 20rem; background: #f9fafb; border: 1px solid #e5e7eb; border-radius: 8px; display: flex; align-items: center; justify-content: center;">
            <div style="text-align: center;">
                <div class="spinner" style="width: 2rem; height: 2rem; margin: 0 auto 0.5rem; border-radius: 9999px; border-bottom: 2px solid #2563eb; animation: spin 1s linear infinite;"></div>
                <p style="color: #4b5563; font-size: 0.875rem;">"Loading editor..."</p>
            </div>
        </div>
    }
}

fn signature_row<F>(
    label: String,
    choice: SignatureChoice,
    selected: RwSignal<SignatureChoice>,
    on_pick: F,
) -> impl IntoView
where
    F: Fn(SignatureChoice) + Copy + 'static,
{
    let is_active = move || selected.get() == choice;
    view! {
        <button
            type="button"
            class="signature-row"
            style=move || format!(
                "width: 100%; text-align: left; padding: 0.75rem; font-size: 0.875rem; display: flex; align-items: center; justify-content: space-between; border: none; cursor: pointer; {}",
                if is_active() { "background: var(--accent-color, #6366f1); color: white;" } else { "background: transparent; color: inherit;" }
            )
            on:click=move |_| on_pick(choice)
        >
            {label}
            {move || is_active().then(|| view! {
                <svg style="width: 1rem; height: 1rem;" fill="currentColor" viewBox="0 0 20 20">
                    <path fill-rule="evenodd" clip-rule="evenodd" d=CHECKMARK_PATH></path>
                </svg>
            })}
        </button>
    }
}

/// Store fetched signatures unless the editor has been unmounted meanwhile.
fn adopt_signatures(target: RwSignal<Vec<Signature>>, list: Vec<Signature>) -> bool {
    if target.try_set(list).is_some() {
        debug!("editor gone before signatures arrived; discarding");
        return false;
    }
    true
}

/// Rich-text message editor with a signature picker on its toolbar.
///
/// `value` is the document HTML; every edit, typed or signature-driven, is
/// reported through `on_change`.
#[component]
pub fn SignatureEditor(
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] disabled: MaybeProp<bool>,
    kind: MessageKind,
    #[prop(optional)] settings: Option<EditorSettings>,
) -> impl IntoView {
    let settings = StoredValue::new(settings.unwrap_or_default());
    let signatures_enabled = kind.signatures_enabled();
    let height = kind.height();
    let placeholder = kind.placeholder();

    let is_loading = RwSignal::new(true);
    let signature_list = RwSignal::new(Vec::<Signature>::new());
    let selected = RwSignal::new(SignatureChoice::None);
    let dropdown_state = RwSignal::new(DropdownState::default());
    let tracker = RwSignal::new(PositionTracker::default());

    let editor = StoredValue::new_local(None::<EditorInstance>);
    let locator = StoredValue::new_local(ToolbarButtonLocator::new(
        DomToolbar,
        settings.with_value(|s| s.button_label.clone()),
    ));
    let outside_listener = StoredValue::new_local(None::<OutsideClickListener>);
    // Last HTML we reported upward, so echoing it back does not reset the caret.
    let last_reported = StoredValue::new(String::new());
    let mounted = StoredValue::new(false);

    let textarea_ref = NodeRef::<html::Textarea>::new();
    let panel_ref = NodeRef::<html::Div>::new();

    let (max_attempts, interval_ms) =
        settings.with_value(|s| (s.max_poll_attempts, s.poll_interval_ms));
    loader::watch_runtime(
        max_attempts,
        interval_ms,
        move || is_loading.try_get_untracked().map(|_| tinymce::runtime_loaded()),
        move |status| {
            if status == PollStatus::TimedOut {
                warn!("rendering without the rich-text editor");
            }
            let _ = is_loading.try_set(false);
        },
    );

    if signatures_enabled {
        spawn_local(async move {
            let list = signatures::load_signatures(&TauriSignatureSource).await;
            adopt_signatures(signature_list, list);
        });
    }

    let report = move |html: String| {
        last_reported.set_value(html.clone());
        on_change.run(html);
    };

    // Mount TinyMCE once the runtime is ready and the textarea exists.
    Effect::new(move |_| {
        if is_loading.get() || mounted.get_value() {
            return;
        }
        let Some(textarea) = textarea_ref.get() else {
            return;
        };
        mounted.set_value(true);

        let on_signature_button = signatures_enabled.then(|| {
            Box::new(move || {
                dropdown_state.update(DropdownState::toggle);
                Timeout::new(0, move || {
                    let _ = dropdown_state.try_update_untracked(|state| {
                        if state.is_suppressing() {
                            trace!("no pointer-down followed the toggle");
                            state.release_suppression();
                        }
                    });
                })
                .forget();
            }) as Box<dyn FnMut()>
        });

        let locate_delay = settings.with_value(|s| s.locate_delay_ms);
        let on_ready = Box::new(move |instance: Editor| {
            let source = instance.clone();
            instance.listen("input change undo redo", move || {
                let html = source.get_content();
                if value.try_with_untracked(|v| *v != html).unwrap_or(false) {
                    report(html);
                }
            });

            // If the component is already gone, `pending` drops here and
            // removes the editor again.
            let mut pending = Some(EditorInstance::new(instance));
            if editor
                .try_update_value(|slot| *slot = pending.take())
                .is_none()
            {
                return;
            }
            info!("rich-text editor ready");

            if signatures_enabled {
                Timeout::new(locate_delay, move || {
                    let _ = locator.try_with_value(|l| l.locate());
                })
                .forget();
            }
        }) as Box<dyn FnOnce(Editor)>;

        let hooks = EditorHooks {
            button_label: settings.with_value(|s| s.button_label.clone()),
            on_signature_button,
            on_ready,
        };
        let config = kind.editor_config(disabled.get_untracked().unwrap_or(false));
        if let Err(err) = tinymce::mount(&textarea, &config, hooks) {
            warn!(%err, "falling back to a plain text area");
        }
    });

    // Push external value changes into the editor.
    Effect::new(move |_| {
        let next = value.get();
        if last_reported.with_value(|last| *last == next) {
            return;
        }
        editor.with_value(|slot| {
            if let Some(instance) = slot {
                if instance.get_content() != next {
                    instance.set_content(&next);
                }
            }
        });
    });

    Effect::new(move |_| {
        let readonly = disabled.get().unwrap_or(false);
        editor.with_value(|slot| {
            if let Some(instance) = slot {
                instance.set_readonly(readonly);
            }
        });
    });

    // Measure the button each time the panel opens.
    Effect::new(move |_| {
        if !signatures_enabled || !dropdown_state.with(DropdownState::is_open) {
            return;
        }
        let measure = || {
            let button = locator.with_value(|l| l.locate().found())?;
            Some((
                ButtonRect::from(&button.get_bounding_client_rect()),
                ScrollOffset::of_window(),
            ))
        };
        settings.with_value(|s| {
            tracker.update(|t| {
                t.refresh(true, measure, s);
            });
        });
    });

    // Outside-click subscription follows the open state.
    Effect::new(move |_| {
        if !dropdown_state.with(DropdownState::is_open) {
            outside_listener.set_value(None);
            return;
        }
        if outside_listener.with_value(Option::is_some) {
            return;
        }
        let listener = OutsideClickListener::attach(move |target| {
            let panel = panel_ref.get_untracked();
            let button = locator.try_with_value(|l| l.cached()).flatten();
            let hit = PointerHit {
                in_panel: dropdown::contains(panel.as_ref(), target),
                in_button: dropdown::contains(button.as_ref(), target),
            };
            let mut closed = false;
            dropdown_state.update_untracked(|state| closed = state.pointer_down(hit));
            if closed {
                debug!("signature panel closed by outside click");
                dropdown_state.notify();
            }
        });
        outside_listener.set_value(listener);
    });

    let choose = move |choice: SignatureChoice| {
        selected.set(choice);
        dropdown_state.update(DropdownState::close);
        let current = value.get_untracked();
        let next = editor.with_value(|slot| {
            signature_list.with_untracked(|known| {
                splice::apply_choice(slot.as_deref(), &current, known, choice)
            })
        });
        if let Some(html) = next {
            report(html);
        }
    };

    let signature_panel = move || {
        if !signatures_enabled || !dropdown_state.with(DropdownState::is_open) {
            return None;
        }
        let geometry = tracker.with(PositionTracker::geometry)?;
        Some(view! {
            <div node_ref=panel_ref class="signature-panel" style=geometry.style()>
                <div style="background: #f9fafb; border-bottom: 1px solid #e5e7eb;">
                    <div style="padding: 0.75rem; font-size: 0.75rem; font-weight: 600; color: #6b7280;">
                        "Manage Signatures"
                    </div>
                </div>
                <div>
                    {signature_row("No signature".to_string(), SignatureChoice::None, selected, choose)}
                    {move || signature_list.get().into_iter().map(|sig| {
                        signature_row(sig.name, SignatureChoice::Signature(sig.id), selected, choose)
                    }).collect_view()}
                </div>
            </div>
        })
    };

    let surface = move || {
        if is_loading.get() {
            return loading_view().into_any();
        }
        view! {
            <textarea
                node_ref=textarea_ref
                style=format!("width: 100%; height: {height}px; box-sizing: border-box; padding: 16px; font-family: sans-serif; font-size: 14px; line-height: 1.6; border: 1px solid #e5e7eb; resize: none;")
                placeholder=placeholder
                prop:value=move || value.get()
                prop:disabled=move || disabled.get().unwrap_or(false)
                on:input=move |ev| report(event_target_value(&ev))
            ></textarea>
        }
        .into_any()
    };

    view! {
        <div class="compose-editor" style="position: relative; border-radius: 8px; overflow: hidden;">
            {surface}
            {signature_panel}
        </div>
    }
}

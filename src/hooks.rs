use gloo_timers::callback::Interval;
use log::warn;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the state and callbacks for a validated input field.
#[derive(Clone)]
pub struct ValidatedInput<T: Clone + PartialEq + 'static> {
    /// The current text content of the input field.
    pub text: String,
    /// The last value that passed validation.
    pub value: T,
    pub error: Option<String>,
    /// Callback for the text input's `oninput` event.
    pub on_text_input: Callback<InputEvent>,
    /// Parse and validate the current text; wire to `onchange` and Enter.
    pub on_commit: Callback<()>,
    /// Programmatically set the value (e.g. from a preset button).
    pub set_value: Callback<T>,
}

/// Text field state that only exposes a value once it validates.
#[hook]
pub fn use_validated_input<T>(
    initial_value: T,
    parse_and_validate: Rc<dyn Fn(&str) -> Result<T, String>>,
) -> ValidatedInput<T>
where
    T: Clone + PartialEq + std::fmt::Display + 'static,
{
    let value = {
        let initial_value = initial_value.clone();
        use_state(move || initial_value)
    };
    let text = use_state(|| initial_value.to_string());
    let error = use_state(|| None::<String>);

    let on_text_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };

    let on_commit = {
        let text = text.clone();
        let value = value.clone();
        let error = error.clone();
        Callback::from(move |_: ()| match parse_and_validate(&text) {
            Ok(parsed) => {
                // Rewrite in canonical form, "1m30s" becomes "90".
                text.set(parsed.to_string());
                value.set(parsed);
                error.set(None);
            }
            Err(msg) => error.set(Some(msg)),
        })
    };

    let set_value = {
        let text = text.clone();
        let value = value.clone();
        let error = error.clone();
        Callback::from(move |new_val: T| {
            text.set(new_val.to_string());
            value.set(new_val);
            error.set(None);
        })
    };

    ValidatedInput {
        text: (*text).clone(),
        value: (*value).clone(),
        error: (*error).clone(),
        on_text_input,
        on_commit,
        set_value,
    }
}

/// Emit `on_tick` every `period_ms` while `active`.
///
/// The interval lives inside the effect, so flipping `active` to false or
/// unmounting drops it, which cancels the pending callback.
#[hook]
pub fn use_interval(active: bool, period_ms: u32, on_tick: Callback<()>) {
    use_effect_with(active, move |&active| {
        let interval = active.then(|| Interval::new(period_ms, move || on_tick.emit(())));
        move || drop(interval)
    });
}

/// Mirror the theme flag as a `dark` class on `<html>`.
#[hook]
pub fn use_theme_class(dark_mode: bool) {
    use_effect_with(dark_mode, |&dark_mode| {
        let classes = gloo_utils::document_element().class_list();
        let applied = if dark_mode {
            classes.add_1("dark")
        } else {
            classes.remove_1("dark")
        };
        if let Err(e) = applied {
            warn!("Could not apply theme class: {:?}", e);
        }
        || ()
    });
}

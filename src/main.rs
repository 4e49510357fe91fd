//! Main module for the Circuit Timer application using Yew.
//! Wires the workout session, the one-second ticker and the view components.

use circuit_timer::{
    audio::WebAudio,
    config::*,
    storage::{prefers_dark_color_scheme, BrowserStorage},
    utils::{parse_duration_secs, validate_quantity},
    workout::Workout,
};
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod hooks;

use components::{render_empty_list, ActiveTimerPanel, PresetButtons, TimerRow};
use hooks::{use_interval, use_theme_class, use_validated_input};

type Session = Workout<BrowserStorage, WebAudio>;

/// Fire `commit` when Enter is pressed in a text field.
fn commit_on_enter(commit: &Callback<()>) -> Callback<KeyboardEvent> {
    let commit = commit.clone();
    Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            commit.emit(());
        }
    })
}

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    let workout = use_mut_ref(|| {
        Session::load(
            BrowserStorage::open(),
            WebAudio::new(),
            prefers_dark_color_scheme,
        )
    });
    let redraw = use_force_update();
    let list_error = use_state(|| None::<String>);

    // Add-timer form
    let duration = use_validated_input(
        DEFAULT_DURATION_SECS,
        Rc::new(|text: &str| parse_duration_secs(text).map_err(|e| e.to_string())),
    );
    let quantity = use_validated_input(DEFAULT_QUANTITY, Rc::new(validate_quantity));
    let base_name = use_state(|| DEFAULT_BASE_NAME.to_string());

    // Snapshot for this render
    let (timers, prefs, running, active_index, in_gap, countdown) = {
        let w = workout.borrow();
        (
            w.timers().clone(),
            w.preferences(),
            w.is_running(),
            w.active_index(),
            w.is_in_gap(),
            w.countdown(),
        )
    };

    use_theme_class(prefs.dark_mode);

    let on_tick = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: ()| {
            workout.borrow_mut().tick();
            redraw.force_update();
        })
    };
    use_interval(running, TICK_INTERVAL_MS, on_tick);

    // --- Timer list handlers ---
    let on_add = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        let list_error = list_error.clone();
        let quantity = quantity.value;
        let duration = duration.value;
        let base_name = (*base_name).clone();
        Callback::from(move |_: MouseEvent| {
            let name = match base_name.trim() {
                "" => DEFAULT_BASE_NAME,
                trimmed => trimmed,
            };
            let added = workout.borrow_mut().add_timers(quantity, duration, name);
            match added {
                Ok(_) => list_error.set(None),
                Err(e) => list_error.set(Some(e.to_string())),
            }
            redraw.force_update();
        })
    };

    let on_delete = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        let list_error = list_error.clone();
        Callback::from(move |id: String| {
            let removed = workout.borrow_mut().remove(&id);
            if let Err(e) = removed {
                list_error.set(Some(e.to_string()));
            }
            redraw.force_update();
        })
    };

    let on_move_up = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        let list_error = list_error.clone();
        Callback::from(move |index: usize| {
            let moved = workout.borrow_mut().move_up(index);
            if let Err(e) = moved {
                list_error.set(Some(e.to_string()));
            }
            redraw.force_update();
        })
    };

    let on_move_down = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        let list_error = list_error.clone();
        Callback::from(move |index: usize| {
            let moved = workout.borrow_mut().move_down(index);
            if let Err(e) = moved {
                list_error.set(Some(e.to_string()));
            }
            redraw.force_update();
        })
    };

    let on_name_input = {
        let base_name = base_name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            base_name.set(input.value());
        })
    };

    // --- Preferences ---
    let on_gap_select = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        Callback::from(move |secs: u32| {
            workout.borrow_mut().set_gap_duration(secs);
            redraw.force_update();
        })
    };

    let on_toggle_theme = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            workout.borrow_mut().toggle_dark_mode();
            redraw.force_update();
        })
    };

    // --- Sequence controls ---
    let on_start = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        let list_error = list_error.clone();
        Callback::from(move |_: MouseEvent| {
            let mut w = workout.borrow_mut();
            // Browsers only allow audio contexts created from a user gesture.
            w.audio().init();
            if w.start() {
                list_error.set(None);
            }
            drop(w);
            redraw.force_update();
        })
    };

    let on_pause = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            workout.borrow_mut().pause();
            redraw.force_update();
        })
    };

    let on_reset = {
        let workout = workout.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            workout.borrow_mut().reset();
            redraw.force_update();
        })
    };

    let active_name = active_index
        .and_then(|i| timers.get(i))
        .map(|t| AttrValue::from(t.name.clone()));

    html! {
        <div class="container">
            <header class="app-header">
                <h1>{ "Circuit Timer" }</h1>
                <button class="theme-toggle"
                    aria-label={if prefs.dark_mode { "Switch to light mode" } else { "Switch to dark mode" }}
                    onclick={on_toggle_theme}
                >
                    { if prefs.dark_mode { "☀" } else { "☾" } }
                </button>
            </header>

            // Add timer form
            <section class="card add-timer">
                <PresetButtons
                    presets={DURATION_PRESETS}
                    selected={duration.value}
                    onselect={duration.set_value.clone()}
                />
                <div class="form-row">
                    <div class="form-group">
                        <label for="duration_input">{ "Duration:" }</label>
                        <input
                            type="text"
                            id="duration_input"
                            value={duration.text.clone()}
                            class={if duration.error.is_some() { "invalid" } else { "" }}
                            placeholder="45, 1:30, 2m"
                            oninput={duration.on_text_input.clone()}
                            onchange={duration.on_commit.reform(|_| ())}
                            onkeydown={commit_on_enter(&duration.on_commit)}
                        />
                        if let Some(ref err) = duration.error {
                            <div class="input-error">{ err }</div>
                        }
                    </div>
                    <div class="form-group">
                        <label for="quantity_input">{ "Quantity:" }</label>
                        <input
                            type="number"
                            id="quantity_input"
                            min={MIN_QUANTITY.to_string()}
                            max={MAX_QUANTITY.to_string()}
                            value={quantity.text.clone()}
                            class={if quantity.error.is_some() { "invalid" } else { "" }}
                            oninput={quantity.on_text_input.clone()}
                            onchange={quantity.on_commit.reform(|_| ())}
                            onkeydown={commit_on_enter(&quantity.on_commit)}
                        />
                        if let Some(ref err) = quantity.error {
                            <div class="input-error">{ err }</div>
                        }
                    </div>
                    <div class="form-group">
                        <label for="name_input">{ "Name:" }</label>
                        <input
                            type="text"
                            id="name_input"
                            value={(*base_name).clone()}
                            placeholder={DEFAULT_BASE_NAME}
                            oninput={on_name_input}
                        />
                    </div>
                </div>
                <button class="btn-primary" onclick={on_add}>{ "Add Timer" }</button>
                if let Some(ref err) = *list_error {
                    <div class="input-error">{ err }</div>
                }
            </section>

            // Gap duration setting
            <section class="card gap-setting">
                <h2>{ "Gap Between Timers" }</h2>
                <PresetButtons
                    presets={GAP_PRESETS}
                    selected={prefs.gap_duration}
                    onselect={on_gap_select}
                />
            </section>

            // Sequence controls
            <section class="card controls">
                <button class="btn-secondary" disabled={timers.is_empty() || running} onclick={on_start}>
                    { "Start" }
                </button>
                <button class="btn-secondary" disabled={!running} onclick={on_pause}>
                    { "Pause" }
                </button>
                <button class="btn-secondary" onclick={on_reset}>
                    { "Reset" }
                </button>
            </section>

            if running {
                if let Some(name) = active_name {
                    <ActiveTimerPanel name={name} countdown={countdown} in_gap={in_gap} />
                }
            }

            // Timer list
            <section class="card timer-list">
                <h2>{ "Your Timers" }</h2>
                if timers.is_empty() {
                    { render_empty_list() }
                } else {
                    <div class="timer-rows">
                        { timers.iter().enumerate().map(|(index, timer)| html! {
                            <TimerRow
                                key={timer.id.clone()}
                                timer={timer.clone()}
                                index={index}
                                is_last={index + 1 == timers.len()}
                                is_active={active_index == Some(index)}
                                countdown={countdown}
                                in_gap={in_gap}
                                running={running}
                                on_delete={on_delete.clone()}
                                on_move_up={on_move_up.clone()}
                                on_move_down={on_move_down.clone()}
                            />
                        }).collect::<Html>() }
                    </div>
                }
            </section>
        </div>
    }
}

/// Entry point: installs the console logger and panic hook, then renders the App.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    yew::Renderer::<App>::new().render();
}

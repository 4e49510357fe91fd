//! Pure Yew view components for the circuit timer UI.
//!
//! These components render from props only; all state lives in the root
//! component's `Workout`.

use circuit_timer::utils::format_duration;
use circuit_timer::Timer;
use yew::prelude::*;

/// Placeholder shown instead of the timer list when it is empty.
pub fn render_empty_list() -> Html {
    html! {
        <p class="no-timers-message">
            { "No timers added yet. Add some timers to get started!" }
        </p>
    }
}

/// Row of "N sec" buttons, one of which may be highlighted.
#[derive(Properties, PartialEq)]
pub struct PresetButtonsProps {
    pub presets: &'static [u32],
    pub selected: u32,
    pub onselect: Callback<u32>,
}

#[function_component(PresetButtons)]
pub fn preset_buttons(props: &PresetButtonsProps) -> Html {
    html! {
        <div class="preset-buttons">
            { props.presets.iter().map(|&secs| {
                let selected = secs == props.selected;
                html! {
                    <button
                        class={classes!("preset", selected.then_some("selected"))}
                        aria-pressed={selected.to_string()}
                        onclick={props.onselect.reform(move |_: MouseEvent| secs)}
                    >
                        { format!("{} sec", secs) }
                    </button>
                }
            }).collect::<Html>() }
        </div>
    }
}

/// Large countdown for whatever is currently running.
#[derive(Properties, PartialEq)]
pub struct ActiveTimerPanelProps {
    pub name: AttrValue,
    pub countdown: u32,
    pub in_gap: bool,
}

#[function_component(ActiveTimerPanel)]
pub fn active_timer_panel(props: &ActiveTimerPanelProps) -> Html {
    let (heading, caption) = if props.in_gap {
        ("Get Ready For:", "Starting in...")
    } else {
        ("Current Exercise:", "Seconds remaining")
    };

    html! {
        <div class="card active-timer">
            <h2>{ heading }</h2>
            <h3 class="active-timer-name">{ props.name.clone() }</h3>
            <div class="countdown digital-font">{ props.countdown }</div>
            <div class="countdown-caption">{ caption }</div>
        </div>
    }
}

/// One entry in the timer list with delete / move controls.
#[derive(Properties, PartialEq)]
pub struct TimerRowProps {
    pub timer: Timer,
    pub index: usize,
    pub is_last: bool,
    /// Highlighted and showing the live countdown.
    pub is_active: bool,
    pub countdown: u32,
    pub in_gap: bool,
    /// Editing controls are disabled while the sequence runs.
    pub running: bool,
    pub on_delete: Callback<String>,
    pub on_move_up: Callback<usize>,
    pub on_move_down: Callback<usize>,
}

#[function_component(TimerRow)]
pub fn timer_row(props: &TimerRowProps) -> Html {
    let index = props.index;
    let on_delete = {
        let id = props.timer.id.clone();
        props.on_delete.reform(move |_: MouseEvent| id.clone())
    };

    html! {
        <div class={classes!(
            "timer-row",
            props.timer.completed.then_some("completed"),
            props.is_active.then_some("active")
        )}>
            <div class="timer-info">
                <span class="timer-name">{ props.timer.name.clone() }</span>
                <span class="timer-duration">{ format_duration(props.timer.duration) }</span>
                if props.is_active {
                    <span class={classes!("timer-countdown", if props.in_gap { "gap" } else { "exercise" })}>
                        { props.countdown }
                    </span>
                }
            </div>
            <div class="timer-actions">
                <button class="btn-delete"
                    disabled={props.running}
                    aria-label={format!("Delete timer {}", index + 1)}
                    onclick={on_delete}
                >
                    { "✕" }
                </button>
                <button class="btn-move"
                    disabled={index == 0 || props.running}
                    aria-label={format!("Move timer {} up", index + 1)}
                    onclick={props.on_move_up.reform(move |_: MouseEvent| index)}
                >
                    { "▲" }
                </button>
                <button class="btn-move"
                    disabled={props.is_last || props.running}
                    aria-label={format!("Move timer {} down", index + 1)}
                    onclick={props.on_move_down.reform(move |_: MouseEvent| index)}
                >
                    { "▼" }
                </button>
            </div>
        </div>
    }
}

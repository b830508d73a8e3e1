use clap::Parser;

mod copy;
mod quest;
mod timers;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    quest: quest::QuestProps,
}

/// Splits `#-v&--seed=42` style fragments into argv, with an empty program name up front.
fn hash_args(location_hash: &str) -> impl Iterator<Item = &str> {
    location_hash.split(['#', '&'])
}

// Browser tests mount their own roots; there is no #quest element to start on.
#[cfg_attr(not(test), wasm_bindgen::prelude::wasm_bindgen(start))]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(hash_args(&location_hash)).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("seed: {:?}, cards: {}", args.quest.seed, args.quest.cards);

    let root = document()
        .get_element_by_id("quest")
        .expect("Could not find id=\"quest\" element");

    log::debug!("App started");
    yew::Renderer::<quest::QuestView>::with_root_and_props(root, args.quest).render();
}

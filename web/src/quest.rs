use crate::copy;
use crate::timers::LinkScheduler;
use crate::utils::*;
use clap::Args;
use quest_core as quest;
use quest::{CardId, CardView, QuestConfig, QuestController, Stage, TimerEvent};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Catch,
    Surrender(bool),
    Pick(CardId),
    PlayAgain,
    TogglePartyMode,
    PartyBurst,
    Compliment,
    RerollCharm,
    ToggleNote,
    Timer(TimerEvent),
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    card: CardView,
    #[prop_or_default]
    locked: bool,
    callback: Callback<CardId>,
}

#[function_component(CardTile)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        card,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!("card");
    if card.show_gift {
        class.push("gift");
    }
    if card.is_wrong {
        class.push("wrong");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", card.id);
        callback.emit(card.id);
    });

    html! {
        <button {class} {onclick} disabled={locked || card.is_wrong}>
            { if card.show_gift { "🎁" } else if card.is_wrong { "✗" } else { "?" } }
        </button>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct QuestProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// How many cards to deal
    #[arg(short, long, default_value_t = QuestConfig::DEFAULT.total_cards)]
    pub cards: CardId,
}

pub(crate) struct QuestView {
    quest: QuestController<LinkScheduler>,
    note_open: bool,
}

impl QuestView {
    fn config(props: &QuestProps) -> QuestConfig {
        QuestConfig {
            total_cards: props.cards,
            fun_message_count: copy::FUN_MESSAGES.len() as u8,
            compliment_count: copy::COMPLIMENTS.len() as u8,
            charm_count: copy::CHARMS.len() as u8,
            ..QuestConfig::DEFAULT
        }
        .sanitized()
    }

    fn view_header(&self, ctx: &Context<Self>) -> Html {
        let state = self.quest.state();
        let stats = state.stats();
        let party = state.party();
        let (title, subtitle) = copy::stage_title(state.stage());

        html! {
            <header>
                <nav>
                    <span>{format!("Step {}/{}", stats.step, stats.total_steps)}</span>
                    <button onclick={ctx.link().callback(|_| Msg::TogglePartyMode)}>
                        { if party.party_mode { "Party On" } else { "Party Off" } }
                    </button>
                    <span>{format!("Lucky Charm {}", copy::charm(party.lucky_charm))}</span>
                    <button onclick={ctx.link().callback(|_| Msg::RerollCharm)}>{"Reroll"}</button>
                </nav>
                <progress max="100" value={stats.progress_percent().to_string()}/>
                <h1>{title}</h1>
                <p>{subtitle}</p>
                if party.party_mode && state.stage().is_party_stage() {
                    <p class="fun">{copy::fun_message(party.fun_message)}</p>
                }
                if let Some(status) = state.status() {
                    <p class="status">{status.text()}</p>
                }
            </header>
        }
    }

    fn view_button(&self, ctx: &Context<Self>) -> Html {
        let state = self.quest.state();
        let surrendered = state.surrendered();
        let style = format!("transform: translateX({}px)", state.button_offset());
        let onchange = ctx.link().callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::Surrender(input.checked())
        });

        html! {
            <section class="button-stage">
                <button class={classes!("catch", surrendered.then_some("unlocked"))} {style}
                    onclick={ctx.link().callback(|_| Msg::Catch)}>
                    { if surrendered { "Unlock Surprise 🎁" } else { "Catch Me" } }
                </button>
                <label>
                    <input type="checkbox" checked={surrendered} {onchange}/>
                    {"Surrender"}
                </label>
            </section>
        }
    }

    fn view_cards(&self, ctx: &Context<Self>) -> Html {
        let state = self.quest.state();
        let locked = state.stage() != Stage::Cards;
        let stats = state.stats();
        let callback = ctx.link().callback(Msg::Pick);

        html! {
            <section class="cards-stage">
                if !locked {
                    <aside>
                        <span>{format!("Attempts: {}", stats.attempts_used)}</span>
                        <span>{format!("Next-pick odds: {}%", stats.next_pick_odds)}</span>
                    </aside>
                }
                <div class="deck">
                    {
                        for state.card_views().map(|card| html! {
                            <CardTile key={card.id} {card} {locked} callback={callback.clone()}/>
                        })
                    }
                </div>
            </section>
        }
    }

    fn view_win(&self, ctx: &Context<Self>) -> Html {
        let state = self.quest.state();
        let badge = state.win_badge().map(|badge| badge.label()).unwrap_or_default();
        let compliment = state.party().compliment.map(copy::compliment);

        html! {
            <section class="win-stage">
                <strong>{badge}</strong>
                <div class="memories">
                    { for copy::PHOTOS.iter().map(|&src| html! { <img {src}/> }) }
                    <video controls={true}>
                        <source src={copy::VIDEO} type="video/mp4"/>
                    </video>
                </div>
                <button onclick={ctx.link().callback(|_| Msg::ToggleNote)}>
                    { if self.note_open { "Close note" } else { "Open note" } }
                </button>
                if self.note_open {
                    <article class="note">{copy::NOTE}</article>
                }
                if let Some(compliment) = compliment {
                    <p class="compliment">{compliment}</p>
                }
                <footer>
                    <button onclick={ctx.link().callback(|_| Msg::Compliment)}>{"Compliment"}</button>
                    <button onclick={ctx.link().callback(|_| Msg::PartyBurst)}>{"Party Burst"}</button>
                    <button onclick={ctx.link().callback(|_| Msg::PlayAgain)}>{"Play Again"}</button>
                </footer>
            </section>
        }
    }
}

impl Component for QuestView {
    type Message = Msg;
    type Properties = QuestProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed.unwrap_or_else(js_random_seed);
        let scheduler = LinkScheduler::new(ctx.link().clone());
        Self {
            quest: QuestController::new(Self::config(props), seed, scheduler),
            note_open: false,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Catch => self.quest.catch_button(viewport_width()).has_update(),
            Surrender(surrendered) => self.quest.set_surrendered(surrendered).has_update(),
            Pick(id) => {
                log::debug!("pick card: {}", id);
                self.quest.pick_card(id).has_update()
            }
            PlayAgain => {
                self.note_open = false;
                self.quest.play_again();
                true
            }
            TogglePartyMode => self.quest.toggle_party_mode().has_update(),
            PartyBurst => self.quest.party_burst().has_update(),
            Compliment => self.quest.reveal_compliment().has_update(),
            RerollCharm => self.quest.reroll_charm().has_update(),
            ToggleNote => {
                self.note_open = !self.note_open;
                true
            }
            Timer(event) => self.quest.on_timer(event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let state = self.quest.state();

        html! {
            <main class={classes!("quest", format!("stage-{}", state.stage().index()))}>
                if state.celebrating() {
                    <div class="confetti" aria-hidden="true"/>
                }
                { self.view_header(ctx) }
                {
                    match state.stage() {
                        Stage::Button => self.view_button(ctx),
                        Stage::Shuffle | Stage::Cards => self.view_cards(ctx),
                        Stage::Win => self.view_win(ctx),
                    }
                }
            </main>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_follows_props_and_copy_tables() {
        let props = QuestProps {
            seed: Some(1),
            cards: 40,
        };
        let config = QuestView::config(&props);

        assert_eq!(config.total_cards, QuestConfig::MAX_CARDS);
        assert_eq!(usize::from(config.charm_count), copy::CHARMS.len());
        assert_eq!(config.reveal_delay, QuestConfig::DEFAULT.reveal_delay);
    }
}

use gloo::timers::callback::{Interval, Timeout};
use quest_core::{Millis, Scheduler, TimerEvent};
use yew::html::Scope;

use crate::quest::{Msg, QuestView};

/// Browser timers that post their events back to the quest component.
pub(crate) struct LinkScheduler {
    link: Scope<QuestView>,
}

impl LinkScheduler {
    pub(crate) fn new(link: Scope<QuestView>) -> Self {
        Self { link }
    }
}

/// Dropping either variant clears the underlying `setTimeout`/`setInterval`.
pub(crate) enum TimerHandle {
    Once { _timeout: Timeout },
    Repeating { _interval: Interval },
}

impl Scheduler for LinkScheduler {
    type Handle = TimerHandle;

    fn schedule_once(&mut self, delay: Millis, event: TimerEvent) -> Self::Handle {
        let link = self.link.clone();
        let timeout = Timeout::new(delay, move || link.send_message(Msg::Timer(event)));
        TimerHandle::Once { _timeout: timeout }
    }

    fn schedule_repeating(&mut self, period: Millis, event: TimerEvent) -> Self::Handle {
        let link = self.link.clone();
        let interval = Interval::new(period, move || link.send_message(Msg::Timer(event)));
        TimerHandle::Repeating {
            _interval: interval,
        }
    }
}

//! The daily opening and closing of workplaces.
//!
//! Every workplace opens at 08:00, stays open for eight hours and then stays closed for sixteen,
//! every day including weekends. Each opening schedules the matching closing and each closing
//! schedules the next day's opening, so the cycle continues until the simulation is shut down.
use log::info;
use serde::Serialize;
use strum::Display;

use crate::community::PlaceId;
use crate::context::{Context, Event};
use crate::time::{DAY, HOUR};

pub const OPENING_TIME: f64 = 8.0 * HOUR;
pub const OPEN_DURATION: f64 = 8.0 * HOUR;
pub const CLOSED_DURATION: f64 = DAY - OPEN_DURATION;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, Serialize)]
pub enum WorkplaceActivity {
    Opened,
    Closed,
}

/// Emitted every time a workplace opens or closes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorkplaceEvent {
    pub workplace: PlaceId,
    pub kind: WorkplaceActivity,
    pub time: f64,
}

impl Event for WorkplaceEvent {}

/// The first 08:00 at or after `now`.
#[must_use]
pub fn next_opening_time(now: f64) -> f64 {
    let day = ((now - OPENING_TIME) / DAY).ceil().max(0.0);
    day * DAY + OPENING_TIME
}

/// Starts the daily cycle of `workplace` with its next opening.
pub fn schedule_opening(context: &mut Context, workplace: PlaceId) {
    let time = next_opening_time(context.get_current_time());
    context.add_plan(time, move |context| open(context, workplace));
}

fn open(context: &mut Context, workplace: PlaceId) {
    let time = context.get_current_time();
    info!("Workplace {workplace} opened at time {time}");
    context.emit_event(WorkplaceEvent {
        workplace,
        kind: WorkplaceActivity::Opened,
        time,
    });
    context.add_plan(time + OPEN_DURATION, move |context| close(context, workplace));
}

fn close(context: &mut Context, workplace: PlaceId) {
    let time = context.get_current_time();
    info!("Workplace {workplace} closed at time {time}");
    context.emit_event(WorkplaceEvent {
        workplace,
        kind: WorkplaceActivity::Closed,
        time,
    });
    context.add_plan(time + CLOSED_DURATION, move |context| open(context, workplace));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_data_plugin;
    use assert_approx_eq::assert_approx_eq;

    define_data_plugin!(Activity, Vec<WorkplaceEvent>, Vec::new());

    fn record_activity(context: &mut Context) {
        context.subscribe_to_event(|context, event: WorkplaceEvent| {
            context.get_data_container_mut(Activity).push(event);
        });
    }

    fn activity(context: &Context) -> Vec<WorkplaceEvent> {
        context.get_data_container(Activity).cloned().unwrap_or_default()
    }

    fn assert_times(events: &[WorkplaceEvent], expected: &[f64]) {
        assert_eq!(events.len(), expected.len());
        for (event, hours) in events.iter().zip(expected) {
            assert_approx_eq!(event.time, hours * HOUR);
        }
    }

    #[test]
    fn cycle_is_one_day() {
        assert_approx_eq!(OPEN_DURATION + CLOSED_DURATION, DAY);
        assert_approx_eq!(CLOSED_DURATION, 16.0 * HOUR);
    }

    #[test]
    fn next_opening() {
        assert_approx_eq!(next_opening_time(0.0), OPENING_TIME);
        assert_approx_eq!(next_opening_time(OPENING_TIME), OPENING_TIME);
        assert_approx_eq!(next_opening_time(9.0 * HOUR), DAY + OPENING_TIME);
        assert_approx_eq!(next_opening_time(2.0 * DAY), 2.0 * DAY + OPENING_TIME);
    }

    #[test]
    fn stops_at_the_end_time() {
        let mut context = Context::new();
        record_activity(&mut context);
        schedule_opening(&mut context, PlaceId(3));
        context.add_plan(30.0 * HOUR, Context::shutdown);
        context.execute();

        let events = activity(&context);
        assert_times(&events, &[8.0, 16.0]);
        assert_eq!(events[0].kind, WorkplaceActivity::Opened);
        assert_eq!(events[1].kind, WorkplaceActivity::Closed);
        assert!(events.iter().all(|event| event.workplace == PlaceId(3)));
        // The next opening at 32h never fires.
        assert_eq!(context.remaining_plan_count(), 1);
    }

    #[test]
    fn opens_and_closes_every_day() {
        let mut context = Context::new();
        record_activity(&mut context);
        schedule_opening(&mut context, PlaceId(0));
        context.add_plan(3.0 * DAY, Context::shutdown);
        context.execute();

        let events = activity(&context);
        assert_times(&events, &[8.0, 16.0, 32.0, 40.0, 56.0, 64.0]);
        for pair in events.chunks(2) {
            assert_eq!(pair[0].kind, WorkplaceActivity::Opened);
            assert_eq!(pair[1].kind, WorkplaceActivity::Closed);
        }
    }

    #[test]
    fn workplaces_keep_their_order() {
        let mut context = Context::new();
        record_activity(&mut context);
        for index in [2, 0, 1] {
            schedule_opening(&mut context, PlaceId(index));
        }
        context.add_plan(12.0 * HOUR, Context::shutdown);
        context.execute();

        let opened: Vec<PlaceId> = activity(&context).iter().map(|e| e.workplace).collect();
        assert_eq!(opened, vec![PlaceId(2), PlaceId(0), PlaceId(1)]);
    }

    #[test]
    fn late_workplace_waits_for_the_next_morning() {
        let mut context = Context::new();
        record_activity(&mut context);
        context.add_plan(DAY + 10.0 * HOUR, |context| {
            schedule_opening(context, PlaceId(7));
        });
        context.add_plan(3.0 * DAY, Context::shutdown);
        context.execute();

        let events = activity(&context);
        assert_times(&events, &[56.0, 64.0]);
    }
}
